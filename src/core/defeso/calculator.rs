// src/core/defeso/calculator.rs
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::warn;

use super::catalog::DefesoCatalog;
use super::types::{
    DefesoDefinition, DefesoHistoryEntry, DefesoStatus, DefesoWindow, PaymentStatus,
};
use crate::utils::error::{AppError, Result};

/// Closed season governing `region` at `now`. The time of day is ignored.
pub fn calculate_window(catalog: &DefesoCatalog, region: &str, now: NaiveDateTime) -> Result<DefesoWindow> {
    window_on(catalog, region, now.date())
}

/// Closed season governing `region` on `today`.
///
/// Unknown regions use the catalog's fallback rule. The returned window is
/// the one in progress, or the next one to start; past windows roll forward.
pub fn window_on(catalog: &DefesoCatalog, region: &str, today: NaiveDate) -> Result<DefesoWindow> {
    let def = catalog.lookup(region);
    let (start_year, end_year) = season_years(def, today).ok_or_else(out_of_range)?;

    let start_date = def.start.in_year(start_year).ok_or_else(out_of_range)?;
    let end_date = def.end.in_year(end_year).ok_or_else(out_of_range)?;

    let (status, days_remaining) = if today >= start_date && today <= end_date {
        (DefesoStatus::Ongoing, 0)
    } else if today < start_date {
        let days = (start_date - today).num_days();
        (DefesoStatus::Upcoming, u32::try_from(days).unwrap_or(u32::MAX))
    } else {
        // Rollover above always moves a past season forward.
        warn!(region, %today, %start_date, %end_date, "Defeso window resolved as finished");
        (DefesoStatus::Finished, 0)
    };

    Ok(DefesoWindow {
        species: def.species.clone(),
        region: region.to_string(),
        description: def.description.clone(),
        start_date,
        end_date,
        status,
        days_remaining,
        has_right_to_insurance: true,
        history: history(def, region, start_year, end_year).ok_or_else(out_of_range)?,
    })
}

/// Years of the season's start and end relative to `today`.
fn season_years(def: &DefesoDefinition, today: NaiveDate) -> Option<(i32, i32)> {
    let year = today.year();

    if def.spans_new_year() {
        if today <= def.end.in_year(year)? {
            // Still inside the season that began last year.
            Some((year - 1, year))
        } else {
            // Between seasons or inside the one that began this year.
            Some((year, year + 1))
        }
    } else if today > def.end.in_year(year)? {
        Some((year + 1, year + 1))
    } else {
        Some((year, year))
    }
}

fn history(def: &DefesoDefinition, region: &str, start_year: i32, end_year: i32) -> Option<Vec<DefesoHistoryEntry>> {
    // (years back, payment day in April)
    let entries = [(1, 15), (2, 10)];

    entries
        .iter()
        .enumerate()
        .map(|(i, &(back, payment_day))| {
            Some(DefesoHistoryEntry {
                id: format!("h{}", i + 1),
                species: def.species.clone(),
                region: region.to_string(),
                start_date: def.start.in_year(start_year - back)?,
                end_date: def.end.in_year(end_year - back)?,
                status: DefesoStatus::Finished,
                payment_status: PaymentStatus::Paid,
                payment_date: NaiveDate::from_ymd_opt(end_year - back, 4, payment_day)?,
            })
        })
        .collect()
}

fn out_of_range() -> AppError {
    AppError::Validation("Data fora do intervalo suportado.".into())
}
