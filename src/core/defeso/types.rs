// src/core/defeso/types.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar day without a year. Month is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        // Reject days no year has (31 April), allow 29 February.
        NaiveDate::from_ymd_opt(2000, month, day)?;
        Some(Self { month, day })
    }

    /// Unchecked constructor for the built-in table, whose entries are
    /// validated by the catalog tests.
    pub(crate) const fn from_table(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Places the day in `year`, clamping to the month's last day when the
    /// day does not exist that year (29 February outside leap years).
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        (1..=self.day)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(year, self.month, day))
    }
}

/// Static closed-season rule for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefesoDefinition {
    pub species: String,
    pub description: String,
    pub start: MonthDay,
    pub end: MonthDay,
}

impl DefesoDefinition {
    /// True when the season starts in one year and ends in the next
    /// (November → March).
    pub fn spans_new_year(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefesoStatus {
    Upcoming,
    Ongoing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

/// Past season shown under the current one. Illustrative only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefesoHistoryEntry {
    pub id: String,
    pub species: String,
    pub region: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: DefesoStatus,
    pub payment_status: PaymentStatus,
    pub payment_date: NaiveDate,
}

/// The season governing a region on a given day. Always derived, never
/// stored as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefesoWindow {
    pub species: String,
    pub region: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: DefesoStatus,
    pub days_remaining: u32,
    pub has_right_to_insurance: bool,
    pub history: Vec<DefesoHistoryEntry>,
}

/// Brazilian display format, `DD/MM/YYYY`.
pub fn format_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
