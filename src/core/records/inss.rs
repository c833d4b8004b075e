// src/core/records/inss.rs
use chrono::NaiveDate;

use crate::utils::error::{AppError, Result};

/// 1.3% of declared income, in thousandths.
const RATE_PER_MILLE: i64 = 13;
/// R$ 10,00 floor.
pub const MINIMUM_CONTRIBUTION_CENTS: i64 = 1_000;

/// Contribution due on `income_cents`, rounded half up to the centavo.
/// Incomes too large to compute are rejected as invalid.
pub fn contribution_for(income_cents: i64) -> Result<i64> {
    let raw = income_cents
        .checked_mul(RATE_PER_MILLE)
        .and_then(|v| v.checked_add(500))
        .ok_or_else(|| AppError::Validation("Por favor, informe uma renda válida.".into()))?
        / 1_000;
    Ok(raw.max(MINIMUM_CONTRIBUTION_CENTS))
}

/// Parses a `YYYY-MM` reference month and returns its year.
pub fn parse_reference_month(month: &str) -> Result<i32> {
    let invalid = || AppError::Validation("Informe um mês de referência válido.".into());

    let (year, mon) = month.trim().split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || mon.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let mon: u32 = mon.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, mon, 1).ok_or_else(invalid)?;

    Ok(year)
}

/// Parses an amount typed in Brazilian notation (`R$ 1.234,56`, `1500`,
/// `99,9`) into centavos.
pub fn parse_brl(text: &str) -> Option<i64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    let (whole, frac) = match cleaned.split_once(',') {
        Some((whole, frac)) => (whole, frac),
        None => (cleaned.as_str(), ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let reais: i64 = whole.parse().ok()?;
    let cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    reais.checked_mul(100)?.checked_add(cents)
}
