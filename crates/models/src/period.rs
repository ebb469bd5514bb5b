//! `MM-YYYY` month periods.
//!
//! A period is stored as its anchor date: the first day of the month, no
//! timezone. Parsing is strict (two-digit month, four-digit year, single
//! dash); formatting is its exact inverse.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid period {input:?}: expected MM-YYYY")]
pub struct PeriodError {
    pub input: String,
}

impl PeriodError {
    fn new(input: &str) -> Self { Self { input: input.to_string() } }
}

/// Parse `MM-YYYY` into the first day of that month.
pub fn parse_period(text: &str) -> Result<NaiveDate, PeriodError> {
    let (month, year) = text.split_once('-').ok_or_else(|| PeriodError::new(text))?;
    if month.len() != 2 || year.len() != 4 {
        return Err(PeriodError::new(text));
    }
    if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(PeriodError::new(text));
    }
    let month: u32 = month.parse().map_err(|_| PeriodError::new(text))?;
    let year: i32 = year.parse().map_err(|_| PeriodError::new(text))?;
    if !(1..=12).contains(&month) {
        return Err(PeriodError::new(text));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| PeriodError::new(text))
}

/// Render a date as `MM-YYYY`; the day of month is ignored.
pub fn format_period(date: NaiveDate) -> String {
    format!("{:02}-{:04}", date.month(), date.year())
}
