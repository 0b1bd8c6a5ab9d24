//! Date handling shared by every front end.
//!
//! Dates are stored as ISO-8601 text so that string comparison in SQL is
//! chronological. These helpers validate user input and normalize it into
//! the stored forms.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Stored form of calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored form of date-times (minute precision).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    Date(String),
    #[error("invalid date-time '{0}' (expected YYYY-MM-DD HH:MM)")]
    DateTime(String),
}

/// Validate a date and return it as `YYYY-MM-DD`.
///
/// Accepts `YYYY-MM-DD` and `DD.MM.YYYY`.
pub fn normalize_date(input: &str) -> Result<String, DateError> {
    let s = input.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| DateError::Date(input.to_string()))
}

/// Validate a date-time and return it as `YYYY-MM-DD HH:MM`.
///
/// Accepts a space or `T` separator, with or without seconds. Seconds are
/// dropped.
pub fn normalize_datetime(input: &str) -> Result<String, DateError> {
    let s = input.trim();
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .ok_or_else(|| DateError::DateTime(input.to_string()))
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}
