//! Calendar date validation.

use chrono::{Local, NaiveDate};

use crate::constants::DATE_FORMAT;
use crate::errors::{DaytraceError, Result};

const DATE_FORMAT_MESSAGE: &str = "Date must be in format YYYY-MM-DD (e.g., 2013-03-20)";

/// Validate a `YYYY-MM-DD` date string and return the parsed day.
///
/// The string must be exactly ten characters with zero-padded month and day
/// and must name a real calendar day (`2024-02-30` is rejected).
pub fn validate_date(date: &str) -> Result<NaiveDate> {
    if date.trim().is_empty() {
        return Err(DaytraceError::InvalidInput("Date is required".to_string()));
    }

    if !has_date_shape(date) {
        return Err(DaytraceError::InvalidInput(DATE_FORMAT_MESSAGE.to_string()));
    }

    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| DaytraceError::InvalidInput(DATE_FORMAT_MESSAGE.to_string()))
}

fn has_date_shape(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Whether `date` is strictly before today's local calendar day.
///
/// Unparseable input is never in the past.
pub fn is_past_date(date: &str) -> bool {
    is_past_date_relative_to(date, Local::now().date_naive())
}

/// [`is_past_date`] against an explicit "today".
pub fn is_past_date_relative_to(date: &str, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).is_ok_and(|day| day < today)
}
