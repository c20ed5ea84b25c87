//! Spreadsheet serial dates
//!
//! Serial `0` is 1899-12-30. Using that epoch (rather than 1900-01-01)
//! reproduces the spreadsheet leap-year quirk for every serial from 61 on,
//! which is where all real data lives.

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Day zero of the spreadsheet serial calendar
pub const SPREADSHEET_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial a spreadsheet can represent (9999-12-31)
pub const MAX_SERIAL: i64 = 2_958_465;

fn epoch() -> NaiveDate {
    let (y, m, d) = SPREADSHEET_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Digits, optionally with an all-zero fraction ("44012.0"); compiled once
fn serial_pattern() -> Result<&'static Regex, String> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([0-9]+)(?:\.0*)?$"))
        .as_ref()
        .map_err(|e| format!("Regex error: {}", e))
}

/// Parse an integer-like header token into a serial number.
///
/// Returns a message describing the problem on failure.
pub fn parse_serial(token: &str) -> Result<i64, String> {
    let caps = serial_pattern()?
        .captures(token.trim())
        .ok_or_else(|| format!("Header '{}' is not an integer serial date", token))?;
    let serial: i64 = caps[1]
        .parse()
        .map_err(|_| format!("Serial date '{}' is out of range", token))?;
    if serial > MAX_SERIAL {
        return Err(format!(
            "Serial date {} is out of range (0..={})",
            serial, MAX_SERIAL
        ));
    }
    Ok(serial)
}

/// Convert a serial to a calendar date (epoch + serial days)
pub fn serial_to_date(serial: i64) -> Option<NaiveDate> {
    if !(0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    epoch().checked_add_days(Days::new(serial as u64))
}

/// Last calendar day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        // only reachable for December of the last representable year
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date))
}

/// Resolve a header token straight to its month-end date
pub fn header_to_period_end(token: &str) -> Result<NaiveDate, String> {
    let serial = parse_serial(token)?;
    serial_to_date(serial)
        .map(month_end)
        .ok_or_else(|| format!("Serial date {} has no calendar date", serial))
}
