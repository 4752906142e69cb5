//! Timestamp detection for string values

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

// A candidate timestamp must start with a four digit year
static YEAR_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}").unwrap());

/// Date-time layouts tried when no UTC offset is present
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Date-time layouts carrying an explicit offset
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

/// Date-only layouts (midnight local time)
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Check the cheap precondition for a timestamp: at least four characters,
/// the first four of them ASCII digits
pub fn has_year_prefix(value: &str) -> bool {
    value.len() >= 4 && YEAR_PREFIX_REGEX.is_match(value)
}

/// Parse a string into a local wall-clock timestamp
///
/// Returns `None` unless the string has a four digit year prefix, parses in
/// one of the accepted layouts, and falls at or after the Unix epoch.
/// Values with an offset are converted to local time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if !has_year_prefix(value) {
        return None;
    }
    let value = value.trim();

    let local = parse_with_offset(value).or_else(|| {
        parse_naive(value).and_then(|naive| Local.from_local_datetime(&naive).earliest())
    })?;

    if local.timestamp() >= 0 {
        Some(local.naive_local())
    } else {
        None
    }
}

fn parse_with_offset(value: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }
    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.with_timezone(&Local))
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
