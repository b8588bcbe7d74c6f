//! Date normalization helpers
//!
//! Everything in the tracker works at day granularity. Incoming values are
//! coerced to a calendar date (UTC) and outgoing dates are rendered as the
//! timestamp of that day's midnight.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serializer;

/// Format used for dates in the database and in date-only query strings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Truncate a timestamp to its calendar day
pub fn normalize(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// The timestamp of midnight (UTC) at the start of `date`
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Coerce a loosely formatted date value into a calendar date
///
/// Accepts a plain date (`2024-01-08`), an RFC 3339 timestamp, a naive
/// timestamp without offset, a bare year (`2024`) or year-month (`2024-03`),
/// or an integer count of milliseconds since the Unix epoch. Returns `None`
/// when the value can't be interpreted or falls outside years 0-9999.
pub fn coerce(raw: &str) -> Option<NaiveDate> {
    parse_loose(raw.trim()).filter(is_storable)
}

fn parse_loose(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(normalize(timestamp.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.date());
        }
    }

    // Bare year or year-month, as in `2024` or `2024-03`
    if let Some(date) = parse_partial(raw) {
        return Some(date);
    }

    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(normalize)
}

fn parse_partial(raw: &str) -> Option<NaiveDate> {
    let (year, month) = match raw.split_once('-') {
        Some((year, month)) if month.len() == 2 && month.bytes().all(|b| b.is_ascii_digit()) => {
            (year, month.parse().ok()?)
        }
        Some(_) => return None,
        None => (raw, 1),
    };

    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

/// Whether `date` renders as a four digit `YYYY-MM-DD`
///
/// Stored dates are compared as text, which only orders correctly for
/// years 0 through 9999.
pub fn is_storable(date: &NaiveDate) -> bool {
    (0..=9999).contains(&date.year())
}

/// Parse a date column written with [`DATE_FORMAT`]
pub fn parse_stored(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Serialize a day-granularity date as its midnight timestamp
pub fn serialize_midnight<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&midnight(*date).to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}
