//! Timestamp utilities

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's calendar date (UTC)
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// RFC 3339 with millisecond precision, the form stored in the database
///
/// Fixed-width output keeps lexicographic order equal to chronological order.
pub fn to_storage(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored RFC 3339 timestamp
pub fn from_storage(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}

/// True when both dates fall in the same calendar month
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
