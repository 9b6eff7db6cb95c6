//! Date helper functions

use chrono::{DateTime, Utc};

/// Format a date in long UK English form
///
/// # Examples
/// ```ignore
/// format_date(&date) // -> "3 January 2024"
/// ```
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Format a date for a `datetime` attribute
pub fn date_iso(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a date as an RFC 822 timestamp in GMT, as RSS readers expect
pub fn date_rfc822(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
