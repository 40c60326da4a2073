//! Bugs Everywhere timestamp handling.
//!
//! BE stores every timestamp as an RFC 2822 style string that is always in
//! UTC, e.g. `Wed, 01 Apr 2009 22:12:16 +0000`. The offset is part of the
//! format literally: any other offset is rejected rather than converted.

use chrono::{DateTime, NaiveDateTime, Utc};

/// The `strftime` pattern Bugs Everywhere uses for timestamps.
pub const BE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

/// Parses a BE timestamp.
///
/// Leading and trailing whitespace is ignored; everything else must match
/// [`BE_DATE_FORMAT`] exactly.
pub fn parse_be_date(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), BE_DATE_FORMAT).map(|naive| naive.and_utc())
}

/// Formats a timestamp the way BE writes it.
pub fn format_be_date(at: &DateTime<Utc>) -> String {
    at.format(BE_DATE_FORMAT).to_string()
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_iso_datetime(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats the date part of a timestamp as `YYYY-MM-DD`.
pub fn format_iso_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
