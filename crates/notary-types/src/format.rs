//! Display helpers shared by every rendering surface.

use std::fmt::Display;

use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-scaled byte count: `0 Bytes`, `1 KB`, `1.5 KB`, `2.25 MB`.
///
/// The mantissa is rounded half away from zero to two decimals, then
/// trailing zeros are dropped. Sizes past the GB range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    let fixed = format!("{rounded:.2}");
    let mantissa = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{mantissa} {}", SIZE_UNITS[unit])
}

/// Canonical creation-time string: RFC 3339, UTC, milliseconds, `Z` suffix.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render an ISO-8601 timestamp as `MM/DD/YYYY, hh:mm:ss AM` in local time.
///
/// Unparsable input comes back unchanged.
pub fn format_timestamp(iso: &str) -> String {
    format_timestamp_in(iso, &Local)
}

/// [`format_timestamp`] for an explicit time zone.
pub fn format_timestamp_in<Tz>(iso: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt
            .with_timezone(tz)
            .format("%m/%d/%Y, %I:%M:%S %p")
            .to_string(),
        Err(_) => iso.to_owned(),
    }
}
