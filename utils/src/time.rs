//! Time formatting helpers.

use chrono::{DateTime, Timelike, Utc};

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// `yyyy-MM-ddTHH:mm:ss.<tenths>Z`, e.g. `2013-03-03T06:00:00.0Z`.
pub fn format_iso_tenths(at: &DateTime<Utc>) -> String {
    let tenths = at.nanosecond() % 1_000_000_000 / 100_000_000;
    format!("{}.{tenths}Z", at.format("%Y-%m-%dT%H:%M:%S"))
}

/// Milliseconds with a numeric offset, e.g. `2013-03-03T06:00:00.000+0000`.
pub fn format_iso_millis(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}
