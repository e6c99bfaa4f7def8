//! Timestamps for stored records.
//!
//! Records carry ISO-8601 strings with an explicit offset computed in a named
//! civil time zone, so daylight-saving transitions show up in the offset.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use chrono_tz::Tz;

/// Current time in `time_zone`, e.g. `2025-01-20T10:00:00.123456-05:00`
pub fn now_in(time_zone: Tz) -> String {
    format_in(Utc::now(), time_zone)
}

pub fn format_in(instant: DateTime<Utc>, time_zone: Tz) -> String {
    instant
        .with_timezone(&time_zone)
        .to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a stored timestamp; `None` for anything that is not RFC 3339
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).ok()
}
