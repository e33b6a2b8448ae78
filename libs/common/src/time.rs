//! Timestamp formatting shared by the wire formats.

use chrono::{DateTime, SecondsFormat, Utc};

/// Render a timestamp as RFC 3339 / ISO 8601 with millisecond precision.
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The current server time, formatted with [`iso8601`].
pub fn now_iso8601() -> String {
    iso8601(Utc::now())
}
