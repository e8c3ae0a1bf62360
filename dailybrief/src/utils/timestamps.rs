//! Timestamp helpers.

use chrono::{SecondsFormat, Utc};

/// Returns the current UTC time as an ISO 8601 string with millisecond
/// precision, e.g. `2024-05-01T09:30:00.123Z`.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(ts.contains('T'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
