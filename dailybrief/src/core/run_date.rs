//! The calendar-day partition key for pipeline runs.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar-day identifier partitioning all artifacts of one pipeline run.
///
/// Displays and parses as `YYYY-MM-DD`. Immutable once a run starts; two runs
/// for the same date address the same artifact names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RunDate(NaiveDate);

impl RunDate {
    /// Creates a run date from a calendar date.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns today's run date (UTC).
    #[must_use]
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Returns the underlying calendar date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for RunDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

impl From<NaiveDate> for RunDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let date: RunDate = "2024-05-01".parse().unwrap();
        assert_eq!(date.to_string(), "2024-05-01");
    }

    #[test]
    fn test_rejects_malformed_dates() {
        assert!("2024-13-01".parse::<RunDate>().is_err());
        assert!("not-a-date".parse::<RunDate>().is_err());
        assert!("2024/05/01".parse::<RunDate>().is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let date: RunDate = "2024-05-01".parse().unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#""2024-05-01""#);

        let back: RunDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn test_ordering() {
        let earlier: RunDate = "2024-04-30".parse().unwrap();
        let later: RunDate = "2024-05-01".parse().unwrap();
        assert!(earlier < later);
    }
}
