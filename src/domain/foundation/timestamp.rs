//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of minutes.
    ///
    /// Negative values subtract minutes.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Creates a new timestamp by subtracting the specified number of minutes.
    pub fn minus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 - Duration::minutes(minutes))
    }

    /// Returns the timestamp at midnight UTC on the given date.
    pub fn start_of_day(date: NaiveDate) -> Self {
        // Midnight is always a valid wall-clock time.
        Self(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
    }

    /// Returns the timestamp at midnight UTC of the following day.
    pub fn end_of_day(date: NaiveDate) -> Self {
        Self::start_of_day(date).plus_minutes(24 * 60)
    }

    /// Returns the calendar date of this timestamp in UTC.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// RFC 3339 rendering with second precision, used for stable slot ids.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(s)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn ordering_follows_time() {
        let earlier = ts("2024-03-04T09:00:00Z");
        let later = ts("2024-03-04T10:00:00Z");
        assert!(earlier < later);
        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
    }

    #[test]
    fn plus_and_minus_minutes_are_inverse() {
        let t = ts("2024-03-04T09:00:00Z");
        assert_eq!(t.plus_minutes(90).minus_minutes(90), t);
    }

    #[test]
    fn start_of_day_is_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let start = Timestamp::start_of_day(date);
        assert_eq!(start.as_datetime().hour(), 0);
        assert_eq!(start.as_datetime().minute(), 0);
        assert_eq!(start.date(), date);
    }

    #[test]
    fn end_of_day_is_next_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let end = Timestamp::end_of_day(date);
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn rfc3339_rendering_is_stable() {
        let t = ts("2024-03-04T09:00:00Z");
        assert_eq!(t.to_rfc3339(), "2024-03-04T09:00:00Z");
    }

    #[test]
    fn serializes_as_rfc3339_json_string() {
        let t = ts("2024-03-04T09:00:00Z");
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("2024-03-04"));
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
