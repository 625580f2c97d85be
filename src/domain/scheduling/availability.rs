//! Weekly availability data as owned by the mentor profile.
//!
//! The core reads this structure to generate candidate slots and never
//! mutates it. Block times are kept as raw "HH:MM" strings exactly as
//! stored on the profile; parsing happens at generation time so that a
//! malformed block degrades to a skipped block rather than a failed
//! profile load.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Wall-clock time of day parsed from "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Returns the underlying NaiveTime.
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ValidationError::invalid_format("time", "expected HH:MM"))?;
        let hour: u32 = h
            .parse()
            .map_err(|_| ValidationError::invalid_format("time", "hour is not a number"))?;
        let minute: u32 = m
            .parse()
            .map_err(|_| ValidationError::invalid_format("time", "minute is not a number"))?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| ValidationError::invalid_format("time", "hour or minute out of range"))?;
        Ok(Self(time))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// One availability window within a weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    /// Block start, "HH:MM".
    pub start_time: String,

    /// Block end, "HH:MM".
    pub end_time: String,

    /// Whether the mentor accepts bookings in this block.
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Recurring weekly schedule: lowercase weekday name to ordered blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyAvailability(HashMap<String, Vec<AvailabilityBlock>>);

impl WeeklyAvailability {
    pub fn new(days: HashMap<String, Vec<AvailabilityBlock>>) -> Self {
        Self(days)
    }

    /// Blocks configured for the given weekday, empty if the day is absent.
    ///
    /// A missing day is a mentor who is simply off that day, not an error.
    pub fn blocks_for(&self, weekday: Weekday) -> &[AvailabilityBlock] {
        self.0
            .get(weekday_name(weekday))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Lowercase weekday name matching the stored schedule keys.
pub(crate) fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        let t: TimeOfDay = "09:30".parse().unwrap();
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn rejects_malformed_times() {
        assert!("9am".parse::<TimeOfDay>().is_err());
        assert!("25:00".parse::<TimeOfDay>().is_err());
        assert!("09:60".parse::<TimeOfDay>().is_err());
        assert!("".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn times_order_chronologically() {
        let nine: TimeOfDay = "09:00".parse().unwrap();
        let eleven: TimeOfDay = "11:00".parse().unwrap();
        assert!(nine < eleven);
    }

    #[test]
    fn absent_day_yields_no_blocks() {
        let schedule = WeeklyAvailability::default();
        assert!(schedule.blocks_for(Weekday::Mon).is_empty());
    }

    #[test]
    fn blocks_deserialize_from_profile_json() {
        let json = r#"{
            "monday": [
                { "start_time": "09:00", "end_time": "11:00", "is_available": true }
            ]
        }"#;
        let schedule: WeeklyAvailability = serde_json::from_str(json).unwrap();
        let blocks = schedule.blocks_for(Weekday::Mon);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_time, "09:00");
        assert!(blocks[0].is_available);
    }

    #[test]
    fn is_available_defaults_to_true() {
        let json = r#"{ "friday": [ { "start_time": "10:00", "end_time": "12:00" } ] }"#;
        let schedule: WeeklyAvailability = serde_json::from_str(json).unwrap();
        assert!(schedule.blocks_for(Weekday::Fri)[0].is_available);
    }
}
