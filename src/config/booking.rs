//! Booking policy and monitor configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Booking configuration
///
/// Covers the slot/lead-time policy applied by the booking handlers and
/// the cadence of the auto-decline monitor.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Offered slot length in minutes
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,

    /// Slots starting sooner than this are not listed (minutes)
    #[serde(default = "default_slot_lead_minutes")]
    pub slot_lead_minutes: i64,

    /// Bookings must start at least this far out (minutes)
    #[serde(default = "default_booking_lead_minutes")]
    pub booking_lead_minutes: i64,

    /// Fallback hourly rate in minor currency units
    #[serde(default = "default_hourly_rate_minor")]
    pub default_hourly_rate_minor: i64,

    /// Fallback ISO currency code, lowercase
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Auto-decline sweep interval in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-session budget for cancel-refund-notify in seconds
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// Confirmed sessions starting within this window without a meeting
    /// link are flagged (minutes)
    #[serde(default = "default_link_warning_minutes")]
    pub link_warning_minutes: i64,
}

impl BookingConfig {
    /// Get sweep interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get per-session timeout as Duration
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Validate booking configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(15..=180).contains(&self.slot_minutes) {
            return Err(ValidationError::InvalidSlotLength);
        }
        if self.slot_lead_minutes < 0 || self.booking_lead_minutes < 0 {
            return Err(ValidationError::NegativeLeadTime);
        }
        if self.default_hourly_rate_minor < 0 {
            return Err(ValidationError::NegativeRate);
        }
        if self.default_currency.len() != 3
            || !self
                .default_currency
                .chars()
                .all(|c| c.is_ascii_lowercase())
        {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.poll_interval_secs == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            slot_lead_minutes: default_slot_lead_minutes(),
            booking_lead_minutes: default_booking_lead_minutes(),
            default_hourly_rate_minor: default_hourly_rate_minor(),
            default_currency: default_currency(),
            poll_interval_secs: default_poll_interval(),
            session_timeout_secs: default_session_timeout(),
            link_warning_minutes: default_link_warning_minutes(),
        }
    }
}

fn default_slot_minutes() -> u32 {
    60
}

fn default_slot_lead_minutes() -> i64 {
    30
}

fn default_booking_lead_minutes() -> i64 {
    120
}

fn default_hourly_rate_minor() -> i64 {
    5000
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_poll_interval() -> u64 {
    300
}

fn default_session_timeout() -> u64 {
    30
}

fn default_link_warning_minutes() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_marketplace_policy() {
        let config = BookingConfig::default();
        assert_eq!(config.slot_minutes, 60);
        assert_eq!(config.slot_lead_minutes, 30);
        assert_eq!(config.booking_lead_minutes, 120);
        assert_eq!(config.default_currency, "usd");
        assert_eq!(config.poll_interval(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_slot_length() {
        for bad in [0, 14, 181] {
            let config = BookingConfig {
                slot_minutes: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "slot length {} accepted", bad);
        }
    }

    #[test]
    fn rejects_negative_lead_times() {
        let config = BookingConfig {
            booking_lead_minutes: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_uppercase_currency() {
        let config = BookingConfig {
            default_currency: "USD".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let config = BookingConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
