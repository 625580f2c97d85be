//! Meeting link value object with provider allow-listing.
//!
//! Mentors supply a video meeting URL when accepting a booking. Only
//! allow-listed provider patterns are accepted; anything else is a
//! validation error surfaced to the caller and the session stays
//! pending.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Google Meet codes look like `abc-defg-hij`; the lookup variant is
/// `lookup/<token>`.
static GOOGLE_MEET_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://meet\.google\.com/(?:[a-z]{3}-[a-z]{4}-[a-z]{3}|lookup/[A-Za-z0-9_-]+)$")
        .unwrap()
});

/// Allow-listed meeting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingProvider {
    GoogleMeet,
}

impl fmt::Display for MeetingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingProvider::GoogleMeet => write!(f, "google_meet"),
        }
    }
}

/// Validated meeting URL plus the provider it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingLink {
    url: String,
    provider: MeetingProvider,
}

impl MeetingLink {
    /// Validates a mentor-supplied URL against the provider allow-list.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidFormat` for anything that is not
    /// an allow-listed meeting URL.
    pub fn parse(url: impl Into<String>) -> Result<Self, ValidationError> {
        let url = url.into();
        let trimmed = url.trim();
        if GOOGLE_MEET_URL.is_match(trimmed) {
            return Ok(Self {
                url: trimmed.to_string(),
                provider: MeetingProvider::GoogleMeet,
            });
        }
        Err(ValidationError::invalid_format(
            "meeting_url",
            "not an allow-listed meeting provider URL",
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn provider(&self) -> MeetingProvider {
        self.provider
    }
}

impl fmt::Display for MeetingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_meet_code() {
        let link = MeetingLink::parse("https://meet.google.com/abc-defg-hij").unwrap();
        assert_eq!(link.url(), "https://meet.google.com/abc-defg-hij");
        assert_eq!(link.provider(), MeetingProvider::GoogleMeet);
    }

    #[test]
    fn accepts_lookup_variant() {
        assert!(MeetingLink::parse("https://meet.google.com/lookup/team-sync42").is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let link = MeetingLink::parse("  https://meet.google.com/abc-defg-hij  ").unwrap();
        assert_eq!(link.url(), "https://meet.google.com/abc-defg-hij");
    }

    #[test]
    fn rejects_other_providers() {
        assert!(MeetingLink::parse("http://zoom.us/xyz").is_err());
        assert!(MeetingLink::parse("https://zoom.us/j/123456").is_err());
    }

    #[test]
    fn rejects_plain_http() {
        assert!(MeetingLink::parse("http://meet.google.com/abc-defg-hij").is_err());
    }

    #[test]
    fn rejects_wrong_code_shape() {
        assert!(MeetingLink::parse("https://meet.google.com/abcdefghij").is_err());
        assert!(MeetingLink::parse("https://meet.google.com/ab-cd-ef").is_err());
    }

    #[test]
    fn rejects_trailing_path_garbage() {
        assert!(MeetingLink::parse("https://meet.google.com/abc-defg-hij/extra").is_err());
        assert!(MeetingLink::parse("https://meet.google.com.evil.com/abc-defg-hij").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(MeetingLink::parse("").is_err());
    }
}
