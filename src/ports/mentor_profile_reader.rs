//! Mentor schedule profile port.
//!
//! Weekly availability is owned by the mentor profile; the booking core
//! only reads it to generate candidate slots.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::WeeklyAvailability;

/// Scheduling-relevant slice of a mentor profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorScheduleProfile {
    pub weekly_availability: WeeklyAvailability,

    /// Hourly rate in minor currency units; `None` means the mentor
    /// has not configured one and the default fallback applies.
    pub hourly_rate_minor: Option<i64>,

    /// ISO currency code; `None` falls back to the configured default.
    pub currency: Option<String>,
}

/// Read-only port onto mentor profiles.
#[async_trait]
pub trait MentorProfileReader: Send + Sync {
    /// Schedule profile for a mentor. Returns `None` if the user has no
    /// mentor profile.
    async fn schedule_profile(
        &self,
        mentor_id: &UserId,
    ) -> Result<Option<MentorScheduleProfile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn mentor_profile_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn MentorProfileReader) {}
    }
}
