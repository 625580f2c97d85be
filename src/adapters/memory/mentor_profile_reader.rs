//! In-memory implementation of MentorProfileReader.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::WeeklyAvailability;
use crate::ports::{MentorProfileReader, MentorScheduleProfile};

/// In-memory mentor profile reader.
#[derive(Default)]
pub struct InMemoryProfileReader {
    profiles: RwLock<HashMap<String, MentorScheduleProfile>>,
}

impl InMemoryProfileReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_profile(&self, mentor_id: &UserId, profile: MentorScheduleProfile) {
        self.profiles
            .write()
            .unwrap()
            .insert(mentor_id.to_string(), profile);
    }

    /// Seed a profile with just a weekly schedule and default pricing.
    pub fn set_availability(&self, mentor_id: &UserId, availability: WeeklyAvailability) {
        self.set_profile(
            mentor_id,
            MentorScheduleProfile {
                weekly_availability: availability,
                hourly_rate_minor: None,
                currency: None,
            },
        );
    }
}

#[async_trait]
impl MentorProfileReader for InMemoryProfileReader {
    async fn schedule_profile(
        &self,
        mentor_id: &UserId,
    ) -> Result<Option<MentorScheduleProfile>, DomainError> {
        Ok(self
            .profiles
            .read()
            .unwrap()
            .get(mentor_id.as_str())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::AvailabilityBlock;
    use std::collections::HashMap as StdHashMap;

    #[tokio::test]
    async fn returns_seeded_profile() {
        let reader = InMemoryProfileReader::new();
        let mentor_id = UserId::new("mentor-1").unwrap();
        let mut days = StdHashMap::new();
        days.insert(
            "friday".to_string(),
            vec![AvailabilityBlock {
                start_time: "10:00".to_string(),
                end_time: "12:00".to_string(),
                is_available: true,
            }],
        );
        reader.set_availability(&mentor_id, WeeklyAvailability::new(days));

        let profile = reader.schedule_profile(&mentor_id).await.unwrap().unwrap();
        assert!(profile.hourly_rate_minor.is_none());

        let missing = reader
            .schedule_profile(&UserId::new("ghost").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
