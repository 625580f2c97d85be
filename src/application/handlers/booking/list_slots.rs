//! ListSlotsHandler - Query handler for a mentor's bookable slots.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::scheduling::{apply_conflicts, generate_slots, Slot, SlotPolicy, SlotPricing};
use crate::domain::session::BookingError;
use crate::ports::{MentorProfileReader, SessionStore};

use super::{BookingPolicy, MAX_SESSION_MINUTES};

/// Query for a mentor's slots on a single date.
#[derive(Debug, Clone)]
pub struct ListSlotsQuery {
    pub mentor_id: UserId,
    pub date: NaiveDate,
}

/// Handler for listing slots.
///
/// Slots are derived fresh on every query from the mentor's recurring
/// weekly availability, then checked against that mentor's existing
/// sessions. Conflicting slots are returned flagged unavailable rather
/// than removed, so clients can render the full grid.
pub struct ListSlotsHandler {
    profiles: Arc<dyn MentorProfileReader>,
    store: Arc<dyn SessionStore>,
    policy: BookingPolicy,
}

impl ListSlotsHandler {
    pub fn new(
        profiles: Arc<dyn MentorProfileReader>,
        store: Arc<dyn SessionStore>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            profiles,
            store,
            policy,
        }
    }

    pub async fn handle(&self, query: ListSlotsQuery) -> Result<Vec<Slot>, BookingError> {
        self.handle_at(query, Timestamp::now()).await
    }

    /// Clock-injected variant; `handle` passes the real clock.
    pub async fn handle_at(
        &self,
        query: ListSlotsQuery,
        now: Timestamp,
    ) -> Result<Vec<Slot>, BookingError> {
        // 1. Resolve the mentor's schedule profile
        let profile = self
            .profiles
            .schedule_profile(&query.mentor_id)
            .await?
            .ok_or_else(|| BookingError::mentor_not_found(query.mentor_id.clone()))?;

        let pricing = SlotPricing {
            hourly_rate_minor: profile
                .hourly_rate_minor
                .unwrap_or(self.policy.default_hourly_rate_minor),
            currency: profile
                .currency
                .unwrap_or_else(|| self.policy.default_currency.clone()),
        };
        let slot_policy = SlotPolicy {
            slot_minutes: self.policy.slot_minutes,
            min_lead_minutes: self.policy.slot_lead_minutes,
        };

        // 2. Generate candidate slots for the date
        let mut slots = generate_slots(
            &query.mentor_id,
            &profile.weekly_availability,
            &pricing,
            query.date,
            now,
            &slot_policy,
        );

        if slots.is_empty() {
            return Ok(slots);
        }

        // 3. Flag slots colliding with existing sessions. The window
        // starts early enough to catch the longest session spilling
        // into the queried day.
        let from = Timestamp::start_of_day(query.date).minus_minutes(MAX_SESSION_MINUTES);
        let to = Timestamp::end_of_day(query.date);
        let sessions = self
            .store
            .find_active_by_mentor_between(&query.mentor_id, &from, &to)
            .await?;

        apply_conflicts(&mut slots, &sessions);

        Ok(slots)
    }
}
