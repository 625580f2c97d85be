//! Candidate bookable slot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionType, Timestamp, UserId};

/// Pricing inputs for slot generation, resolved by the caller from the
/// mentor profile with a configured fallback rate.
#[derive(Debug, Clone)]
pub struct SlotPricing {
    /// Price of one hour, in minor currency units.
    pub hourly_rate_minor: i64,

    /// ISO currency code, lowercase.
    pub currency: String,
}

/// A candidate bookable time interval derived from weekly availability.
///
/// Conflicting slots are flagged, never removed, so clients can render
/// greyed-out times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Stable identity: mentor id plus RFC 3339 start instant.
    pub id: String,

    pub mentor_id: UserId,

    pub start_time: Timestamp,

    pub duration_minutes: u32,

    /// Price in minor currency units.
    pub price_minor: i64,

    pub currency: String,

    pub session_type: SessionType,

    pub is_available: bool,
}

impl Slot {
    /// Derives the stable slot identity for a mentor and start instant.
    pub fn derive_id(mentor_id: &UserId, start_time: &Timestamp) -> String {
        format!("{}_{}", mentor_id, start_time.to_rfc3339())
    }

    /// Exclusive end of the slot interval.
    pub fn end_time(&self) -> Timestamp {
        self.start_time.plus_minutes(self.duration_minutes as i64)
    }
}
