//! Availability generator: weekly schedule + date -> candidate slots.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::domain::foundation::{SessionType, Timestamp, UserId};

use super::availability::{TimeOfDay, WeeklyAvailability};
use super::slot::{Slot, SlotPricing};

/// Tunables for slot generation.
#[derive(Debug, Clone)]
pub struct SlotPolicy {
    /// Fixed slot length in minutes.
    pub slot_minutes: u32,

    /// Slots starting closer to "now" than this are not offered.
    ///
    /// A presentation-side buffer, distinct from the firmer booking
    /// lead time enforced at commit.
    pub min_lead_minutes: i64,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            slot_minutes: 60,
            min_lead_minutes: 30,
        }
    }
}

/// Generates candidate slots for a mentor on a target date.
///
/// Pure: the caller supplies the clock. Within each available block,
/// fixed-length slots are emitted back-to-back from the block start
/// while a full slot still fits before the block end. Malformed blocks
/// (unparseable times or start >= end) are logged and skipped, never
/// fatal. Output is chronological within a block, blocks in
/// schedule-list order.
pub fn generate_slots(
    mentor_id: &UserId,
    schedule: &WeeklyAvailability,
    pricing: &SlotPricing,
    date: NaiveDate,
    now: Timestamp,
    policy: &SlotPolicy,
) -> Vec<Slot> {
    let earliest_start = now.plus_minutes(policy.min_lead_minutes);
    let slot_price = pricing.hourly_rate_minor * policy.slot_minutes as i64 / 60;
    let mut slots = Vec::new();

    for block in schedule.blocks_for(date.weekday()) {
        if !block.is_available {
            continue;
        }

        let (start, end) = match (
            block.start_time.parse::<TimeOfDay>(),
            block.end_time.parse::<TimeOfDay>(),
        ) {
            (Ok(s), Ok(e)) => (s, e),
            _ => {
                warn!(
                    mentor_id = %mentor_id,
                    start_time = %block.start_time,
                    end_time = %block.end_time,
                    "skipping availability block with unparseable times"
                );
                continue;
            }
        };

        if start >= end {
            warn!(
                mentor_id = %mentor_id,
                start_time = %block.start_time,
                end_time = %block.end_time,
                "skipping availability block with start at or after end"
            );
            continue;
        }

        let block_end = Timestamp::from_datetime(date.and_time(end.as_naive()).and_utc());
        let mut cursor = Timestamp::from_datetime(date.and_time(start.as_naive()).and_utc());

        while cursor.plus_minutes(policy.slot_minutes as i64) <= block_end {
            if cursor >= earliest_start {
                slots.push(Slot {
                    id: Slot::derive_id(mentor_id, &cursor),
                    mentor_id: mentor_id.clone(),
                    start_time: cursor,
                    duration_minutes: policy.slot_minutes,
                    price_minor: slot_price,
                    currency: pricing.currency.clone(),
                    session_type: SessionType::Video,
                    is_available: true,
                });
            }
            cursor = cursor.plus_minutes(policy.slot_minutes as i64);
        }
    }

    slots
}
