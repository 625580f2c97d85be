//! Slot generation and conflict filtering.
//!
//! Pure functions deriving bookable slots from a mentor's recurring
//! weekly availability and flagging the ones that collide with existing
//! sessions. Nothing here touches storage; callers supply the data and
//! the clock.

mod availability;
mod conflict;
mod generator;
mod slot;

pub use availability::{AvailabilityBlock, TimeOfDay, WeeklyAvailability};
pub use conflict::{apply_conflicts, intervals_overlap};
pub use generator::{generate_slots, SlotPolicy};
pub use slot::{Slot, SlotPricing};
