//! Conflict filter: flags slots that collide with existing sessions.

use crate::domain::foundation::{SessionStatus, Timestamp};
use crate::domain::session::Session;

use super::slot::Slot;

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && b_start < a_end`.
///
/// A session ending exactly when another starts does not conflict. The
/// same boundary semantics are used everywhere: generation, filtering,
/// and the commit-time availability re-check.
pub fn intervals_overlap(
    a_start: &Timestamp,
    a_end: &Timestamp,
    b_start: &Timestamp,
    b_end: &Timestamp,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Marks each slot unavailable if it overlaps any of the given sessions.
///
/// Slots are flagged, never removed. Callers pass the mentor's
/// non-cancelled sessions for the target day; cancelled sessions are
/// ignored here as well in case the caller did not pre-filter.
pub fn apply_conflicts(slots: &mut [Slot], sessions: &[Session]) {
    for slot in slots.iter_mut() {
        let slot_end = slot.end_time();
        let conflicted = sessions.iter().any(|session| {
            session.status() != SessionStatus::Cancelled
                && intervals_overlap(
                    &slot.start_time,
                    &slot_end,
                    session.scheduled_time(),
                    &session.end_time(),
                )
        });
        if conflicted {
            slot.is_available = false;
        }
    }
}
