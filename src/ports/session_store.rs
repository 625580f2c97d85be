//! Session store port.
//!
//! The session record store is the single shared mutable resource of
//! the booking core. Two operations carry its concurrency contract:
//!
//! - `insert` is conditional on the slot identity (mentor + start) not
//!   being held by another non-cancelled session, turning the
//!   validate-then-write race into a detectable `SlotTaken` outcome.
//! - `cancel_if_status` is an atomic compare-and-set on status, so a
//!   session can never be double-cancelled or double-refunded by
//!   overlapping sweeps.

use async_trait::async_trait;

use crate::domain::foundation::{
    CancelledBy, DomainError, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::session::Session;

/// Result of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The session was written.
    Created,
    /// Another non-cancelled session already holds this mentor + start.
    SlotTaken,
}

/// Repository port for session persistence.
///
/// Fetch failures must propagate as errors; the store never degrades to
/// "assume available", since that risks double-booking.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session unless its slot is already taken.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, session: &Session) -> Result<InsertOutcome, DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// All non-cancelled sessions for a mentor scheduled within
    /// `[from, to)`.
    async fn find_active_by_mentor_between(
        &self,
        mentor_id: &UserId,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Session>, DomainError>;

    /// Pending sessions whose acceptance deadline has passed.
    async fn find_overdue_pending(&self, now: &Timestamp) -> Result<Vec<Session>, DomainError>;

    /// Confirmed sessions starting within `[from, to)` that have no
    /// meeting link yet.
    async fn find_confirmed_missing_link(
        &self,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Session>, DomainError>;

    /// Atomically cancel the session if its status still equals
    /// `expected` at write time.
    ///
    /// Returns the cancelled session, or `None` when the
    /// compare-and-set did not match (already cancelled, accepted in
    /// the meantime, and so on). A `None` is not an error: the caller
    /// decides whether the miss matters.
    async fn cancel_if_status(
        &self,
        id: &SessionId,
        expected: SessionStatus,
        cancelled_by: CancelledBy,
        reason: &str,
    ) -> Result<Option<Session>, DomainError>;
}
