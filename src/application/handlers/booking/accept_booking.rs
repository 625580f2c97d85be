//! AcceptBookingHandler - Command handler for mentor acceptance.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{BookingError, MeetingLink, Session};
use crate::ports::SessionStore;

/// Command for a mentor to accept a pending booking.
#[derive(Debug, Clone)]
pub struct AcceptBookingCommand {
    pub session_id: SessionId,
    pub mentor_id: UserId,
    pub meeting_url: String,
}

/// Handler for mentor acceptance.
///
/// Acceptance requires a validated meeting link up front; a confirmed
/// session without a join URL is useless to the student.
pub struct AcceptBookingHandler {
    store: Arc<dyn SessionStore>,
}

impl AcceptBookingHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: AcceptBookingCommand) -> Result<Session, BookingError> {
        // 1. Link validation first; nothing is read or written for a bad URL
        let link = MeetingLink::parse(&cmd.meeting_url)
            .map_err(|e| BookingError::validation("meeting_url", e.to_string()))?;

        // 2. Load and authorize
        let mut session = self
            .store
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.session_id))?;

        if session.mentor_id() != &cmd.mentor_id {
            return Err(BookingError::Forbidden);
        }

        // 3. Confirm and persist
        session.accept_with_meeting_link(link)?;
        self.store.update(&session).await?;

        Ok(session)
    }
}
