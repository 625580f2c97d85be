//! Structured-log implementation of Notifier.
//!
//! Stands in for an email or push integration: every notification is
//! emitted as a structured log event carrying the fields a real
//! delivery channel would template from.

use async_trait::async_trait;
use tracing::info;

use crate::domain::session::Session;
use crate::ports::{Notifier, NotifyError};

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_booking_confirmation(&self, session: &Session) -> Result<(), NotifyError> {
        info!(
            session_id = %session.id(),
            student_id = %session.student_id(),
            mentor_id = %session.mentor_id(),
            scheduled_time = %session.scheduled_time().to_rfc3339(),
            "notification: booking placed, awaiting mentor acceptance"
        );
        Ok(())
    }

    async fn send_cancellation_notification(&self, session: &Session) -> Result<(), NotifyError> {
        info!(
            session_id = %session.id(),
            student_id = %session.student_id(),
            mentor_id = %session.mentor_id(),
            cancelled_by = ?session.cancelled_by(),
            reason = session.cancellation_reason().unwrap_or(""),
            "notification: session cancelled"
        );
        Ok(())
    }

    async fn send_auto_cancellation_notification(
        &self,
        session: &Session,
    ) -> Result<(), NotifyError> {
        info!(
            session_id = %session.id(),
            student_id = %session.student_id(),
            mentor_id = %session.mentor_id(),
            refund_status = ?session.refund_status(),
            "notification: session auto-cancelled, refund issued"
        );
        Ok(())
    }
}
