//! CancelBookingHandler - Command handler for cancelling a booking.
//!
//! One cancellation path for every caller: the HTTP surface, the admin
//! force-cancel, and the auto-decline sweep all come through here, so
//! the refund and notification side effects cannot drift apart.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::foundation::{CancelledBy, PaymentStatus, SessionId, UserId};
use crate::domain::session::{BookingError, Session};
use crate::ports::{Notifier, PaymentProvider, SessionStore};

/// Command to cancel a session.
#[derive(Debug, Clone)]
pub struct CancelBookingCommand {
    pub session_id: SessionId,
    pub cancelled_by: CancelledBy,
    pub reason: String,
    /// External requester; `None` for internal callers, which skip the
    /// party check.
    pub requested_by: Option<UserId>,
}

/// Handler for cancellations.
///
/// The status flip goes through the store's compare-and-set, so two
/// overlapping cancel attempts resolve to exactly one winner and one
/// refund. The refund happens after the committed cancel: money moves
/// only for a session that is already terminally cancelled.
pub struct CancelBookingHandler {
    store: Arc<dyn SessionStore>,
    payments: Arc<dyn PaymentProvider>,
    notifier: Arc<dyn Notifier>,
}

impl CancelBookingHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        payments: Arc<dyn PaymentProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            payments,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: CancelBookingCommand) -> Result<Session, BookingError> {
        // 1. Load and authorize
        let session = self
            .store
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.session_id))?;

        if let Some(requester) = &cmd.requested_by {
            if session.student_id() != requester && session.mentor_id() != requester {
                return Err(BookingError::Forbidden);
            }
        }

        if !session.status().is_cancellable() {
            return Err(BookingError::invalid_state(format!(
                "Session in status {} cannot be cancelled",
                session.status()
            )));
        }

        // 2. Compare-and-set against the status we just observed. A miss
        // means someone else moved the session first.
        let mut cancelled = self
            .store
            .cancel_if_status(
                &cmd.session_id,
                session.status(),
                cmd.cancelled_by,
                &cmd.reason,
            )
            .await?
            .ok_or_else(|| {
                BookingError::invalid_state("Session changed state during cancellation")
            })?;

        info!(
            session_id = %cancelled.id(),
            cancelled_by = ?cmd.cancelled_by,
            reason = %cmd.reason,
            "session cancelled"
        );

        // 3. Refund the charge, if one was taken
        self.refund_if_paid(&mut cancelled).await;

        // 4. Best-effort notification
        let notify_result = match cmd.cancelled_by {
            CancelledBy::System => {
                self.notifier
                    .send_auto_cancellation_notification(&cancelled)
                    .await
            }
            _ => {
                self.notifier
                    .send_cancellation_notification(&cancelled)
                    .await
            }
        };
        if let Err(e) = notify_result {
            warn!(session_id = %cancelled.id(), error = %e, "cancellation notification not delivered");
        }

        Ok(cancelled)
    }

    /// Refund and record the outcome. The cancel is already committed;
    /// refund metadata updates are logged on failure, never bubbled, so
    /// a flaky write cannot resurrect the session.
    async fn refund_if_paid(&self, session: &mut Session) {
        if session.payment_status() != PaymentStatus::Completed {
            return;
        }
        let Some(payment_id) = session.payment_id().map(str::to_string) else {
            return;
        };

        match self.payments.refund(&payment_id, None).await {
            Ok(refund) => {
                session.record_refund_success(&refund.refund_id);
                info!(
                    session_id = %session.id(),
                    refund_id = %refund.refund_id,
                    "refund processed"
                );
            }
            Err(e) => {
                session.record_refund_failure();
                error!(
                    session_id = %session.id(),
                    payment_id = %payment_id,
                    error = %e,
                    "refund failed for cancelled session"
                );
            }
        }

        if let Err(e) = self.store.update(session).await {
            error!(
                session_id = %session.id(),
                error = %e,
                "failed to persist refund metadata"
            );
        }
    }
}
