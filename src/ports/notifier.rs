//! Notification port.
//!
//! Fire-and-forget: failures are logged by callers and never propagate
//! as booking or cancellation failures.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::session::Session;

/// Error from a notification delivery attempt.
#[derive(Debug, Clone, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Port for delivering booking lifecycle notifications to both parties.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A booking was placed and awaits mentor acceptance.
    async fn send_booking_confirmation(&self, session: &Session) -> Result<(), NotifyError>;

    /// A session was cancelled by one of the parties.
    async fn send_cancellation_notification(&self, session: &Session) -> Result<(), NotifyError>;

    /// A session was auto-cancelled because the mentor did not respond.
    async fn send_auto_cancellation_notification(
        &self,
        session: &Session,
    ) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn Notifier) {}
    }
}
