//! AutoDeclineMonitor - Background sweep for unanswered bookings.
//!
//! Mentors get a fixed window before the session start to accept. This
//! service periodically collects pending sessions past that deadline
//! and cancels them through the shared cancellation path, which refunds
//! the student and notifies both parties.
//!
//! ## Graceful Shutdown
//!
//! The service listens on a watch channel and runs one final sweep
//! before stopping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{error, info, warn};

use crate::application::handlers::booking::{CancelBookingCommand, CancelBookingHandler};
use crate::domain::foundation::{CancelledBy, DomainError, Timestamp};
use crate::domain::session::BookingError;
use crate::ports::SessionStore;

/// Cancellation reason recorded on auto-declined sessions.
const AUTO_DECLINE_REASON: &str = "Mentor did not respond in time";

/// Configuration for the AutoDeclineMonitor service.
#[derive(Debug, Clone)]
pub struct AutoDeclineMonitorConfig {
    /// How often to sweep for overdue sessions.
    pub poll_interval: Duration,

    /// Per-session budget for the cancel-refund-notify sequence. One
    /// stuck gateway call must not stall the rest of the sweep.
    pub session_timeout: Duration,

    /// Confirmed sessions starting within this many minutes without a
    /// meeting link are reported as anomalies.
    pub link_warning_minutes: i64,
}

impl Default for AutoDeclineMonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            session_timeout: Duration::from_secs(30),
            link_warning_minutes: 30,
        }
    }
}

impl AutoDeclineMonitorConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Sessions auto-cancelled this sweep.
    pub cancelled: usize,

    /// Sessions that could not be cancelled; they stay overdue and are
    /// retried next sweep unless their state moved on.
    pub failed: usize,

    /// Confirmed sessions approaching start without a meeting link.
    pub missing_link: usize,
}

/// Background service that auto-declines unanswered bookings.
pub struct AutoDeclineMonitor {
    store: Arc<dyn SessionStore>,
    canceller: Arc<CancelBookingHandler>,
    config: AutoDeclineMonitorConfig,
}

impl AutoDeclineMonitor {
    pub fn new(store: Arc<dyn SessionStore>, canceller: Arc<CancelBookingHandler>) -> Self {
        Self {
            store,
            canceller,
            config: AutoDeclineMonitorConfig::default(),
        }
    }

    pub fn with_config(
        store: Arc<dyn SessionStore>,
        canceller: Arc<CancelBookingHandler>,
        config: AutoDeclineMonitorConfig,
    ) -> Self {
        Self {
            store,
            canceller,
            config,
        }
    }

    /// Run the sweep loop until a shutdown signal is received.
    ///
    /// A failed sweep is logged and retried on the next tick; only
    /// shutdown ends the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        // One final sweep so nothing overdue is left behind
                        if let Err(e) = self.run_once().await {
                            error!(error = %e, "final auto-decline sweep failed");
                        }
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "auto-decline sweep failed");
                    }
                }
            }
        }
    }

    /// Run exactly one sweep against the current clock.
    pub async fn run_once(&self) -> Result<SweepReport, DomainError> {
        self.sweep_at(Timestamp::now()).await
    }

    /// Clock-injected sweep. Failures are isolated per session: one bad
    /// cancellation never blocks the rest of the batch.
    pub async fn sweep_at(&self, now: Timestamp) -> Result<SweepReport, DomainError> {
        let overdue = self.store.find_overdue_pending(&now).await?;
        let mut report = SweepReport::default();

        for session in overdue {
            let session_id = *session.id();
            let cancel = self.canceller.handle(CancelBookingCommand {
                session_id,
                cancelled_by: CancelledBy::System,
                reason: AUTO_DECLINE_REASON.to_string(),
                requested_by: None,
            });

            match time::timeout(self.config.session_timeout, cancel).await {
                Ok(Ok(cancelled)) => {
                    info!(
                        session_id = %session_id,
                        mentor_id = %cancelled.mentor_id(),
                        "auto-declined unanswered booking"
                    );
                    report.cancelled += 1;
                }
                // The session moved on (accepted or cancelled) between
                // the query and the compare-and-set. Not a failure.
                Ok(Err(BookingError::InvalidState(_))) => {}
                Ok(Err(e)) => {
                    warn!(session_id = %session_id, error = %e, "auto-decline failed");
                    report.failed += 1;
                }
                Err(_) => {
                    warn!(session_id = %session_id, "auto-decline timed out");
                    report.failed += 1;
                }
            }
        }

        report.missing_link = self.report_missing_links(&now).await;

        Ok(report)
    }

    /// Flag confirmed sessions approaching start without a join URL.
    /// Observational only; nothing is mutated.
    async fn report_missing_links(&self, now: &Timestamp) -> usize {
        let horizon = now.plus_minutes(self.config.link_warning_minutes);
        match self.store.find_confirmed_missing_link(now, &horizon).await {
            Ok(sessions) => {
                for session in &sessions {
                    warn!(
                        session_id = %session.id(),
                        mentor_id = %session.mentor_id(),
                        scheduled_time = %session.scheduled_time().to_rfc3339(),
                        "confirmed session approaching start without meeting link"
                    );
                }
                sessions.len()
            }
            Err(e) => {
                warn!(error = %e, "missing-link check failed");
                0
            }
        }
    }
}
