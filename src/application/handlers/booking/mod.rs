//! Booking command and query handlers.
//!
//! The handlers share one `BookingPolicy` so the slot length offered by
//! the availability query is the same one the booking validator prices
//! and commits against.

mod accept_booking;
mod cancel_booking;
mod create_booking;
mod get_booking;
mod list_slots;

pub use accept_booking::{AcceptBookingCommand, AcceptBookingHandler};
pub use cancel_booking::{CancelBookingCommand, CancelBookingHandler};
pub use create_booking::{CreateBookingCommand, CreateBookingHandler};
pub use get_booking::{GetBookingHandler, GetBookingQuery};
pub use list_slots::{ListSlotsHandler, ListSlotsQuery};

/// Booking policy shared across the handlers.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Fixed offered slot length, in minutes.
    pub slot_minutes: u32,

    /// Presentation buffer: slots starting sooner than this are not
    /// listed.
    pub slot_lead_minutes: i64,

    /// Firm commit rule: bookings must start at least this far out.
    pub booking_lead_minutes: i64,

    /// Fallback hourly rate for mentors without a configured one, in
    /// minor currency units.
    pub default_hourly_rate_minor: i64,

    /// Fallback ISO currency code, lowercase.
    pub default_currency: String,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            slot_minutes: 60,
            slot_lead_minutes: 30,
            booking_lead_minutes: 120,
            default_hourly_rate_minor: 5000,
            default_currency: "usd".to_string(),
        }
    }
}

/// Widest allowed session length; bounds the lookback when collecting
/// sessions that may spill into a queried day.
pub(crate) const MAX_SESSION_MINUTES: i64 = 180;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::foundation::{
        CancelledBy, DomainError, ErrorCode, SessionId, SessionStatus, Timestamp, UserId,
    };
    use crate::domain::scheduling::WeeklyAvailability;
    use crate::domain::session::Session;
    use crate::ports::{
        Charge, ChargeRequest, InsertOutcome, MentorProfileReader, MentorScheduleProfile,
        Notifier, NotifyError, PaymentError, PaymentProvider, Refund, SessionStore, UserDirectory,
        UserRecord,
    };

    pub struct MockSessionStore {
        pub sessions: Mutex<HashMap<SessionId, Session>>,
        pub fail_insert: bool,
        pub force_slot_taken: bool,
    }

    impl MockSessionStore {
        pub fn new() -> Self {
            Self {
                sessions: Mutex::new(HashMap::new()),
                fail_insert: false,
                force_slot_taken: false,
            }
        }

        pub fn with_session(session: Session) -> Self {
            let store = Self::new();
            store
                .sessions
                .lock()
                .unwrap()
                .insert(*session.id(), session);
            store
        }

        pub fn slot_taken() -> Self {
            Self {
                force_slot_taken: true,
                ..Self::new()
            }
        }

        pub fn get(&self, id: &SessionId) -> Option<Session> {
            self.sessions.lock().unwrap().get(id).cloned()
        }

        pub fn count(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SessionStore for MockSessionStore {
        async fn insert(&self, session: &Session) -> Result<InsertOutcome, DomainError> {
            if self.fail_insert {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated insert failure",
                ));
            }
            if self.force_slot_taken {
                return Ok(InsertOutcome::SlotTaken);
            }
            let mut sessions = self.sessions.lock().unwrap();
            let taken = sessions.values().any(|s| {
                s.slot_id() == session.slot_id() && s.status() != SessionStatus::Cancelled
            });
            if taken {
                return Ok(InsertOutcome::SlotTaken);
            }
            sessions.insert(*session.id(), session.clone());
            Ok(InsertOutcome::Created)
        }

        async fn update(&self, session: &Session) -> Result<(), DomainError> {
            let mut sessions = self.sessions.lock().unwrap();
            if !sessions.contains_key(session.id()) {
                return Err(DomainError::new(
                    ErrorCode::SessionNotFound,
                    "Session not found",
                ));
            }
            sessions.insert(*session.id(), session.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
            Ok(self.sessions.lock().unwrap().get(id).cloned())
        }

        async fn find_active_by_mentor_between(
            &self,
            mentor_id: &UserId,
            from: &Timestamp,
            to: &Timestamp,
        ) -> Result<Vec<Session>, DomainError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions
                .values()
                .filter(|s| {
                    s.mentor_id() == mentor_id
                        && s.status() != SessionStatus::Cancelled
                        && s.scheduled_time() >= from
                        && s.scheduled_time() < to
                })
                .cloned()
                .collect())
        }

        async fn find_overdue_pending(
            &self,
            now: &Timestamp,
        ) -> Result<Vec<Session>, DomainError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions
                .values()
                .filter(|s| s.is_overdue(now))
                .cloned()
                .collect())
        }

        async fn find_confirmed_missing_link(
            &self,
            from: &Timestamp,
            to: &Timestamp,
        ) -> Result<Vec<Session>, DomainError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions
                .values()
                .filter(|s| {
                    s.status() == SessionStatus::Confirmed
                        && s.meeting_link().is_none()
                        && s.scheduled_time() >= from
                        && s.scheduled_time() < to
                })
                .cloned()
                .collect())
        }

        async fn cancel_if_status(
            &self,
            id: &SessionId,
            expected: SessionStatus,
            cancelled_by: CancelledBy,
            reason: &str,
        ) -> Result<Option<Session>, DomainError> {
            let mut sessions = self.sessions.lock().unwrap();
            let Some(session) = sessions.get_mut(id) else {
                return Ok(None);
            };
            if session.status() != expected {
                return Ok(None);
            }
            session
                .cancel(cancelled_by, reason.to_string())
                .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.message))?;
            Ok(Some(session.clone()))
        }
    }

    pub struct MockPaymentProvider {
        pub charges: Mutex<Vec<ChargeRequest>>,
        pub refunds: Mutex<Vec<String>>,
        pub fail_charge: Option<PaymentError>,
        pub fail_refund: Option<PaymentError>,
    }

    impl MockPaymentProvider {
        pub fn new() -> Self {
            Self {
                charges: Mutex::new(Vec::new()),
                refunds: Mutex::new(Vec::new()),
                fail_charge: None,
                fail_refund: None,
            }
        }

        pub fn declining() -> Self {
            Self {
                fail_charge: Some(PaymentError::card_declined("Your card was declined")),
                ..Self::new()
            }
        }

        pub fn failing_refund() -> Self {
            Self {
                fail_refund: Some(PaymentError::network("gateway timeout")),
                ..Self::new()
            }
        }

        pub fn charge_count(&self) -> usize {
            self.charges.lock().unwrap().len()
        }

        pub fn refunded_payment_ids(&self) -> Vec<String> {
            self.refunds.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentProvider for MockPaymentProvider {
        async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError> {
            if let Some(err) = &self.fail_charge {
                return Err(err.clone());
            }
            let mut charges = self.charges.lock().unwrap();
            charges.push(request);
            Ok(Charge {
                payment_id: format!("pay_{}", charges.len()),
            })
        }

        async fn refund(
            &self,
            payment_id: &str,
            _amount_minor: Option<i64>,
        ) -> Result<Refund, PaymentError> {
            if let Some(err) = &self.fail_refund {
                return Err(err.clone());
            }
            let mut refunds = self.refunds.lock().unwrap();
            refunds.push(payment_id.to_string());
            Ok(Refund {
                refund_id: format!("re_{}", refunds.len()),
            })
        }
    }

    #[derive(Default)]
    pub struct MockNotifier {
        pub confirmations: Mutex<Vec<SessionId>>,
        pub cancellations: Mutex<Vec<SessionId>>,
        pub auto_cancellations: Mutex<Vec<SessionId>>,
        pub fail: bool,
    }

    impl MockNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send_booking_confirmation(&self, session: &Session) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError("simulated delivery failure".to_string()));
            }
            self.confirmations.lock().unwrap().push(*session.id());
            Ok(())
        }

        async fn send_cancellation_notification(
            &self,
            session: &Session,
        ) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError("simulated delivery failure".to_string()));
            }
            self.cancellations.lock().unwrap().push(*session.id());
            Ok(())
        }

        async fn send_auto_cancellation_notification(
            &self,
            session: &Session,
        ) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError("simulated delivery failure".to_string()));
            }
            self.auto_cancellations.lock().unwrap().push(*session.id());
            Ok(())
        }
    }

    pub struct MockUserDirectory {
        pub users: Vec<UserRecord>,
    }

    impl MockUserDirectory {
        pub fn with_users(users: Vec<UserRecord>) -> Self {
            Self { users }
        }

        pub fn student_and_mentor(student_id: &UserId, mentor_id: &UserId) -> Self {
            Self {
                users: vec![
                    UserRecord {
                        id: student_id.clone(),
                        display_name: "Student".to_string(),
                        is_mentor: false,
                    },
                    UserRecord {
                        id: mentor_id.clone(),
                        display_name: "Mentor".to_string(),
                        is_mentor: true,
                    },
                ],
            }
        }
    }

    #[async_trait]
    impl UserDirectory for MockUserDirectory {
        async fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
            Ok(self.users.iter().find(|u| &u.id == id).cloned())
        }
    }

    pub struct MockProfileReader {
        pub profiles: HashMap<String, MentorScheduleProfile>,
    }

    impl MockProfileReader {
        pub fn empty() -> Self {
            Self {
                profiles: HashMap::new(),
            }
        }

        pub fn with_profile(mentor_id: &UserId, availability: WeeklyAvailability) -> Self {
            let mut profiles = HashMap::new();
            profiles.insert(
                mentor_id.to_string(),
                MentorScheduleProfile {
                    weekly_availability: availability,
                    hourly_rate_minor: Some(5000),
                    currency: Some("usd".to_string()),
                },
            );
            Self { profiles }
        }
    }

    #[async_trait]
    impl MentorProfileReader for MockProfileReader {
        async fn schedule_profile(
            &self,
            mentor_id: &UserId,
        ) -> Result<Option<MentorScheduleProfile>, DomainError> {
            Ok(self.profiles.get(mentor_id.as_str()).cloned())
        }
    }
}
