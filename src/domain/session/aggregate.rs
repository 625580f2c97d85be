//! Session aggregate entity.
//!
//! A session is a booking between a student and a mentor. It is created
//! by the booking validator in `pending_mentor_acceptance`, mutated only
//! through the lifecycle methods below, and never hard-deleted:
//! cancellation is a terminal status, not removal.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CancelledBy, DomainError, ErrorCode, PaymentStatus, Rating, RefundStatus, SessionId,
    SessionStatus, SessionType, Timestamp, UserId,
};

use super::meeting_link::MeetingLink;

/// Maximum length for the session subject.
pub const MAX_SUBJECT_LENGTH: usize = 500;

/// Allowed session duration bounds, in minutes.
const MIN_DURATION_MINUTES: u32 = 15;
const MAX_DURATION_MINUTES: u32 = 180;

/// Mentors get this long before the session start to accept; past the
/// deadline the auto-decline sweep cancels with refund.
const ACCEPTANCE_LEAD_MINUTES: i64 = 120;

/// Session aggregate.
///
/// # Invariants
///
/// - `auto_decline_at` strictly precedes `scheduled_time` at all times
/// - status only moves forward through `SessionStatus::can_transition_to`
/// - `payment_status` becomes `Refunded` only after a confirmed refund
/// - `end_time` is derived from `scheduled_time + duration`, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,

    /// Derived slot identity (mentor + start instant) used for
    /// idempotent slot-to-session correlation.
    slot_id: String,

    student_id: UserId,
    mentor_id: UserId,

    scheduled_time: Timestamp,
    duration_minutes: u32,

    subject: String,
    session_type: SessionType,

    status: SessionStatus,

    /// Deadline for mentor acceptance, always before `scheduled_time`.
    auto_decline_at: Timestamp,

    meeting_link: Option<MeetingLink>,
    mentor_accepted_at: Option<Timestamp>,

    /// Price in minor currency units, non-negative.
    price_minor: i64,
    currency: String,
    payment_id: Option<String>,
    payment_status: PaymentStatus,
    refund_id: Option<String>,
    refund_status: Option<RefundStatus>,

    cancelled_by: Option<CancelledBy>,
    cancellation_reason: Option<String>,
    cancelled_at: Option<Timestamp>,

    student_rating: Option<Rating>,
    mentor_rating: Option<Rating>,

    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Create a new session in `pending_mentor_acceptance`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the subject is empty or too long
    /// - `OutOfRange` if duration is outside 15-180 minutes
    /// - `ValidationFailed` if price is negative
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SessionId,
        student_id: UserId,
        mentor_id: UserId,
        scheduled_time: Timestamp,
        duration_minutes: u32,
        subject: String,
        session_type: SessionType,
        price_minor: i64,
        currency: String,
    ) -> Result<Self, DomainError> {
        Self::validate_subject(&subject)?;
        let subject = subject.trim().to_string();
        Self::validate_duration(duration_minutes)?;
        if price_minor < 0 {
            return Err(DomainError::validation("price", "Price cannot be negative"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            slot_id: derive_slot_id(&mentor_id, &scheduled_time),
            student_id,
            mentor_id: mentor_id.clone(),
            scheduled_time,
            duration_minutes,
            subject,
            session_type,
            status: SessionStatus::PendingMentorAcceptance,
            auto_decline_at: scheduled_time.minus_minutes(ACCEPTANCE_LEAD_MINUTES),
            meeting_link: None,
            mentor_accepted_at: None,
            price_minor,
            currency,
            payment_id: None,
            payment_status: PaymentStatus::Pending,
            refund_id: None,
            refund_status: None,
            cancelled_by: None,
            cancellation_reason: None,
            cancelled_at: None,
            student_rating: None,
            mentor_rating: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        slot_id: String,
        student_id: UserId,
        mentor_id: UserId,
        scheduled_time: Timestamp,
        duration_minutes: u32,
        subject: String,
        session_type: SessionType,
        status: SessionStatus,
        auto_decline_at: Timestamp,
        meeting_link: Option<MeetingLink>,
        mentor_accepted_at: Option<Timestamp>,
        price_minor: i64,
        currency: String,
        payment_id: Option<String>,
        payment_status: PaymentStatus,
        refund_id: Option<String>,
        refund_status: Option<RefundStatus>,
        cancelled_by: Option<CancelledBy>,
        cancellation_reason: Option<String>,
        cancelled_at: Option<Timestamp>,
        student_rating: Option<Rating>,
        mentor_rating: Option<Rating>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            slot_id,
            student_id,
            mentor_id,
            scheduled_time,
            duration_minutes,
            subject,
            session_type,
            status,
            auto_decline_at,
            meeting_link,
            mentor_accepted_at,
            price_minor,
            currency,
            payment_id,
            payment_status,
            refund_id,
            refund_status,
            cancelled_by,
            cancellation_reason,
            cancelled_at,
            student_rating,
            mentor_rating,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn slot_id(&self) -> &str {
        &self.slot_id
    }

    pub fn student_id(&self) -> &UserId {
        &self.student_id
    }

    pub fn mentor_id(&self) -> &UserId {
        &self.mentor_id
    }

    pub fn scheduled_time(&self) -> &Timestamp {
        &self.scheduled_time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Exclusive end of the session interval, computed on read so it can
    /// never go stale after a reschedule.
    pub fn end_time(&self) -> Timestamp {
        self.scheduled_time.plus_minutes(self.duration_minutes as i64)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn auto_decline_at(&self) -> &Timestamp {
        &self.auto_decline_at
    }

    pub fn meeting_link(&self) -> Option<&MeetingLink> {
        self.meeting_link.as_ref()
    }

    pub fn mentor_accepted_at(&self) -> Option<&Timestamp> {
        self.mentor_accepted_at.as_ref()
    }

    pub fn price_minor(&self) -> i64 {
        self.price_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn refund_id(&self) -> Option<&str> {
        self.refund_id.as_deref()
    }

    pub fn refund_status(&self) -> Option<RefundStatus> {
        self.refund_status
    }

    pub fn cancelled_by(&self) -> Option<CancelledBy> {
        self.cancelled_by
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn cancelled_at(&self) -> Option<&Timestamp> {
        self.cancelled_at.as_ref()
    }

    pub fn student_rating(&self) -> Option<Rating> {
        self.student_rating
    }

    pub fn mentor_rating(&self) -> Option<Rating> {
        self.mentor_rating
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Pending past its acceptance deadline, due for auto-decline.
    pub fn is_overdue(&self, now: &Timestamp) -> bool {
        self.status == SessionStatus::PendingMentorAcceptance && self.auto_decline_at <= *now
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Move the session to a new start time while still pending.
    ///
    /// Recomputes `auto_decline_at` and the derived slot identity so the
    /// deadline invariant holds after every schedule mutation.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is no longer pending
    pub fn reschedule(&mut self, new_time: Timestamp) -> Result<(), DomainError> {
        if self.status != SessionStatus::PendingMentorAcceptance {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only pending sessions can be rescheduled",
            ));
        }
        self.scheduled_time = new_time;
        self.auto_decline_at = new_time.minus_minutes(ACCEPTANCE_LEAD_MINUTES);
        self.slot_id = derive_slot_id(&self.mentor_id, &new_time);
        self.touch();
        Ok(())
    }

    /// Record the charge taken for this booking.
    pub fn record_payment(&mut self, payment_id: impl Into<String>) {
        self.payment_id = Some(payment_id.into());
        self.payment_status = PaymentStatus::Completed;
        self.touch();
    }

    /// Mentor accepts by supplying a validated meeting link
    /// (`pending_mentor_acceptance -> confirmed`).
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is not pending
    pub fn accept_with_meeting_link(&mut self, link: MeetingLink) -> Result<(), DomainError> {
        self.transition_to(SessionStatus::Confirmed)?;
        self.meeting_link = Some(link);
        self.mentor_accepted_at = Some(Timestamp::now());
        Ok(())
    }

    /// `confirmed -> in_progress`.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.transition_to(SessionStatus::InProgress)
    }

    /// `in_progress -> completed`. Ratings may be attached afterwards.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition_to(SessionStatus::Completed)
    }

    /// Cancel from either pre-completion state.
    ///
    /// Records who cancelled and why. Refund compensation is driven by
    /// the caller against the payment collaborator and recorded via
    /// `record_refund_success` / `record_refund_failure`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session cannot be cancelled
    pub fn cancel(&mut self, by: CancelledBy, reason: String) -> Result<(), DomainError> {
        self.transition_to(SessionStatus::Cancelled)?;
        self.cancelled_by = Some(by);
        self.cancellation_reason = Some(reason);
        self.cancelled_at = Some(Timestamp::now());
        Ok(())
    }

    /// Refund confirmed by the payment gateway.
    pub fn record_refund_success(&mut self, refund_id: impl Into<String>) {
        self.refund_id = Some(refund_id.into());
        self.refund_status = Some(RefundStatus::Processed);
        self.payment_status = PaymentStatus::Refunded;
        self.touch();
    }

    /// Refund attempt failed. Payment status stays as it was; money is
    /// never reclassified without gateway confirmation.
    pub fn record_refund_failure(&mut self) {
        self.refund_status = Some(RefundStatus::Failed);
        self.touch();
    }

    /// Attach the student's post-completion rating.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is not completed
    pub fn rate_by_student(&mut self, rating: Rating) -> Result<(), DomainError> {
        self.ensure_completed()?;
        self.student_rating = Some(rating);
        self.touch();
        Ok(())
    }

    /// Attach the mentor's post-completion rating.
    pub fn rate_by_mentor(&mut self, rating: Rating) -> Result<(), DomainError> {
        self.ensure_completed()?;
        self.mentor_rating = Some(rating);
        self.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn transition_to(&mut self, target: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {} to {}", self.status, target),
            ));
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    fn ensure_completed(&self) -> Result<(), DomainError> {
        if self.status != SessionStatus::Completed {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Ratings can only be attached to completed sessions",
            ));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn validate_subject(subject: &str) -> Result<(), DomainError> {
        let trimmed = subject.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("subject", "Subject cannot be empty"));
        }
        if trimmed.len() > MAX_SUBJECT_LENGTH {
            return Err(DomainError::validation(
                "subject",
                format!("Subject must be {} characters or less", MAX_SUBJECT_LENGTH),
            ));
        }
        Ok(())
    }

    fn validate_duration(duration_minutes: u32) -> Result<(), DomainError> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(DomainError::new(
                ErrorCode::OutOfRange,
                format!(
                    "Duration must be between {} and {} minutes, got {}",
                    MIN_DURATION_MINUTES, MAX_DURATION_MINUTES, duration_minutes
                ),
            ));
        }
        Ok(())
    }
}

fn derive_slot_id(mentor_id: &UserId, scheduled_time: &Timestamp) -> String {
    format!("{}_{}", mentor_id, scheduled_time.to_rfc3339())
}
