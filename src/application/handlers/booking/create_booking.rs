//! CreateBookingHandler - Command handler for placing a booking.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::foundation::{SessionId, SessionType, Timestamp, UserId};
use crate::domain::scheduling::{
    generate_slots, intervals_overlap, Slot, SlotPolicy, SlotPricing,
};
use crate::domain::session::{BookingError, Session};
use crate::ports::{
    ChargeRequest, InsertOutcome, MentorProfileReader, Notifier, PaymentProvider, SessionStore,
    UserDirectory,
};

use super::{BookingPolicy, MAX_SESSION_MINUTES};

/// Command to book a mentor's slot.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub student_id: UserId,
    pub mentor_id: UserId,
    pub scheduled_time: Timestamp,
    pub subject: String,
    pub session_type: SessionType,
    /// Opaque payment method reference supplied by the client.
    pub payment_method: String,
}

/// Handler for placing bookings.
///
/// Side-effect order is deliberate: validate everything first, charge,
/// then commit through the store's conditional insert. A `SlotTaken`
/// outcome after a successful charge triggers a compensating refund, so
/// the losing side of a race is never left paid without a session.
pub struct CreateBookingHandler {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserDirectory>,
    profiles: Arc<dyn MentorProfileReader>,
    payments: Arc<dyn PaymentProvider>,
    notifier: Arc<dyn Notifier>,
    policy: BookingPolicy,
}

impl CreateBookingHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserDirectory>,
        profiles: Arc<dyn MentorProfileReader>,
        payments: Arc<dyn PaymentProvider>,
        notifier: Arc<dyn Notifier>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            store,
            users,
            profiles,
            payments,
            notifier,
            policy,
        }
    }

    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<Session, BookingError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    /// Clock-injected variant; `handle` passes the real clock.
    pub async fn handle_at(
        &self,
        cmd: CreateBookingCommand,
        now: Timestamp,
    ) -> Result<Session, BookingError> {
        // 1. Both parties must exist, and the mentor must actually be one
        let student = self
            .users
            .find_user(&cmd.student_id)
            .await?
            .ok_or_else(|| BookingError::student_not_found(cmd.student_id.clone()))?;
        if student.is_mentor && student.id == cmd.mentor_id {
            return Err(BookingError::validation(
                "mentor_id",
                "Mentors cannot book themselves",
            ));
        }

        let mentor = self
            .users
            .find_user(&cmd.mentor_id)
            .await?
            .ok_or_else(|| BookingError::mentor_not_found(cmd.mentor_id.clone()))?;
        if !mentor.is_mentor {
            return Err(BookingError::mentor_not_found(cmd.mentor_id.clone()));
        }

        // 2. Firm lead-time rule, checked against commit time
        if cmd.scheduled_time < now.plus_minutes(self.policy.booking_lead_minutes) {
            return Err(BookingError::lead_time(self.policy.booking_lead_minutes));
        }

        // 3. The requested start must be a slot the mentor actually offers
        let slot = self
            .offered_slot(&cmd.mentor_id, &cmd.scheduled_time, &now)
            .await?
            .ok_or(BookingError::SlotUnavailable)?;

        // 4. Pre-check against existing sessions. The conditional insert
        // below still backstops the race window.
        if self.slot_is_booked(&slot).await? {
            return Err(BookingError::SlotUnavailable);
        }

        let mut session = Session::new(
            SessionId::new(),
            cmd.student_id,
            cmd.mentor_id,
            cmd.scheduled_time,
            slot.duration_minutes,
            cmd.subject,
            cmd.session_type,
            slot.price_minor,
            slot.currency.clone(),
        )
        .map_err(BookingError::from)?;

        // 5. Charge before commit; a declined card never reserves a slot
        let charge = self
            .payments
            .charge(ChargeRequest {
                amount_minor: slot.price_minor,
                currency: slot.currency.clone(),
                payment_method: cmd.payment_method,
                description: format!("Mentoring session {}", session.id()),
            })
            .await
            .map_err(|e| BookingError::payment(e.message))?;
        session.record_payment(&charge.payment_id);

        // 6. Commit. SlotTaken means we lost the race after charging, so
        // compensate with a refund before reporting the conflict.
        match self.store.insert(&session).await? {
            InsertOutcome::Created => {}
            InsertOutcome::SlotTaken => {
                if let Err(e) = self.payments.refund(&charge.payment_id, None).await {
                    error!(
                        session_id = %session.id(),
                        payment_id = %charge.payment_id,
                        error = %e,
                        "compensating refund failed after losing slot race"
                    );
                }
                return Err(BookingError::SlotConflict);
            }
        }

        // 7. Best-effort notification; the booking stands either way
        if let Err(e) = self.notifier.send_booking_confirmation(&session).await {
            warn!(session_id = %session.id(), error = %e, "booking confirmation not delivered");
        }

        Ok(session)
    }

    async fn offered_slot(
        &self,
        mentor_id: &UserId,
        scheduled_time: &Timestamp,
        now: &Timestamp,
    ) -> Result<Option<Slot>, BookingError> {
        let profile = self
            .profiles
            .schedule_profile(mentor_id)
            .await?
            .ok_or_else(|| BookingError::mentor_not_found(mentor_id.clone()))?;

        let pricing = SlotPricing {
            hourly_rate_minor: profile
                .hourly_rate_minor
                .unwrap_or(self.policy.default_hourly_rate_minor),
            currency: profile
                .currency
                .unwrap_or_else(|| self.policy.default_currency.clone()),
        };
        let slot_policy = SlotPolicy {
            slot_minutes: self.policy.slot_minutes,
            min_lead_minutes: self.policy.slot_lead_minutes,
        };

        let slots = generate_slots(
            mentor_id,
            &profile.weekly_availability,
            &pricing,
            scheduled_time.date(),
            *now,
            &slot_policy,
        );

        Ok(slots
            .into_iter()
            .find(|s| s.start_time == *scheduled_time))
    }

    async fn slot_is_booked(&self, slot: &Slot) -> Result<bool, BookingError> {
        let from = slot.start_time.minus_minutes(MAX_SESSION_MINUTES);
        let to = slot.end_time();
        let sessions = self
            .store
            .find_active_by_mentor_between(&slot.mentor_id, &from, &to)
            .await?;

        Ok(sessions.iter().any(|s| {
            intervals_overlap(
                &slot.start_time,
                &slot.end_time(),
                s.scheduled_time(),
                &s.end_time(),
            )
        }))
    }
}
