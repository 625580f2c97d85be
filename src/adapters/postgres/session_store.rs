//! PostgreSQL implementation of SessionStore.
//!
//! Slot exclusivity is enforced by a partial unique index on
//! `(mentor_id, scheduled_time) WHERE status != 'cancelled'`, so the
//! conditional insert needs no explicit locking: a lost race surfaces
//! as a unique violation and is reported as `SlotTaken`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    CancelledBy, DomainError, ErrorCode, PaymentStatus, Rating, RefundStatus, SessionId,
    SessionStatus, SessionType, Timestamp, UserId,
};
use crate::domain::session::{MeetingLink, Session};
use crate::ports::{InsertOutcome, SessionStore};

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

const SESSION_COLUMNS: &str = r#"
    id, slot_id, student_id, mentor_id, scheduled_time, duration_minutes,
    subject, session_type, status, auto_decline_at, meeting_link,
    mentor_accepted_at, price_minor, currency, payment_id, payment_status,
    refund_id, refund_status, cancelled_by, cancellation_reason,
    cancelled_at, student_rating, mentor_rating, created_at, updated_at
"#;

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn insert(&self, session: &Session) -> Result<InsertOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (
                id, slot_id, student_id, mentor_id, scheduled_time, duration_minutes,
                subject, session_type, status, auto_decline_at, meeting_link,
                mentor_accepted_at, price_minor, currency, payment_id, payment_status,
                refund_id, refund_status, cancelled_by, cancellation_reason,
                cancelled_at, student_rating, mentor_rating, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.slot_id())
        .bind(session.student_id().as_str())
        .bind(session.mentor_id().as_str())
        .bind(session.scheduled_time().as_datetime())
        .bind(session.duration_minutes() as i32)
        .bind(session.subject())
        .bind(session.session_type().to_string())
        .bind(session_status_to_str(session.status()))
        .bind(session.auto_decline_at().as_datetime())
        .bind(session.meeting_link().map(|l| l.url().to_string()))
        .bind(session.mentor_accepted_at().map(|t| *t.as_datetime()))
        .bind(session.price_minor())
        .bind(session.currency())
        .bind(session.payment_id())
        .bind(payment_status_to_str(session.payment_status()))
        .bind(session.refund_id())
        .bind(session.refund_status().map(refund_status_to_str))
        .bind(session.cancelled_by().map(cancelled_by_to_str))
        .bind(session.cancellation_reason())
        .bind(session.cancelled_at().map(|t| *t.as_datetime()))
        .bind(session.student_rating().map(|r| r.value() as i16))
        .bind(session.mentor_rating().map(|r| r.value() as i16))
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Created),
            Err(e) => {
                if is_unique_violation(&e) {
                    return Ok(InsertOutcome::SlotTaken);
                }
                Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert session: {}", e),
                ))
            }
        }
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                slot_id = $2,
                scheduled_time = $3,
                status = $4,
                auto_decline_at = $5,
                meeting_link = $6,
                mentor_accepted_at = $7,
                payment_id = $8,
                payment_status = $9,
                refund_id = $10,
                refund_status = $11,
                cancelled_by = $12,
                cancellation_reason = $13,
                cancelled_at = $14,
                student_rating = $15,
                mentor_rating = $16,
                updated_at = $17
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.slot_id())
        .bind(session.scheduled_time().as_datetime())
        .bind(session_status_to_str(session.status()))
        .bind(session.auto_decline_at().as_datetime())
        .bind(session.meeting_link().map(|l| l.url().to_string()))
        .bind(session.mentor_accepted_at().map(|t| *t.as_datetime()))
        .bind(session.payment_id())
        .bind(payment_status_to_str(session.payment_status()))
        .bind(session.refund_id())
        .bind(session.refund_status().map(refund_status_to_str))
        .bind(session.cancelled_by().map(cancelled_by_to_str))
        .bind(session.cancellation_reason())
        .bind(session.cancelled_at().map(|t| *t.as_datetime()))
        .bind(session.student_rating().map(|r| r.value() as i16))
        .bind(session.mentor_rating().map(|r| r.value() as i16))
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update session: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch session: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_session(row)?)),
            None => Ok(None),
        }
    }

    async fn find_active_by_mentor_between(
        &self,
        mentor_id: &UserId,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM sessions
            WHERE mentor_id = $1
              AND status != 'cancelled'
              AND scheduled_time >= $2
              AND scheduled_time < $3
            ORDER BY scheduled_time
            "#,
            SESSION_COLUMNS
        ))
        .bind(mentor_id.as_str())
        .bind(from.as_datetime())
        .bind(to.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch mentor sessions: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn find_overdue_pending(&self, now: &Timestamp) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM sessions
            WHERE status = 'pending_mentor_acceptance'
              AND auto_decline_at <= $1
            ORDER BY auto_decline_at
            "#,
            SESSION_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch overdue sessions: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn find_confirmed_missing_link(
        &self,
        from: &Timestamp,
        to: &Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM sessions
            WHERE status = 'confirmed'
              AND meeting_link IS NULL
              AND scheduled_time >= $1
              AND scheduled_time < $2
            ORDER BY scheduled_time
            "#,
            SESSION_COLUMNS
        ))
        .bind(from.as_datetime())
        .bind(to.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch sessions missing links: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn cancel_if_status(
        &self,
        id: &SessionId,
        expected: SessionStatus,
        cancelled_by: CancelledBy,
        reason: &str,
    ) -> Result<Option<Session>, DomainError> {
        let now = Timestamp::now();
        let row = sqlx::query(&format!(
            r#"
            UPDATE sessions SET
                status = 'cancelled',
                cancelled_by = $3,
                cancellation_reason = $4,
                cancelled_at = $5,
                updated_at = $5
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(session_status_to_str(expected))
        .bind(cancelled_by_to_str(cancelled_by))
        .bind(reason)
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to cancel session: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_session(row)?)),
            None => Ok(None),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == UNIQUE_VIOLATION)
        .unwrap_or(false)
}

fn session_status_to_str(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::PendingMentorAcceptance => "pending_mentor_acceptance",
        SessionStatus::Confirmed => "confirmed",
        SessionStatus::InProgress => "in_progress",
        SessionStatus::Completed => "completed",
        SessionStatus::Cancelled => "cancelled",
    }
}

fn str_to_session_status(s: &str) -> Result<SessionStatus, DomainError> {
    match s {
        "pending_mentor_acceptance" => Ok(SessionStatus::PendingMentorAcceptance),
        "confirmed" => Ok(SessionStatus::Confirmed),
        "in_progress" => Ok(SessionStatus::InProgress),
        "completed" => Ok(SessionStatus::Completed),
        "cancelled" => Ok(SessionStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid session status: {}", s),
        )),
    }
}

fn str_to_session_type(s: &str) -> Result<SessionType, DomainError> {
    match s {
        "video" => Ok(SessionType::Video),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid session type: {}", s),
        )),
    }
}

fn payment_status_to_str(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Completed => "completed",
        PaymentStatus::Failed => "failed",
        PaymentStatus::Refunded => "refunded",
    }
}

fn str_to_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        "refunded" => Ok(PaymentStatus::Refunded),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status: {}", s),
        )),
    }
}

fn refund_status_to_str(status: RefundStatus) -> &'static str {
    match status {
        RefundStatus::Pending => "pending",
        RefundStatus::Processed => "processed",
        RefundStatus::Failed => "failed",
    }
}

fn str_to_refund_status(s: &str) -> Result<RefundStatus, DomainError> {
    match s {
        "pending" => Ok(RefundStatus::Pending),
        "processed" => Ok(RefundStatus::Processed),
        "failed" => Ok(RefundStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid refund status: {}", s),
        )),
    }
}

fn cancelled_by_to_str(by: CancelledBy) -> &'static str {
    match by {
        CancelledBy::Student => "student",
        CancelledBy::Mentor => "mentor",
        CancelledBy::System => "system",
    }
}

fn str_to_cancelled_by(s: &str) -> Result<CancelledBy, DomainError> {
    match s {
        "student" => Ok(CancelledBy::Student),
        "mentor" => Ok(CancelledBy::Mentor),
        "system" => Ok(CancelledBy::System),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid cancelled_by: {}", s),
        )),
    }
}

fn db_err(what: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to get {}: {}", what, e),
    )
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| db_err("id", e))?;
    let slot_id: String = row.try_get("slot_id").map_err(|e| db_err("slot_id", e))?;

    let student_id: String = row
        .try_get("student_id")
        .map_err(|e| db_err("student_id", e))?;
    let mentor_id: String = row
        .try_get("mentor_id")
        .map_err(|e| db_err("mentor_id", e))?;

    let scheduled_time: chrono::DateTime<chrono::Utc> = row
        .try_get("scheduled_time")
        .map_err(|e| db_err("scheduled_time", e))?;
    let duration_minutes: i32 = row
        .try_get("duration_minutes")
        .map_err(|e| db_err("duration_minutes", e))?;

    let subject: String = row.try_get("subject").map_err(|e| db_err("subject", e))?;
    let session_type: String = row
        .try_get("session_type")
        .map_err(|e| db_err("session_type", e))?;

    let status: String = row.try_get("status").map_err(|e| db_err("status", e))?;
    let auto_decline_at: chrono::DateTime<chrono::Utc> = row
        .try_get("auto_decline_at")
        .map_err(|e| db_err("auto_decline_at", e))?;

    let meeting_link: Option<String> = row
        .try_get("meeting_link")
        .map_err(|e| db_err("meeting_link", e))?;
    let mentor_accepted_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("mentor_accepted_at")
        .map_err(|e| db_err("mentor_accepted_at", e))?;

    let price_minor: i64 = row
        .try_get("price_minor")
        .map_err(|e| db_err("price_minor", e))?;
    let currency: String = row.try_get("currency").map_err(|e| db_err("currency", e))?;
    let payment_id: Option<String> = row
        .try_get("payment_id")
        .map_err(|e| db_err("payment_id", e))?;
    let payment_status: String = row
        .try_get("payment_status")
        .map_err(|e| db_err("payment_status", e))?;
    let refund_id: Option<String> = row
        .try_get("refund_id")
        .map_err(|e| db_err("refund_id", e))?;
    let refund_status: Option<String> = row
        .try_get("refund_status")
        .map_err(|e| db_err("refund_status", e))?;

    let cancelled_by: Option<String> = row
        .try_get("cancelled_by")
        .map_err(|e| db_err("cancelled_by", e))?;
    let cancellation_reason: Option<String> = row
        .try_get("cancellation_reason")
        .map_err(|e| db_err("cancellation_reason", e))?;
    let cancelled_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("cancelled_at")
        .map_err(|e| db_err("cancelled_at", e))?;

    let student_rating: Option<i16> = row
        .try_get("student_rating")
        .map_err(|e| db_err("student_rating", e))?;
    let mentor_rating: Option<i16> = row
        .try_get("mentor_rating")
        .map_err(|e| db_err("mentor_rating", e))?;

    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| db_err("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| db_err("updated_at", e))?;

    let meeting_link = meeting_link
        .map(|url| {
            MeetingLink::parse(url).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Stored meeting link is invalid: {}", e),
                )
            })
        })
        .transpose()?;

    let to_rating = |value: i16, what: &str| {
        Rating::new(value as u8).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Stored {} is invalid: {}", what, e),
            )
        })
    };

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        slot_id,
        UserId::new(student_id)
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid student_id: {}", e)))?,
        UserId::new(mentor_id)
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid mentor_id: {}", e)))?,
        Timestamp::from_datetime(scheduled_time),
        duration_minutes as u32,
        subject,
        str_to_session_type(&session_type)?,
        str_to_session_status(&status)?,
        Timestamp::from_datetime(auto_decline_at),
        meeting_link,
        mentor_accepted_at.map(Timestamp::from_datetime),
        price_minor,
        currency,
        payment_id,
        str_to_payment_status(&payment_status)?,
        refund_id,
        refund_status.as_deref().map(str_to_refund_status).transpose()?,
        cancelled_by.as_deref().map(str_to_cancelled_by).transpose()?,
        cancellation_reason,
        cancelled_at.map(Timestamp::from_datetime),
        student_rating.map(|v| to_rating(v, "student_rating")).transpose()?,
        mentor_rating.map(|v| to_rating(v, "mentor_rating")).transpose()?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_conversion_roundtrips() {
        for status in [
            SessionStatus::PendingMentorAcceptance,
            SessionStatus::Confirmed,
            SessionStatus::InProgress,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(
                str_to_session_status(session_status_to_str(status)).unwrap(),
                status
            );
        }
    }

    #[test]
    fn payment_status_conversion_roundtrips() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(
                str_to_payment_status(payment_status_to_str(status)).unwrap(),
                status
            );
        }
    }

    #[test]
    fn cancelled_by_conversion_roundtrips() {
        for by in [CancelledBy::Student, CancelledBy::Mentor, CancelledBy::System] {
            assert_eq!(str_to_cancelled_by(cancelled_by_to_str(by)).unwrap(), by);
        }
    }

    #[test]
    fn invalid_strings_are_rejected() {
        assert!(str_to_session_status("archived").is_err());
        assert!(str_to_payment_status("chargeback").is_err());
        assert!(str_to_refund_status("maybe").is_err());
        assert!(str_to_cancelled_by("admin").is_err());
        assert!(str_to_session_type("in_person").is_err());
    }
}
