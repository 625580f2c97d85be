//! PostgreSQL implementation of MentorProfileReader.
//!
//! Weekly availability is stored as JSONB exactly as the profile
//! service writes it; deserialization happens here so a malformed
//! schedule surfaces as a database error rather than a panic.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::scheduling::WeeklyAvailability;
use crate::ports::{MentorProfileReader, MentorScheduleProfile};

/// PostgreSQL implementation of MentorProfileReader.
#[derive(Clone)]
pub struct PostgresProfileReader {
    pool: PgPool,
}

impl PostgresProfileReader {
    /// Creates a new PostgresProfileReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentorProfileReader for PostgresProfileReader {
    async fn schedule_profile(
        &self,
        mentor_id: &UserId,
    ) -> Result<Option<MentorScheduleProfile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT weekly_availability, hourly_rate_minor, currency
            FROM mentor_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(mentor_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch mentor profile: {}", e),
            )
        })?;

        match row {
            Some(row) => {
                let availability_json: serde_json::Value =
                    row.try_get("weekly_availability").map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to get weekly_availability: {}", e),
                        )
                    })?;
                let weekly_availability: WeeklyAvailability =
                    serde_json::from_value(availability_json).map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Stored weekly availability is malformed: {}", e),
                        )
                    })?;

                let hourly_rate_minor: Option<i64> =
                    row.try_get("hourly_rate_minor").map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to get hourly_rate_minor: {}", e),
                        )
                    })?;
                let currency: Option<String> = row.try_get("currency").map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to get currency: {}", e),
                    )
                })?;

                Ok(Some(MentorScheduleProfile {
                    weekly_availability,
                    hourly_rate_minor,
                    currency,
                }))
            }
            None => Ok(None),
        }
    }
}
