//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{UserDirectory, UserRecord};

/// PostgreSQL implementation of UserDirectory.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a new PostgresUserDirectory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        let row = sqlx::query("SELECT id, display_name, is_mentor FROM users WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch user: {}", e),
                )
            })?;

        match row {
            Some(row) => {
                let id: String = row.try_get("id").map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to get id: {}", e))
                })?;
                let display_name: String = row.try_get("display_name").map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to get display_name: {}", e),
                    )
                })?;
                let is_mentor: bool = row.try_get("is_mentor").map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to get is_mentor: {}", e),
                    )
                })?;

                Ok(Some(UserRecord {
                    id: UserId::new(id).map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Invalid user id: {}", e),
                        )
                    })?,
                    display_name,
                    is_mentor,
                }))
            }
            None => Ok(None),
        }
    }
}
