//! User existence lookup port.
//!
//! The booking core never dereferences user identity beyond existence
//! and role checks performed here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, UserId};

/// Minimal user record the booking core needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: String,
    pub is_mentor: bool,
}

/// Port for looking up user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by id. Returns `None` if absent.
    async fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError>;
}
