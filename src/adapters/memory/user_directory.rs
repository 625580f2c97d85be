//! In-memory implementation of UserDirectory.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{UserDirectory, UserRecord};

/// In-memory user directory.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: UserRecord) {
        self.users
            .write()
            .unwrap()
            .insert(user.id.to_string(), user);
    }

    /// Seed a student account.
    pub fn add_student(&self, id: &UserId, display_name: &str) {
        self.add_user(UserRecord {
            id: id.clone(),
            display_name: display_name.to_string(),
            is_mentor: false,
        });
    }

    /// Seed a mentor account.
    pub fn add_mentor(&self, id: &UserId, display_name: &str) {
        self.add_user(UserRecord {
            id: id.clone(),
            display_name: display_name.to_string(),
            is_mentor: true,
        });
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.users.read().unwrap().get(id.as_str()).cloned())
    }
}
