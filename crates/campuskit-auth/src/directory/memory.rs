//! In-memory user directory.
//!
//! Backs tests and single-node setups. Production deployments implement
//! [`UserDirectory`] over their own user database.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use campuskit_core::error::AppError;
use campuskit_core::result::AppResult;
use campuskit_core::traits::directory::UserDirectory;
use campuskit_core::user::{CreateUser, User};

/// In-memory [`UserDirectory`] keyed by subject id.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    users: Arc<DashMap<Uuid, User>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory holds no records.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email.eq_ignore_ascii_case(email))
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, attrs: CreateUser) -> AppResult<User> {
        if self.find_by_email(&attrs.email).await?.is_some() {
            return Err(AppError::conflict("Email already exists"));
        }
        let duplicate_nickname = self
            .users
            .iter()
            .any(|entry| entry.nickname == attrs.nickname);
        if duplicate_nickname {
            return Err(AppError::conflict("Nickname already exists"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: attrs.email,
            nickname: attrs.nickname,
            password_hash: attrs.password_hash,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.users
            .remove(&id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(())
    }
}
