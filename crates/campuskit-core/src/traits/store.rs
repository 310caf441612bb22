//! Credential store trait for pluggable TTL key-value backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the credential store backend (Redis or in-memory).
///
/// Keys and values are strings. TTL enforcement belongs to the store, not
/// the caller: a `get` after the TTL has elapsed returns `None` whether or
/// not the backend has physically removed the entry yet.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with the backend's default TTL.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Set a value with an explicit TTL. Overwrites any prior value and
    /// resets the TTL — this is the write primitive behind Session Record
    /// rotation.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists and has not expired.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
