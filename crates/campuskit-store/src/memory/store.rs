//! In-memory credential store with per-entry TTL.
//!
//! Entries carry an absolute expiry deadline computed from the injected
//! clock and are reaped lazily on access. Because expiry is measured against
//! [`Clock`] rather than wall time, tests advance a [`ManualClock`] instead
//! of sleeping.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use campuskit_core::clock::Clock;
use campuskit_core::result::AppResult;
use campuskit_core::traits::store::CredentialStore;

/// A stored value with its expiry deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-memory credential store provider.
#[derive(Debug, Clone)]
pub struct MemoryStoreProvider {
    entries: Arc<DashMap<String, Entry>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryStoreProvider {
    /// Create a new in-memory store.
    pub fn new(default_ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            default_ttl: Duration::from_secs(default_ttl_seconds),
            clock,
        }
    }

    /// Returns the live value for a key, reaping it if expired.
    fn live_value(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
            debug!(key, "Reaped expired entry");
        }
        None
    }
}

#[async_trait]
impl CredentialStore for MemoryStoreProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live_value(key).is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuskit_core::clock::ManualClock;

    fn make_store() -> (MemoryStoreProvider, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::from_system_time());
        let store = MemoryStoreProvider::new(300, clock.clone());
        (store, clock)
    }

    #[tokio::test]
    async fn test_set_get() {
        let (store, _clock) = make_store();
        store
            .set_with_ttl("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        let val = store.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _clock) = make_store();
        store
            .set_with_ttl("key2", "value2", Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("key2").await.unwrap();
        assert_eq!(store.get("key2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (store, clock) = make_store();
        store
            .set_with_ttl("token", "r1", Duration::from_secs(120))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(119));
        assert!(store.exists("token").await.unwrap());

        clock.advance(chrono::Duration::seconds(2));
        assert_eq!(store.get("token").await.unwrap(), None);
        assert!(!store.exists("token").await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let (store, clock) = make_store();
        store
            .set_with_ttl("k", "old", Duration::from_secs(30))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(25));
        store
            .set_with_ttl("k", "new", Duration::from_secs(30))
            .await
            .unwrap();

        // Past the original deadline, inside the reset one.
        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_set_uses_default_ttl() {
        let (store, clock) = make_store();
        store.set("d", "v").await.unwrap();

        clock.advance(chrono::Duration::seconds(301));
        assert_eq!(store.get("d").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let (store, _clock) = make_store();
        store.delete("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_health_check() {
        let (store, _clock) = make_store();
        assert!(store.health_check().await.unwrap());
    }
}
