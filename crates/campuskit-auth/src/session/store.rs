//! Session bookkeeping on top of the credential store.
//!
//! Two kinds of entries, both TTL-bounded:
//!
//! - **Session Record**: key = subject id, value = the subject's current
//!   refresh token, TTL = refresh lifetime. At most one per subject; every
//!   write overwrites the previous record.
//! - **Revocation Marker**: key = a raw access token string, value =
//!   [`REVOKED_SENTINEL`], TTL = the token's remaining lifetime at logout.
//!
//! The credential store owns physical storage and TTL expiry; this type owns
//! the rules for creating and overwriting entries.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use campuskit_core::result::AppResult;
use campuskit_core::traits::store::CredentialStore;
use campuskit_store::keys;

/// Value stored under a Revocation Marker key.
pub const REVOKED_SENTINEL: &str = "logout";

/// Abstracts session persistence over the credential store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<dyn CredentialStore>,
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Writes the Session Record for a subject, superseding any prior one.
    pub async fn put_refresh_token(
        &self,
        subject: Uuid,
        refresh_token: &str,
        ttl: Duration,
    ) -> AppResult<()> {
        self.store
            .set_with_ttl(&keys::session_record(subject), refresh_token, ttl)
            .await
    }

    /// Returns the subject's currently stored refresh token, if any.
    pub async fn current_refresh_token(&self, subject: Uuid) -> AppResult<Option<String>> {
        self.store.get(&keys::session_record(subject)).await
    }

    /// Removes the subject's Session Record.
    pub async fn clear_session(&self, subject: Uuid) -> AppResult<()> {
        self.store.delete(&keys::session_record(subject)).await
    }

    /// Marks a specific access token string as revoked for its remaining
    /// lifetime.
    pub async fn revoke_access_token(
        &self,
        access_token: &str,
        remaining: Duration,
    ) -> AppResult<()> {
        self.store
            .set_with_ttl(&keys::revoked_token(access_token), REVOKED_SENTINEL, remaining)
            .await
    }

    /// Checks whether an access token string carries a live Revocation Marker.
    pub async fn is_revoked(&self, access_token: &str) -> AppResult<bool> {
        self.store.exists(&keys::revoked_token(access_token)).await
    }

    /// Stores a pending email verification code.
    pub async fn put_verification_code(
        &self,
        email: &str,
        code: &str,
        ttl: Duration,
    ) -> AppResult<()> {
        self.store
            .set_with_ttl(&keys::email_verification(email), code, ttl)
            .await
    }

    /// Returns the pending verification code for an email, if unexpired.
    pub async fn verification_code(&self, email: &str) -> AppResult<Option<String>> {
        self.store.get(&keys::email_verification(email)).await
    }

    /// Removes a pending verification code.
    pub async fn clear_verification_code(&self, email: &str) -> AppResult<()> {
        self.store.delete(&keys::email_verification(email)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuskit_core::clock::ManualClock;
    use campuskit_store::memory::MemoryStoreProvider;

    fn fixture() -> (SessionStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::from_system_time());
        let provider = MemoryStoreProvider::new(300, clock.clone());
        (SessionStore::new(Arc::new(provider)), clock)
    }

    #[tokio::test]
    async fn test_session_record_overwrite() {
        let (sessions, _clock) = fixture();
        let subject = Uuid::new_v4();

        sessions
            .put_refresh_token(subject, "r1", Duration::from_secs(100))
            .await
            .unwrap();
        sessions
            .put_refresh_token(subject, "r2", Duration::from_secs(100))
            .await
            .unwrap();

        assert_eq!(
            sessions.current_refresh_token(subject).await.unwrap(),
            Some("r2".to_string())
        );
    }

    #[tokio::test]
    async fn test_revocation_marker_expires_with_token() {
        let (sessions, clock) = fixture();

        sessions
            .revoke_access_token("tok.en.abc", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(sessions.is_revoked("tok.en.abc").await.unwrap());

        clock.advance(chrono::Duration::seconds(61));
        assert!(!sessions.is_revoked("tok.en.abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_revocation_is_per_token_string() {
        let (sessions, _clock) = fixture();

        sessions
            .revoke_access_token("tok.a", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(!sessions.is_revoked("tok.b").await.unwrap());
    }
}
