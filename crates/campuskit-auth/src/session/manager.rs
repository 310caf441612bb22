//! Session lifecycle manager — register, login, refresh, and logout flows.

use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use tracing::{info, warn};
use uuid::Uuid;

use campuskit_core::clock::Clock;
use campuskit_core::config::auth::AuthConfig;
use campuskit_core::error::AppError;
use campuskit_core::result::AppResult;
use campuskit_core::traits::directory::UserDirectory;
use campuskit_core::traits::mailer::Mailer;
use campuskit_core::traits::secret::SecretHasher;
use campuskit_core::user::{CreateUser, NewUser};

use crate::jwt::{TokenDecoder, TokenEncoder, TokenPair, VerifyOptions};

use super::store::SessionStore;

/// Orchestrates the token lifecycle per subject.
///
/// Every operation is independent per subject. Store and directory calls are
/// the only suspension points; nothing here spawns background work or
/// retains state past its own completion, and a failed write surfaces
/// immediately with no compensation.
#[derive(Clone)]
pub struct SessionManager {
    /// Token issuance.
    encoder: Arc<TokenEncoder>,
    /// Token verification.
    decoder: Arc<TokenDecoder>,
    /// Session Records and Revocation Markers.
    sessions: SessionStore,
    /// External identity provider.
    directory: Arc<dyn UserDirectory>,
    /// Opaque secret hashing capability.
    hasher: Arc<dyn SecretHasher>,
    /// Outbound mail delivery.
    mailer: Arc<dyn Mailer>,
    /// Time source for expiry arithmetic.
    clock: Arc<dyn Clock>,
    /// Session Record TTL — the refresh token lifetime.
    refresh_ttl: Duration,
    /// Verification code TTL.
    verification_ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("refresh_ttl", &self.refresh_ttl)
            .field("verification_ttl", &self.verification_ttl)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &AuthConfig,
        encoder: Arc<TokenEncoder>,
        decoder: Arc<TokenDecoder>,
        sessions: SessionStore,
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn SecretHasher>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoder,
            decoder,
            sessions,
            directory,
            hasher,
            mailer,
            clock,
            refresh_ttl: Duration::from_secs(config.refresh_ttl_days * 24 * 60 * 60),
            verification_ttl: Duration::from_secs(config.verification_code_ttl_seconds),
        }
    }

    /// Registers a new user and opens their first session.
    ///
    /// Fails `Conflict` if the email is already registered. On success the
    /// new subject holds a fresh token pair and a Session Record with the
    /// full refresh lifetime. If the record write fails after the directory
    /// write, the user stays registered without a session; the caller
    /// retries via login.
    pub async fn register(&self, attrs: NewUser) -> AppResult<TokenPair> {
        if self.directory.find_by_email(&attrs.email).await?.is_some() {
            return Err(AppError::conflict("This email is already registered"));
        }

        let password_hash = self.hasher.hash(&attrs.password)?;
        let user = self
            .directory
            .create(CreateUser {
                email: attrs.email,
                nickname: attrs.nickname,
                password_hash,
            })
            .await?;

        let pair = self.open_session(user.id).await?;
        info!(user_id = %user.id, "User registered");
        Ok(pair)
    }

    /// Authenticates a user and opens a session.
    ///
    /// Fails `NotFound` if no user matches the email and `Unauthorized` on a
    /// bad secret. A successful login overwrites any existing Session Record
    /// for the subject — one active refresh token per user.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let user = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("No account for this email"))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login rejected: incorrect password");
            return Err(AppError::unauthorized("Incorrect password"));
        }

        let pair = self.open_session(user.id).await?;
        info!(user_id = %user.id, "Login successful");
        Ok(pair)
    }

    /// Exchanges a verified token pair for a brand-new one.
    ///
    /// The refresh token must pass full verification; the access token only
    /// needs a valid signature (it may have expired, which is the point of
    /// refreshing). Fails `Forbidden` when the two tokens carry different
    /// subjects and `NotFound` when the subject's user record is gone.
    ///
    /// Trusts any refresh token that verifies cryptographically: neither the
    /// stored Session Record nor Revocation Markers are consulted, so a
    /// stale-but-unexpired refresh token issued before a later login still
    /// refreshes.
    pub async fn refresh(&self, access_token: &str, refresh_token: &str) -> AppResult<TokenPair> {
        let refresh_claims = self
            .decoder
            .verify(refresh_token, VerifyOptions::standard())
            .map_err(|e| AppError::unauthorized(format!("Invalid refresh token: {}", e.message)))?;

        let access_claims = self
            .decoder
            .verify(access_token, VerifyOptions::ignoring_expiration())
            .map_err(|e| AppError::unauthorized(format!("Invalid access token: {}", e.message)))?;

        if access_claims.sub != refresh_claims.sub {
            warn!(
                access_subject = %access_claims.sub,
                refresh_subject = %refresh_claims.sub,
                "Refresh rejected: token pair subjects differ"
            );
            return Err(AppError::forbidden("Token pair subjects do not match"));
        }

        let user = self
            .directory
            .find_by_id(refresh_claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User no longer exists"))?;

        let pair = self.open_session(user.id).await?;
        info!(user_id = %user.id, "Token pair refreshed");
        Ok(pair)
    }

    /// Revokes a session: deletes the Session Record and marks the presented
    /// access token as revoked for its remaining lifetime.
    ///
    /// Fails `NotFound` if no user matches the email. An access token that
    /// is already past its expiry fails verification inside
    /// [`get_expiration`](Self::get_expiration); a non-positive remainder
    /// skips the marker write since the token is already dead.
    pub async fn logout(&self, email: &str, access_token: &str) -> AppResult<()> {
        let user = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("No account for this email"))?;

        let remaining = self.get_expiration(access_token)?;

        self.sessions.clear_session(user.id).await?;

        if remaining > 0 {
            self.sessions
                .revoke_access_token(access_token, Duration::from_secs(remaining as u64))
                .await?;
        }

        info!(user_id = %user.id, remaining_seconds = remaining, "Logout completed");
        Ok(())
    }

    /// Returns the remaining lifetime of an access token in seconds.
    ///
    /// The token must pass full verification. The result may be zero or
    /// negative when expiry slipped past an upstream check; callers treat
    /// non-positive as "already effectively expired", not as an error.
    pub fn get_expiration(&self, access_token: &str) -> AppResult<i64> {
        let claims = self
            .decoder
            .verify(access_token, VerifyOptions::standard())?;
        Ok(claims.remaining_seconds(self.clock.now()))
    }

    /// Checks whether a specific access token string was revoked by logout.
    ///
    /// Request-authorization layers call this before honoring a token that
    /// still verifies cryptographically.
    pub async fn is_revoked(&self, access_token: &str) -> AppResult<bool> {
        self.sessions.is_revoked(access_token).await
    }

    /// Deletes a user record.
    ///
    /// Fails `NotFound` if the record is absent. The subject's Session
    /// Record and any Revocation Markers are not purged; they die with
    /// their own TTLs.
    pub async fn delete_account(&self, user_id: Uuid) -> AppResult<()> {
        let user = self
            .directory
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.directory.delete(user.id).await?;
        info!(user_id = %user.id, "Account deleted");
        Ok(())
    }

    /// Sends a verification code to a university email address.
    ///
    /// Fails `Conflict` if the address is already registered and a
    /// validation error if it is not a university address. The code lives
    /// in the store for the configured TTL.
    pub async fn send_verification_code(&self, university_email: &str) -> AppResult<()> {
        if self
            .directory
            .find_by_email(university_email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("This email is already registered"));
        }

        if !is_university_email(university_email) {
            return Err(AppError::validation(
                "Not a university email address (expected an ac.kr domain)",
            ));
        }

        let code = rand::rng().random_range(1000..=9999);

        self.mailer
            .send(
                university_email,
                "Email verification code",
                &format!("<h1>Enter your verification code</h1>{code}"),
            )
            .await?;

        self.sessions
            .put_verification_code(university_email, &code.to_string(), self.verification_ttl)
            .await?;

        info!(email = %university_email, "Verification code sent");
        Ok(())
    }

    /// Checks a verification code against the stored one.
    ///
    /// Returns `true` and consumes the entry on a match. Expired or absent
    /// codes verify as `false`.
    pub async fn verify_code(&self, email: &str, code: &str) -> AppResult<bool> {
        match self.sessions.verification_code(email).await? {
            Some(stored) if stored == code => {
                self.sessions.clear_verification_code(email).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Issues a fresh token pair and writes the Session Record for it.
    async fn open_session(&self, subject: Uuid) -> AppResult<TokenPair> {
        let pair = self.encoder.issue_pair(subject)?;
        self.sessions
            .put_refresh_token(subject, &pair.refresh_token, self.refresh_ttl)
            .await?;
        Ok(pair)
    }
}

/// Whether the address belongs to a Korean university domain.
fn is_university_email(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.ends_with("ac.kr"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use crate::password::Argon2SecretHasher;
    use campuskit_core::clock::ManualClock;
    use campuskit_core::error::ErrorKind;
    use campuskit_store::memory::MemoryStoreProvider;

    #[derive(Debug, Default)]
    struct NullMailer;

    #[async_trait::async_trait]
    impl Mailer for NullMailer {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn fixture() -> (SessionManager, Arc<ManualClock>) {
        let config = AuthConfig::default();
        let clock: Arc<ManualClock> = Arc::new(ManualClock::from_system_time());
        let encoder = Arc::new(TokenEncoder::new(&config, clock.clone()));
        let decoder = Arc::new(TokenDecoder::new(&config, clock.clone()));
        let store = MemoryStoreProvider::new(300, clock.clone());
        let sessions = SessionStore::new(Arc::new(store));
        let manager = SessionManager::new(
            &config,
            encoder,
            decoder,
            sessions,
            Arc::new(MemoryDirectory::new()),
            Arc::new(Argon2SecretHasher::new()),
            Arc::new(NullMailer),
            clock.clone(),
        );
        (manager, clock)
    }

    fn new_user(email: &str) -> NewUser {
        let local = email.split('@').next().unwrap_or(email);
        NewUser {
            email: email.to_string(),
            nickname: format!("camper-{local}"),
            password: "hunter2hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_twice_fails_conflict() {
        let (manager, _clock) = fixture();
        manager.register(new_user("a@x.ac.kr")).await.unwrap();
        let err = manager.register(new_user("a@x.ac.kr")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_login_unknown_email_fails_not_found() {
        let (manager, _clock) = fixture();
        let err = manager.login("ghost@x.ac.kr", "pw").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_login_bad_password_fails_unauthorized() {
        let (manager, _clock) = fixture();
        manager.register(new_user("b@x.ac.kr")).await.unwrap();
        let err = manager.login("b@x.ac.kr", "wrong").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_refresh_mismatched_subjects_fails_forbidden() {
        let (manager, _clock) = fixture();
        let alice = manager.register(new_user("alice@x.ac.kr")).await.unwrap();
        let bob = manager.register(new_user("bob@x.ac.kr")).await.unwrap();

        let err = manager
            .refresh(&alice.access_token, &bob.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_refresh_with_expired_refresh_token_fails_unauthorized() {
        let (manager, clock) = fixture();
        let pair = manager.register(new_user("c@x.ac.kr")).await.unwrap();

        clock.advance(chrono::Duration::days(15));
        let err = manager
            .refresh(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_refresh_accepts_expired_access_token() {
        let (manager, clock) = fixture();
        let pair = manager.register(new_user("d@x.ac.kr")).await.unwrap();

        // Access token dead, refresh token alive.
        clock.advance(chrono::Duration::hours(3));
        let fresh = manager
            .refresh(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap();
        assert_ne!(fresh.access_token, pair.access_token);
    }

    #[tokio::test]
    async fn test_refresh_after_account_deletion_fails_not_found() {
        let (manager, _clock) = fixture();
        let pair = manager.register(new_user("e@x.ac.kr")).await.unwrap();
        let claims = manager
            .decoder
            .verify(&pair.access_token, VerifyOptions::standard())
            .unwrap();

        manager.delete_account(claims.sub).await.unwrap();
        let err = manager
            .refresh(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_expiration_counts_down() {
        let (manager, clock) = fixture();
        let pair = manager.register(new_user("f@x.ac.kr")).await.unwrap();

        let full = manager.get_expiration(&pair.access_token).unwrap();
        assert_eq!(full, 2 * 60 * 60);

        clock.advance(chrono::Duration::minutes(30));
        let later = manager.get_expiration(&pair.access_token).unwrap();
        assert_eq!(later, 90 * 60);
    }

    #[tokio::test]
    async fn test_delete_absent_account_fails_not_found() {
        let (manager, _clock) = fixture();
        let err = manager.delete_account(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_send_verification_code_rejects_non_university_email() {
        let (manager, _clock) = fixture();
        let err = manager
            .send_verification_code("someone@gmail.com")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_university_email_pattern() {
        assert!(is_university_email("kim@snu.ac.kr"));
        assert!(is_university_email("lee@mail.kaist.ac.kr"));
        assert!(!is_university_email("kim@gmail.com"));
        assert!(!is_university_email("no-at-sign.ac.kr"));
        assert!(!is_university_email("@snu.ac.kr"));
    }
}
