//! JWT token creation with configurable signing and lifetimes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use campuskit_core::clock::Clock;
use campuskit_core::config::auth::AuthConfig;
use campuskit_core::error::AppError;

use super::claims::Claims;

/// Creates signed access and refresh tokens.
///
/// Deterministic over (subject, signing key, clock). The signing key comes
/// from [`AuthConfig`] at construction; there is no ambient key lookup.
#[derive(Clone)]
pub struct TokenEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
    /// Time source for expiry arithmetic.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Result of a successful token pair issuance.
///
/// Both tokens carry the same subject; they are independently verifiable
/// and differ only in expiry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
            clock,
        }
    }

    /// Returns the configured refresh token lifetime.
    ///
    /// The Session Record TTL is exactly this value.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Signs a token for the given subject with an explicit lifetime.
    pub fn issue(&self, subject: Uuid, lifetime: Duration) -> Result<String, AppError> {
        let now = self.clock.now();
        let claims = Claims {
            sub: subject,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Issues a fresh access + refresh token pair for the given subject.
    pub fn issue_pair(&self, subject: Uuid) -> Result<TokenPair, AppError> {
        let now = self.clock.now();
        let access_token = self.issue(subject, self.access_ttl)?;
        let refresh_token = self.issue(subject, self.refresh_ttl)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: now + self.access_ttl,
            refresh_expires_at: now + self.refresh_ttl,
        })
    }
}
