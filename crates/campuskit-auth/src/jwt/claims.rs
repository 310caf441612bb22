//! JWT claims structure used in access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload embedded in every token.
///
/// Access and refresh tokens share this shape; they differ only in lifetime.
/// Tokens are immutable once issued — verification never mutates state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the subject identifier.
    pub fn subject(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns `exp - now` in seconds.
    ///
    /// May be zero or negative for a token past its expiry; callers treat
    /// non-positive as "already effectively expired", not as an error.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.exp - now.timestamp()
    }
}
