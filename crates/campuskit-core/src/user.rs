//! User record types shared between the session core and the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record as held by the user directory.
///
/// The directory owns persistence; the session core only reads the identity
/// and the stored credential hash. The `id` is the token subject and the
/// Session Record key, stable for the lifetime of the record and never
/// reused across users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable subject identifier.
    pub id: Uuid,
    /// Login email, unique within the directory.
    pub email: String,
    /// Display nickname, unique within the directory.
    pub nickname: String,
    /// Stored credential hash (opaque to the session core).
    pub password_hash: String,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Registration input carrying the plaintext secret.
///
/// The secret is hashed through the injected [`crate::traits::SecretHasher`]
/// before it ever reaches the directory.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Display nickname.
    pub nickname: String,
    /// Plaintext secret, consumed during registration.
    pub password: String,
}

/// Attributes handed to the directory when creating a record.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Login email.
    pub email: String,
    /// Display nickname.
    pub nickname: String,
    /// Already-hashed credential.
    pub password_hash: String,
}
