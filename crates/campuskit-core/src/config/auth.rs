//! Token signing and lifetime configuration.

use serde::{Deserialize, Serialize};

/// Token issuance configuration.
///
/// The signing key is injected here explicitly; nothing in the codebase
/// reads it from ambient process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Email verification code lifetime in seconds.
    #[serde(default = "default_verification_ttl")]
    pub verification_code_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            verification_code_ttl_seconds: default_verification_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

// Access tokens live 2 hours, refresh tokens 14 days.
fn default_access_ttl() -> u64 {
    120
}

fn default_refresh_ttl() -> u64 {
    14
}

fn default_verification_ttl() -> u64 {
    180
}
