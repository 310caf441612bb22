//! JWT token verification.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use campuskit_core::clock::Clock;
use campuskit_core::config::auth::AuthConfig;
use campuskit_core::error::AppError;

use super::claims::Claims;

/// Clock skew tolerance applied to the expiry check.
const LEEWAY_SECONDS: i64 = 5;

/// Options controlling token verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyOptions {
    /// Skip the expiry check. Used only when extracting claims from an
    /// access token during refresh, where the access token may have
    /// legitimately expired already. The signature is always checked.
    pub ignore_expiration: bool,
}

impl VerifyOptions {
    /// Standard verification: signature and expiry.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Signature-only verification.
    pub fn ignoring_expiration() -> Self {
        Self {
            ignore_expiration: true,
        }
    }
}

/// Validates token signatures and expiry.
///
/// Expiry is checked against the injected [`Clock`] rather than the signing
/// library's ambient time, keeping verification pure over
/// (token, key, clock).
#[derive(Clone)]
pub struct TokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature validation configuration.
    validation: Validation,
    /// Time source for the expiry check.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked manually against the injected clock.
        validation.validate_exp = false;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Decodes a token string and verifies it per the given options.
    ///
    /// Failure mapping:
    /// - bad signature or expired → `Unauthorized`
    /// - undecodable structure or missing claims → `Malformed`
    pub fn verify(&self, token: &str, options: VerifyOptions) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    JwtErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    JwtErrorKind::InvalidToken
                    | JwtErrorKind::Base64(_)
                    | JwtErrorKind::Json(_)
                    | JwtErrorKind::Utf8(_)
                    | JwtErrorKind::MissingRequiredClaim(_) => {
                        AppError::malformed(format!("Malformed token: {e}"))
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        let claims = token_data.claims;

        if !options.ignore_expiration {
            let now = self.clock.now().timestamp();
            if now - LEEWAY_SECONDS >= claims.exp {
                return Err(AppError::unauthorized("Token has expired"));
            }
        }

        Ok(claims)
    }
}
