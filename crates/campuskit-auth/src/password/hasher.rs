//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use campuskit_core::error::AppError;
use campuskit_core::result::AppResult;
use campuskit_core::traits::secret::SecretHasher;

/// [`SecretHasher`] backed by Argon2id with random salts.
#[derive(Debug, Clone, Default)]
pub struct Argon2SecretHasher;

impl Argon2SecretHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }
}

impl SecretHasher for Argon2SecretHasher {
    fn hash(&self, secret: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        let argon2 = Argon2::default();
        match argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hasher = Argon2SecretHasher::new();
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_unparseable_hash_is_an_error() {
        let hasher = Argon2SecretHasher::new();
        assert!(hasher.verify("secret", "not-a-phc-string").is_err());
    }
}
