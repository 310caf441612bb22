//! Secret hashing trait — the opaque credential capability.

use crate::result::AppResult;

/// Hashes plaintext secrets and verifies them against stored hashes.
///
/// The session core never inspects hash contents or chooses an algorithm;
/// it only invokes this capability. CPU-bound, no I/O.
pub trait SecretHasher: Send + Sync + std::fmt::Debug + 'static {
    /// Produces the stored form of a plaintext secret.
    fn hash(&self, secret: &str) -> AppResult<String>;

    /// Compares a plaintext secret against a stored hash.
    ///
    /// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch; errors are
    /// reserved for unparseable hashes.
    fn verify(&self, secret: &str, hash: &str) -> AppResult<bool>;
}
