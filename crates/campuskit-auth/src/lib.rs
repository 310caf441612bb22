//! # campuskit-auth
//!
//! Token lifecycle and revocation core for the CampusKit platform.
//!
//! ## Modules
//!
//! - `jwt` — token pair issuance and verification
//! - `password` — Argon2id secret hashing
//! - `session` — Session Records, Revocation Markers, and the session manager
//! - `directory` — in-memory user directory for tests and single-node use

pub mod directory;
pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, TokenDecoder, TokenEncoder, TokenPair, VerifyOptions};
pub use password::Argon2SecretHasher;
pub use session::{SessionManager, SessionStore};
