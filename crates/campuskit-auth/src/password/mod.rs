//! Secret hashing implementation.

pub mod hasher;

pub use hasher::Argon2SecretHasher;
