//! # campuskit-store
//!
//! Credential store implementations for CampusKit. Two backends:
//!
//! - **memory**: in-process store with per-entry TTL, expiry driven by the
//!   injected [`campuskit_core::Clock`] — also the test double for TTL
//!   behavior
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
