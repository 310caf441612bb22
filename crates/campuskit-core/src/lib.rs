//! # campuskit-core
//!
//! Core crate for the CampusKit auth backend. Contains collaborator traits,
//! configuration schemas, the clock abstraction, the user record type, and
//! the unified error system.
//!
//! This crate has **no** internal dependencies on other CampusKit crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod user;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use user::{NewUser, User};
