//! Session lifecycle: Session Records, Revocation Markers, and the manager
//! orchestrating registration, login, refresh, and logout.

pub mod manager;
pub mod store;

pub use manager::SessionManager;
pub use store::SessionStore;
