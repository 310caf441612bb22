//! Collaborator traits implemented outside the session core.

pub mod directory;
pub mod mailer;
pub mod secret;
pub mod store;

pub use directory::UserDirectory;
pub use mailer::Mailer;
pub use secret::SecretHasher;
pub use store::CredentialStore;
