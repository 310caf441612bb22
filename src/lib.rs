//! CampusKit Auth — session and credential lifecycle manager.
//!
//! Umbrella crate that wires the workspace together: configuration and
//! logging bootstrap plus re-exports of the public surface. The HTTP layer
//! lives outside this workspace and consumes [`SessionManager`] directly.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

pub use campuskit_auth::{
    Argon2SecretHasher, Claims, SessionManager, SessionStore, TokenDecoder, TokenEncoder,
    TokenPair, VerifyOptions, directory::MemoryDirectory,
};
pub use campuskit_core::{
    AppError, AppResult, Clock, ErrorKind, ManualClock, NewUser, SystemClock, User,
    config::AppConfig,
    traits::{CredentialStore, Mailer, SecretHasher, UserDirectory},
};
pub use campuskit_store::StoreManager;

use campuskit_core::config::LoggingConfig;

/// Initialize tracing from logging configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Builds a ready-to-use [`SessionManager`] from configuration and the
/// external collaborators, using the system clock.
pub async fn bootstrap(
    config: &AppConfig,
    directory: Arc<dyn UserDirectory>,
    mailer: Arc<dyn Mailer>,
) -> AppResult<SessionManager> {
    bootstrap_with_clock(config, directory, mailer, Arc::new(SystemClock::new())).await
}

/// [`bootstrap`] with an explicit time source (tests inject a
/// [`ManualClock`]).
pub async fn bootstrap_with_clock(
    config: &AppConfig,
    directory: Arc<dyn UserDirectory>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
) -> AppResult<SessionManager> {
    let store = StoreManager::new(&config.store, clock.clone()).await?;

    let encoder = Arc::new(TokenEncoder::new(&config.auth, clock.clone()));
    let decoder = Arc::new(TokenDecoder::new(&config.auth, clock.clone()));
    let sessions = SessionStore::new(Arc::new(store));

    Ok(SessionManager::new(
        &config.auth,
        encoder,
        decoder,
        sessions,
        directory,
        Arc::new(Argon2SecretHasher::new()),
        mailer,
        clock,
    ))
}
