//! Shared fixtures for integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use campuskit::{
    AppResult, Argon2SecretHasher, Mailer, ManualClock, NewUser, SessionManager, SessionStore,
    TokenDecoder, TokenEncoder,
};
use campuskit_core::config::auth::AuthConfig;
use campuskit_store::memory::MemoryStoreProvider;

/// Mailer that records every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

/// A captured outbound message.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.sent.lock().expect("mailer mutex poisoned").push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

impl RecordingMailer {
    /// The 4-digit code embedded in the most recent message.
    pub fn last_code(&self) -> Option<String> {
        let sent = self.sent.lock().expect("mailer mutex poisoned");
        let body = &sent.last()?.body;
        // The code follows the closing heading tag in the message body.
        let tail = body.rsplit_once("</h1>").map_or(body.as_str(), |(_, t)| t);
        let code: String = tail.chars().filter(|c| c.is_ascii_digit()).collect();
        (!code.is_empty()).then_some(code)
    }

    /// Number of messages delivered.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer mutex poisoned").len()
    }
}

/// Fully wired session manager over in-memory doubles and a manual clock.
pub struct TestAuth {
    pub manager: SessionManager,
    pub sessions: SessionStore,
    pub decoder: Arc<TokenDecoder>,
    pub clock: Arc<ManualClock>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestAuth {
    pub fn new() -> Self {
        let config = AuthConfig::default();
        let clock: Arc<ManualClock> = Arc::new(ManualClock::from_system_time());
        let mailer = Arc::new(RecordingMailer::default());
        let decoder = Arc::new(TokenDecoder::new(&config, clock.clone()));

        let store = Arc::new(MemoryStoreProvider::new(300, clock.clone()));
        let sessions = SessionStore::new(store);

        let manager = SessionManager::new(
            &config,
            Arc::new(TokenEncoder::new(&config, clock.clone())),
            decoder.clone(),
            sessions.clone(),
            Arc::new(campuskit::MemoryDirectory::new()),
            Arc::new(Argon2SecretHasher::new()),
            mailer.clone(),
            clock.clone(),
        );

        Self {
            manager,
            sessions,
            decoder,
            clock,
            mailer,
        }
    }

    /// Decodes the subject of a token, ignoring expiry.
    pub fn subject_of(&self, token: &str) -> uuid::Uuid {
        self.decoder
            .verify(token, campuskit::VerifyOptions::ignoring_expiration())
            .expect("token should decode")
            .sub
    }
}

/// Registration attributes for a throwaway test user.
pub fn new_user(email: &str, nickname: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        nickname: nickname.to_string(),
        password: "correct-horse-battery".to_string(),
    }
}
