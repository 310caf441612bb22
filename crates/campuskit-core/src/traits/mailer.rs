//! Outbound mail trait — the external delivery channel.

use async_trait::async_trait;

use crate::result::AppResult;

/// Delivers a single message to one recipient.
///
/// SMTP details live entirely outside the session core. The verification
/// flow only needs fire-and-forget delivery; a failed send surfaces as an
/// error with no retry here.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Sends a message.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}
