//! Console mailer for development and testing.

use async_trait::async_trait;
use dearly_booking::error::Result;
use dearly_booking::providers::Mailer;
use tracing::info;

/// Logs emails instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    /// Create a new console mailer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        info!(
            to = %to,
            subject = %subject,
            body_len = html_body.len(),
            "📧 Email (development mode, not sent)"
        );
        Ok(())
    }
}
