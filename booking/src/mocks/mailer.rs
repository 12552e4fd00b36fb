//! Mock mailer that records what would have been sent.

use crate::error::{BookingError, Result};
use crate::providers::Mailer;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// One recorded outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Mock email provider.
///
/// Records sends for assertions; can be flipped to fail so best-effort
/// delivery paths can be exercised.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: Mutex<bool>,
}

impl MockMailer {
    /// Create a mailer that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    /// Everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        if *self.fail.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(BookingError::Internal("mock mailer failing".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
        Ok(())
    }
}
