//! Outbound email providers implementing the booking `Mailer` trait.

mod console;
mod smtp;

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;

use crate::config::SmtpConfig;
use dearly_booking::error::Result;
use dearly_booking::providers::Mailer;
use std::sync::Arc;

/// Build the configured mailer: `"console"` logs instead of sending,
/// anything else goes over SMTP.
///
/// # Errors
///
/// Returns an error if the SMTP transport cannot be configured.
pub fn build_mailer(config: &SmtpConfig) -> Result<Arc<dyn Mailer>> {
    if config.mode == "console" {
        Ok(Arc::new(ConsoleMailer::new()))
    } else {
        Ok(Arc::new(SmtpMailer::new(config)?))
    }
}
