//! SMTP mailer using Lettre.

use crate::config::SmtpConfig;
use async_trait::async_trait;
use dearly_booking::error::{BookingError, Result};
use dearly_booking::providers::Mailer;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Sends real email via SMTP.
#[derive(Clone)]
pub struct SmtpMailer {
    /// SMTP server address.
    host: String,
    /// SMTP server port.
    port: u16,
    /// SMTP credentials.
    credentials: Credentials,
    /// `From` header value.
    from_header: String,
}

impl SmtpMailer {
    /// Create a mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender address is malformed (checked eagerly
    /// so misconfiguration fails at startup, not at first send).
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from_header = format!("{} <{}>", config.from_name, config.from_email);
        from_header
            .parse::<lettre::message::Mailbox>()
            .map_err(|e| BookingError::Internal(format!("invalid from address: {e}")))?;
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            credentials: Credentials::new(config.username.clone(), config.password.clone()),
            from_header,
        })
    }

    /// Build a transport per send to avoid connection-pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport> {
        Ok(SmtpTransport::relay(&self.host)
            .map_err(|e| BookingError::Internal(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let email = Message::builder()
            .from(
                self.from_header
                    .parse()
                    .map_err(|e| BookingError::Internal(format!("invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| BookingError::Internal(format!("invalid to address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| BookingError::Internal(format!("failed to build email: {e}")))?;

        let transport = self.build_transport()?;
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| BookingError::Internal(format!("email task panicked: {e}")))?
            .map_err(|e| BookingError::Internal(format!("SMTP send failed: {e}")))?;
        Ok(())
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
