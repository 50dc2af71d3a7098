//! Mail delivery to the blog-by-email address
//!
//! Blogger (and similar platforms) publish whatever arrives at a secret
//! address: the subject becomes the post title, `#label` words in the
//! subject become labels, and the HTML body becomes the post.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::MailConfig;
use crate::error::{Error, Result};
use crate::utils::error::MailError;

/// Port that speaks TLS from the first byte
const IMPLICIT_TLS_PORT: u16 = 465;

/// Response from sending a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStatus {
    /// Whether the post was successfully delivered
    pub success: bool,
    /// Channel that delivered (or failed to deliver) the post
    pub channel: String,
    /// Optional message about the delivery
    pub message: Option<String>,
    /// Timestamp of delivery attempt
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl DeliveryStatus {
    /// Create a successful delivery status
    pub fn success(channel: impl Into<String>) -> Self {
        Self {
            success: true,
            channel: channel.into(),
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a successful delivery status with a message
    pub fn success_with_message(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            channel: channel.into(),
            message: Some(message.into()),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "SUCCESS" } else { "FAILED" };
        write!(f, "[{status}] {}", self.channel)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

/// Where finished posts go
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Get the channel name
    fn name(&self) -> &str;

    /// Deliver one post
    async fn send(&self, subject: &str, html_body: &str) -> std::result::Result<DeliveryStatus, MailError>;
}

/// SMTP publisher
pub struct SmtpPublisher {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpPublisher {
    /// Create from the `[mail]` config section
    ///
    /// Port 465 uses implicit TLS (what Gmail's `SMTP_SSL` setup expects);
    /// any other port negotiates STARTTLS.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let username = config
            .username
            .clone()
            .ok_or_else(|| Error::config("GMAIL_USER is not set"))?;
        let password = config
            .password
            .clone()
            .ok_or_else(|| Error::config("GMAIL_APP_PASSWORD is not set"))?;

        let from = parse_mailbox(config.sender().unwrap_or(&username))?;
        let to = parse_mailbox(
            config
                .to
                .as_deref()
                .ok_or_else(|| Error::config("BLOGGER_EMAIL is not set"))?,
        )?;

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(MailError::from)?;

        let mailer = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self { mailer, from, to })
    }

    /// Assemble the HTML message
    pub fn build_message(&self, subject: &str, html_body: &str) -> std::result::Result<Message, MailError> {
        build_message(&self.from, &self.to, subject, html_body)
    }
}

#[async_trait]
impl Publisher for SmtpPublisher {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, subject: &str, html_body: &str) -> std::result::Result<DeliveryStatus, MailError> {
        let message = self.build_message(subject, html_body)?;

        self.mailer.send(message).await?;

        tracing::info!(
            to = %self.to,
            subject = subject,
            "Email sent successfully"
        );

        Ok(DeliveryStatus::success_with_message(
            self.name(),
            format!("Sent to {}", self.to),
        ))
    }
}

/// Build a single-part HTML message
pub fn build_message(
    from: &Mailbox,
    to: &Mailbox,
    subject: &str,
    html_body: &str,
) -> std::result::Result<Message, MailError> {
    Ok(Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html_body.to_string())?)
}

fn parse_mailbox(address: &str) -> std::result::Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
