//! Email transports.

mod log;
mod smtp;

pub use log::LogProvider;
pub use smtp::SmtpProvider;

use crate::error::NotificationResult;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct SentEmail {
    /// Provider-specific message ID for tracking
    pub message_id: Option<String>,
    pub accepted: bool,
}

/// Email content ready for sending.
#[derive(Debug, Clone, Default)]
pub struct EmailContent {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
