use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::NotificationResult;
use async_trait::async_trait;
use tracing::info;

/// Logs emails instead of sending them. For development and tests.
///
/// Bodies are logged at debug level since they carry confirmation links.
#[derive(Debug, Clone, Default)]
pub struct LogProvider;

#[async_trait]
impl EmailProvider for LogProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        info!(to = %email.to_email, subject = %email.subject, "Email captured by log provider");
        tracing::debug!(body = %email.text_body, "Email body");

        Ok(SentEmail {
            message_id: None,
            accepted: true,
        })
    }

    fn name(&self) -> &'static str {
        "Log"
    }
}
