use super::{EmailContent, EmailProvider, SentEmail};
use crate::config::SmtpConfig;
use crate::error::{NotificationError, NotificationResult};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, error, info};

/// SMTP provider built on lettre.
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

impl SmtpProvider {
    pub fn new(config: &SmtpConfig) -> NotificationResult<Self> {
        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ => None,
        };

        let transport = if config.use_tls {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| NotificationError::ProviderError(format!("Failed to create SMTP relay: {e}")))?
                .port(config.port);
            if let Some(credentials) = credentials {
                builder = builder.credentials(credentials);
            }
            builder.build()
        } else {
            // Plain connection for local servers like Mailpit
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port);
            if let Some(credentials) = credentials {
                builder = builder.credentials(credentials);
            }
            builder.build()
        };

        let from = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| NotificationError::ConfigError(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport,
            from,
            host: config.host.clone(),
        })
    }

    fn build_message(&self, email: &EmailContent) -> NotificationResult<Message> {
        let to: Mailbox = if email.to_name.is_empty() {
            email.to_email.parse()
        } else {
            format!("{} <{}>", email.to_name, email.to_email).parse()
        }
        .map_err(|e| NotificationError::InvalidEmail(format!("{}: {e}", email.to_email)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::ProviderError(format!("Failed to build email message: {e}")))
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        debug!(to = %email.to_email, subject = %email.subject, host = %self.host, "Sending email via SMTP");

        let message = self.build_message(email)?;
        let response = self.transport.send(message).await.map_err(|e| {
            error!(to = %email.to_email, error = %e, "Failed to send email via SMTP");
            NotificationError::ProviderError(format!("SMTP send failed: {e}"))
        })?;

        let message_id = response.message().next().map(str::to_string);
        info!(to = %email.to_email, message_id = ?message_id, "Email sent via SMTP");

        Ok(SentEmail {
            message_id,
            accepted: response.is_positive(),
        })
    }

    fn name(&self) -> &'static str {
        "SMTP"
    }
}
