use crate::config::{EmailConfig, ProviderKind};
use crate::error::NotificationResult;
use crate::providers::{EmailContent, EmailProvider, LogProvider, SentEmail, SmtpProvider};
use crate::templates::{ConfirmationData, OtpData, PasswordResetData, RenderedEmail, TemplateEngine};
use std::sync::Arc;
use tracing::instrument;

/// Renders account emails and hands them to the configured provider.
#[derive(Clone)]
pub struct Mailer {
    provider: Arc<dyn EmailProvider>,
    templates: Arc<TemplateEngine>,
}

impl Mailer {
    pub fn new(provider: Arc<dyn EmailProvider>) -> NotificationResult<Self> {
        Ok(Self {
            provider,
            templates: Arc::new(TemplateEngine::new()?),
        })
    }

    pub fn from_config(config: &EmailConfig) -> NotificationResult<Self> {
        let provider: Arc<dyn EmailProvider> = match config.provider {
            ProviderKind::Log => Arc::new(LogProvider),
            ProviderKind::Smtp => Arc::new(SmtpProvider::new(&config.smtp)?),
        };
        tracing::info!(provider = provider.name(), "Mailer initialized");
        Self::new(provider)
    }

    async fn deliver(&self, to: &str, name: &str, rendered: RenderedEmail) -> NotificationResult<SentEmail> {
        let content = EmailContent {
            to_email: to.to_string(),
            to_name: name.to_string(),
            subject: rendered.subject,
            html_body: rendered.html,
            text_body: rendered.text,
        };
        self.provider.send(&content).await
    }

    #[instrument(skip(self, link, otp))]
    pub async fn send_confirmation(
        &self,
        to: &str,
        name: &str,
        link: &str,
        otp: &str,
        otp_minutes: i64,
    ) -> NotificationResult<SentEmail> {
        let rendered = self.templates.render_confirmation(&ConfirmationData {
            user_name: name,
            confirm_link: link,
            otp,
            otp_minutes,
        })?;
        self.deliver(to, name, rendered).await
    }

    #[instrument(skip(self, otp))]
    pub async fn send_otp(
        &self,
        to: &str,
        name: &str,
        otp: &str,
        otp_minutes: i64,
    ) -> NotificationResult<SentEmail> {
        let rendered = self.templates.render_otp(&OtpData {
            user_name: name,
            otp,
            otp_minutes,
        })?;
        self.deliver(to, name, rendered).await
    }

    #[instrument(skip(self, link))]
    pub async fn send_password_reset(
        &self,
        to: &str,
        name: &str,
        link: &str,
        expires_minutes: i64,
    ) -> NotificationResult<SentEmail> {
        let rendered = self.templates.render_password_reset(&PasswordResetData {
            user_name: name,
            reset_link: link,
            expires_minutes,
        })?;
        self.deliver(to, name, rendered).await
    }
}
