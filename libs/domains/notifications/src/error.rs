use thiserror::Error;

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Email provider error: {0}")]
    ProviderError(String),

    #[error("Template rendering error: {0}")]
    TemplateError(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<handlebars::RenderError> for NotificationError {
    fn from(err: handlebars::RenderError) -> Self {
        NotificationError::TemplateError(err.to_string())
    }
}

impl From<handlebars::TemplateError> for NotificationError {
    fn from(err: handlebars::TemplateError) -> Self {
        NotificationError::TemplateError(err.to_string())
    }
}
