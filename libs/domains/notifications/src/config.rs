use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};

/// Which [`EmailProvider`](crate::EmailProvider) to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Write emails to the log only
    Log,
    Smtp,
}

/// Outbound email settings.
///
/// Environment variables:
/// - `EMAIL_PROVIDER`: `log` (default) or `smtp`
/// - `SMTP_HOST` (localhost), `SMTP_PORT` (1025)
/// - `SMTP_USERNAME`, `SMTP_PASSWORD` (optional)
/// - `SMTP_FROM_EMAIL` (noreply@localhost), `SMTP_FROM_NAME` (Shop)
/// - `SMTP_USE_TLS`: `true`/`1` to use an implicit-TLS relay
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub provider: ProviderKind,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_email: String,
    pub from_name: String,
    /// Optional for dev servers like Mailpit
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>, port: u16, from_email: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            from_email: from_email.into(),
            from_name: "Shop".to_string(),
            username: None,
            password: None,
            use_tls: false,
        }
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Log,
            smtp: SmtpConfig::new("localhost", 1025, "noreply@localhost"),
        }
    }
}

impl FromEnv for EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let provider = match env_or_default("EMAIL_PROVIDER", "log").to_ascii_lowercase().as_str() {
            "log" => ProviderKind::Log,
            "smtp" => ProviderKind::Smtp,
            other => {
                return Err(ConfigError::ParseError {
                    key: "EMAIL_PROVIDER".to_string(),
                    details: format!("unknown provider '{other}', expected 'log' or 'smtp'"),
                });
            }
        };

        let smtp = SmtpConfig {
            host: env_or_default("SMTP_HOST", "localhost"),
            port: env_parse_or("SMTP_PORT", 1025)?,
            from_email: env_or_default("SMTP_FROM_EMAIL", "noreply@localhost"),
            from_name: env_or_default("SMTP_FROM_NAME", "Shop"),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            use_tls: std::env::var("SMTP_USE_TLS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        Ok(Self { provider, smtp })
    }
}
