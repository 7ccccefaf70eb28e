//! Outbound account email: confirmation links, OTP codes and password resets.
//!
//! ```ignore
//! let mailer = Mailer::from_config(&EmailConfig::from_env()?)?;
//! mailer.send_otp("mona@example.com", "Mona", "482913", 10).await?;
//! ```

pub mod config;
pub mod error;
pub mod mailer;
pub mod providers;
pub mod templates;

pub use config::{EmailConfig, ProviderKind, SmtpConfig};
pub use error::{NotificationError, NotificationResult};
pub use mailer::Mailer;
pub use providers::{EmailContent, EmailProvider, LogProvider, SentEmail, SmtpProvider};
pub use templates::{RenderedEmail, TemplateEngine};
