//! Handlebars templates for account emails.

use crate::error::NotificationResult;
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationData<'a> {
    pub user_name: &'a str,
    pub confirm_link: &'a str,
    pub otp: &'a str,
    pub otp_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct OtpData<'a> {
    pub user_name: &'a str,
    pub otp: &'a str,
    pub otp_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetData<'a> {
    pub user_name: &'a str,
    pub reset_link: &'a str,
    pub expires_minutes: i64,
}

pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, source) in [
            ("confirmation_html", CONFIRMATION_HTML),
            ("confirmation_text", CONFIRMATION_TEXT),
            ("otp_html", OTP_HTML),
            ("otp_text", OTP_TEXT),
            ("password_reset_html", PASSWORD_RESET_HTML),
            ("password_reset_text", PASSWORD_RESET_TEXT),
        ] {
            handlebars.register_template_string(name, source)?;
        }

        Ok(Self { handlebars })
    }

    fn render_pair<T: Serialize>(
        &self,
        template: &str,
        subject: &str,
        data: &T,
    ) -> NotificationResult<RenderedEmail> {
        Ok(RenderedEmail {
            html: self.handlebars.render(&format!("{template}_html"), data)?,
            text: self.handlebars.render(&format!("{template}_text"), data)?,
            subject: subject.to_string(),
        })
    }

    pub fn render_confirmation(&self, data: &ConfirmationData<'_>) -> NotificationResult<RenderedEmail> {
        debug!(user = %data.user_name, "Rendering confirmation email");
        self.render_pair("confirmation", "Confirm your email", data)
    }

    pub fn render_otp(&self, data: &OtpData<'_>) -> NotificationResult<RenderedEmail> {
        debug!(user = %data.user_name, "Rendering OTP email");
        self.render_pair("otp", "Your verification code", data)
    }

    pub fn render_password_reset(&self, data: &PasswordResetData<'_>) -> NotificationResult<RenderedEmail> {
        debug!(user = %data.user_name, "Rendering password reset email");
        self.render_pair("password_reset", "Reset Password", data)
    }
}

const CONFIRMATION_HTML: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #222;">
  <p>Hi {{user_name}},</p>
  <p>Please click the following link to confirm your email:</p>
  <p><a href="{{confirm_link}}">{{confirm_link}}</a></p>
  <p>Or enter this code in the app: <strong style="font-size: 20px; letter-spacing: 4px;">{{otp}}</strong></p>
  <p>The code expires in {{otp_minutes}} minutes.</p>
</body>
</html>"#;

const CONFIRMATION_TEXT: &str = r#"Hi {{user_name}},

Please click the following link to confirm your email: {{confirm_link}}

Or enter this code in the app: {{otp}}
The code expires in {{otp_minutes}} minutes."#;

const OTP_HTML: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #222;">
  <p>Hi {{user_name}},</p>
  <p>Your verification code is <strong style="font-size: 20px; letter-spacing: 4px;">{{otp}}</strong></p>
  <p>It expires in {{otp_minutes}} minutes.</p>
</body>
</html>"#;

const OTP_TEXT: &str = r#"Hi {{user_name}},

Your verification code is {{otp}}
It expires in {{otp_minutes}} minutes."#;

const PASSWORD_RESET_HTML: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #222;">
  <p>Hi {{user_name}},</p>
  <p>Please click the following link to reset your password:</p>
  <p><a href="{{reset_link}}">{{reset_link}}</a></p>
  <p>The link expires in {{expires_minutes}} minutes. If you did not ask for a reset, ignore this email.</p>
</body>
</html>"#;

const PASSWORD_RESET_TEXT: &str = r#"Hi {{user_name}},

Please click the following link to reset your password: {{reset_link}}

The link expires in {{expires_minutes}} minutes. If you did not ask for a reset, ignore this email."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_contains_link_and_otp() {
        let engine = TemplateEngine::new().unwrap();
        let email = engine
            .render_confirmation(&ConfirmationData {
                user_name: "Mona",
                confirm_link: "http://localhost:8080/api/auth/confirm/abc",
                otp: "123456",
                otp_minutes: 10,
            })
            .unwrap();

        assert_eq!(email.subject, "Confirm your email");
        assert!(email.text.contains("/api/auth/confirm/abc"));
        assert!(email.html.contains("123456"));
    }

    #[test]
    fn test_html_escapes_user_name() {
        let engine = TemplateEngine::new().unwrap();
        let email = engine
            .render_otp(&OtpData {
                user_name: "<script>",
                otp: "000111",
                otp_minutes: 10,
            })
            .unwrap();

        assert!(email.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_password_reset_subject() {
        let engine = TemplateEngine::new().unwrap();
        let email = engine
            .render_password_reset(&PasswordResetData {
                user_name: "Sara",
                reset_link: "http://localhost:8080/api/auth/reset-password/ff",
                expires_minutes: 60,
            })
            .unwrap();

        assert_eq!(email.subject, "Reset Password");
        assert!(email.text.contains("reset-password/ff"));
    }
}
