use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid confirmation token")]
    InvalidConfirmationToken,

    #[error("Invalid or expired OTP")]
    InvalidOtp,

    #[error("Too many invalid OTP attempts")]
    OtpAttemptsExceeded,

    #[error("Email is already verified")]
    AlreadyVerified,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please confirm your email before logging in.")]
    EmailNotConfirmed,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    /// A revoked refresh token came back; every session of the user is gone
    #[error("Refresh token reuse detected")]
    RefreshTokenReused,

    #[error("Invalid or expired reset password token.")]
    InvalidResetToken,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate key: {0}")]
    Conflict(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::EmailTaken
            | UserError::InvalidConfirmationToken
            | UserError::InvalidOtp
            | UserError::AlreadyVerified
            | UserError::InvalidCredentials
            | UserError::EmailNotConfirmed
            | UserError::InvalidResetToken => AppError::BadRequest(err.to_string()),
            UserError::OtpAttemptsExceeded => AppError::TooManyRequests(
                "Too many invalid OTP attempts. Please request a new code.".to_string(),
            ),
            UserError::InvalidRefreshToken | UserError::RefreshTokenReused => {
                AppError::Unauthorized("Invalid or expired refresh token".to_string())
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Conflict(msg) => AppError::Conflict(msg),
            UserError::Database(msg) => AppError::Database(msg),
            UserError::PasswordHash(msg) | UserError::Token(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            UserError::Conflict("Resource already exists".to_string())
        } else {
            UserError::Database(err.to_string())
        }
    }
}

impl From<axum_helpers::TokenError> for UserError {
    fn from(err: axum_helpers::TokenError) -> Self {
        UserError::Token(err.to_string())
    }
}
