use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Admin not found: {0}")]
    NotFound(Uuid),

    #[error("An admin with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Admin account is disabled")]
    Inactive,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type AdminResult<T> = Result<T, AdminError>;

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::NotFound(_) => AppError::NotFound("Admin not found".to_string()),
            AdminError::EmailTaken => AppError::Conflict(err.to_string()),
            AdminError::InvalidCredentials | AdminError::Inactive => {
                AppError::Unauthorized(err.to_string())
            }
            AdminError::Validation(msg) => AppError::BadRequest(msg),
            AdminError::Database(msg) => AppError::Database(msg),
            AdminError::PasswordHash(msg) | AdminError::Token(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for AdminError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            AdminError::EmailTaken
        } else {
            AdminError::Database(err.to_string())
        }
    }
}

impl From<axum_helpers::TokenError> for AdminError {
    fn from(err: axum_helpers::TokenError) -> Self {
        AdminError::Token(err.to_string())
    }
}

impl From<domain_users::UserError> for AdminError {
    fn from(err: domain_users::UserError) -> Self {
        AdminError::PasswordHash(err.to_string())
    }
}
