pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Product not found"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details, e.g. validation field errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Body of success responses that only carry a message, e.g. after a delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Driver-level failure; the text is logged, never returned
    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Multipart rejection: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Too Many Requests: {0}")]
    TooManyRequests(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status, code, client-facing message and details for this error.
    ///
    /// Server-side failures are logged here and replaced by their default message.
    fn parts(self) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), error = ?e, "JSON serialization error");
                internal(ErrorCode::SerdeJsonError)
            }
            AppError::Database(e) => {
                tracing::error!(error_code = ErrorCode::DatabaseError.code(), error = %e, "Database error");
                internal(ErrorCode::DatabaseError)
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), error = ?e, "I/O error");
                internal(ErrorCode::IoError)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                internal(ErrorCode::InternalError)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), error = ?e, "JSON extraction error");
                (StatusCode::BAD_REQUEST, ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::MultipartRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidMultipart.code(), error = ?e, "Multipart rejection");
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidMultipart, e.body_text(), None)
            }
            AppError::Multipart(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidMultipart.code(), error = ?e, "Multipart error");
                let status = e.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    ErrorCode::PayloadTooLarge
                } else {
                    ErrorCode::InvalidMultipart
                };
                (status, code, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Validation error: {}", e);
                let details = serde_json::to_value(&e).ok();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    details,
                )
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUuid.code(), error = %e, "UUID error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidUuid,
                    ErrorCode::InvalidUuid.default_message().to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg, None)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg, None)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorCode::Conflict, msg, None)
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::info!("Unprocessable entity: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::UnprocessableEntity, msg, None)
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::info!("Payload too large: {}", msg);
                (StatusCode::PAYLOAD_TOO_LARGE, ErrorCode::PayloadTooLarge, msg, None)
            }
            AppError::TooManyRequests(msg) => {
                tracing::info!("Too many requests: {}", msg);
                (StatusCode::TOO_MANY_REQUESTS, ErrorCode::TooManyRequests, msg, None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable, msg, None)
            }
        }
    }
}

fn internal(code: ErrorCode) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code,
        code.default_message().to_string(),
        None,
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Build an error response outside of [`AppError`], e.g. from middleware.
pub fn error_response(status: StatusCode, message: impl Into<String>, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message: message.into(),
        details: None,
    });

    (status, body).into_response()
}
