use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Banner not found: {0}")]
    BannerNotFound(Uuid),

    #[error("Default image not found: {0}")]
    DefaultImageNotFound(Uuid),

    #[error("Video not found: {0}")]
    VideoNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate key: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ContentResult<T> = Result<T, ContentError>;

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::BannerNotFound(_) => AppError::NotFound("Banner not found".to_string()),
            ContentError::DefaultImageNotFound(_) => {
                AppError::NotFound("Default image not found".to_string())
            }
            ContentError::VideoNotFound(_) => AppError::NotFound("Video not found".to_string()),
            ContentError::Validation(msg) => AppError::BadRequest(msg),
            ContentError::Conflict(msg) => AppError::Conflict(msg),
            ContentError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ContentError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            ContentError::Conflict("Resource already exists".to_string())
        } else {
            ContentError::Database(err.to_string())
        }
    }
}
