use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::OrderStatus;

#[derive(Debug, Error)]
pub enum CommerceError {
    #[error("Cart not found: {0}")]
    CartNotFound(Uuid),

    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Return not found: {0}")]
    ReturnNotFound(Uuid),

    #[error("User {0} already has a cart")]
    CartExists(Uuid),

    #[error("Order status cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate key: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CommerceResult<T> = Result<T, CommerceError>;

impl From<CommerceError> for AppError {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::CartNotFound(_) => AppError::NotFound("Cart not found".to_string()),
            CommerceError::OrderNotFound(_) => AppError::NotFound("Order not found".to_string()),
            CommerceError::ReturnNotFound(_) => AppError::NotFound("Return not found".to_string()),
            CommerceError::CartExists(_) => AppError::Conflict(err.to_string()),
            CommerceError::InvalidStatusTransition { .. } => AppError::BadRequest(err.to_string()),
            CommerceError::Validation(msg) => AppError::BadRequest(msg),
            CommerceError::Conflict(msg) => AppError::Conflict(msg),
            CommerceError::Database(msg) => AppError::Database(msg),
            CommerceError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CommerceError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CommerceError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            CommerceError::Conflict("Resource already exists".to_string())
        } else {
            CommerceError::Database(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CommerceError::CartNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (CommerceError::CartExists(Uuid::nil()), StatusCode::CONFLICT),
            (
                CommerceError::InvalidStatusTransition {
                    from: OrderStatus::Shipped,
                    to: OrderStatus::Pending,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CommerceError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_transition_message() {
        let err = CommerceError::InvalidStatusTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Processing,
        };
        assert_eq!(
            err.to_string(),
            "Order status cannot move from delivered to processing"
        );
    }
}
