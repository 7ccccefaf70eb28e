use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Product Variant not found: {0}")]
    VariantNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Mark not found: {0}")]
    MarkNotFound(Uuid),

    #[error("Review not found: {0}")]
    ReviewNotFound(Uuid),

    /// A write pointed at a related record that does not exist
    #[error("Referenced {entity} {id} does not exist")]
    InvalidReference { entity: &'static str, id: Uuid },

    #[error("A category cannot be its own ancestor")]
    CategoryCycle,

    #[error("Category with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("This user has already reviewed this product")]
    DuplicateReview,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Duplicate key: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(_) => AppError::NotFound("Product not found".to_string()),
            CatalogError::VariantNotFound(_) => {
                AppError::NotFound("Product Variant not found".to_string())
            }
            CatalogError::CategoryNotFound(_) => {
                AppError::NotFound("Category not found".to_string())
            }
            CatalogError::MarkNotFound(_) => AppError::NotFound("Mark not found".to_string()),
            CatalogError::ReviewNotFound(_) => AppError::NotFound("Review not found".to_string()),
            CatalogError::InvalidReference { .. } | CatalogError::CategoryCycle => {
                AppError::BadRequest(err.to_string())
            }
            CatalogError::DuplicateSlug(_) | CatalogError::DuplicateReview => {
                AppError::Conflict(err.to_string())
            }
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Conflict(msg) => AppError::Conflict(msg),
            CatalogError::Database(msg) => AppError::Database(msg),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            CatalogError::Conflict("Resource already exists".to_string())
        } else {
            CatalogError::Database(err.to_string())
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
            (CatalogError::ProductNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                CatalogError::InvalidReference {
                    entity: "category",
                    id: Uuid::nil(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (CatalogError::CategoryCycle, StatusCode::BAD_REQUEST),
            (CatalogError::DuplicateSlug("shoes".into()), StatusCode::CONFLICT),
            (CatalogError::DuplicateReview, StatusCode::CONFLICT),
            (
                CatalogError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
