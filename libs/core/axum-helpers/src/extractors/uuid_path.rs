use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// `{id}` path parameter parsed as a UUID; 400 `INVALID_UUID` otherwise.
///
/// ```ignore
/// async fn get_product(UuidPath(id): UuidPath) -> String {
///     format!("Product {id}")
/// }
///
/// Router::new().route("/products/{id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|e| AppError::UuidError(e).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/items/{id}",
            get(|UuidPath(id): UuidPath| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn test_valid_uuid_is_extracted() {
        let id = Uuid::now_v7();
        let response = app()
            .oneshot(
                Request::get(format!("/items/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_bad_request() {
        let response = app()
            .oneshot(Request::get("/items/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
