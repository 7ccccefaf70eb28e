//! HTTP handlers for the catalog
//!
//! Product, variant, category and mark writes arrive as multipart forms with
//! image files; reviews are plain JSON. Files written for a request whose
//! write then fails are deleted again.

pub mod categories;
pub mod marks;
pub mod products;
pub mod reviews;
pub mod variants;

use axum::Router;
use axum_helpers::{AppError, UploadStore};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::models::default_limit;
use crate::service::CatalogService;

pub(crate) type ApiResult<T> = Result<T, AppError>;

pub struct CatalogState {
    pub service: CatalogService,
    pub uploads: UploadStore,
}

impl CatalogState {
    /// Drop the files of a request whose write failed
    pub(crate) async fn settle<T>(&self, result: ApiResult<T>, uploaded: &[String]) -> ApiResult<T> {
        if result.is_err() {
            for path in uploaded {
                self.uploads.remove(path).await;
            }
        }
        result
    }

    pub(crate) async fn remove_files<'a>(&self, paths: impl IntoIterator<Item = &'a String>) {
        for path in paths {
            self.uploads.remove(path).await;
        }
    }
}

/// Pagination for computed membership lists
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/products/variants", api = variants::ApiDoc),
        (path = "/products", api = products::ApiDoc),
        (path = "/categories", api = categories::ApiDoc),
        (path = "/marks", api = marks::ApiDoc),
        (path = "/reviews", api = reviews::ApiDoc)
    )
)]
pub struct ApiDoc;

/// All catalog routes: `/products`, `/products/variants`, `/categories`,
/// `/marks` and `/reviews`. Callers mount them behind the JWT middleware.
pub fn router(service: CatalogService, uploads: UploadStore) -> Router {
    let state = Arc::new(CatalogState { service, uploads });

    Router::new()
        .nest(
            "/products",
            products::router(state.clone()).nest("/variants", variants::router(state.clone())),
        )
        .nest("/categories", categories::router(state.clone()))
        .nest("/marks", marks::router(state.clone()))
        .nest("/reviews", reviews::router(state))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::service::test_support::Mocks;
    use axum::{body::Body, http::Request, response::Response};
    use axum_helpers::UploadConfig;
    use http_body_util::BodyExt;

    pub const BOUNDARY: &str = "catalog-test-boundary";

    pub fn app(mocks: Mocks, upload_dir: &std::path::Path) -> Router {
        router(
            mocks.into_service(),
            UploadStore::new(UploadConfig::new(upload_dir)),
        )
    }

    /// Multipart body of text fields plus `(field, file name, content type, bytes)` files
    pub fn multipart(fields: &[(&str, &str)], files: &[(&str, &str, &str, &[u8])]) -> Body {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, file_name, content_type, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    pub fn multipart_request(method: &str, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    pub async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn stored_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }
}
