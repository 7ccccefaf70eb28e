//! HTTP handlers for storefront content
//!
//! Banners and default images are multipart forms with a single `image`
//! file; videos are JSON.

pub mod banners;
pub mod default_images;
pub mod videos;

use axum::Router;
use axum_helpers::{AppError, UploadStore};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::service::ContentService;

pub(crate) type ApiResult<T> = Result<T, AppError>;

pub(crate) const IMAGE_FIELD: &str = "image";

pub struct ContentState {
    pub service: ContentService,
    pub uploads: UploadStore,
}

impl ContentState {
    /// Remove the request's upload when the write behind it failed
    pub(crate) async fn settle<T>(&self, result: ApiResult<T>, uploaded: Option<&str>) -> ApiResult<T> {
        if result.is_err() {
            if let Some(path) = uploaded {
                self.uploads.remove(path).await;
            }
        }
        result
    }
}

#[derive(OpenApi)]
#[openapi(nest(
    (path = "/banners", api = banners::ApiDoc),
    (path = "/default-images", api = default_images::ApiDoc),
    (path = "/videos", api = videos::ApiDoc)
))]
pub struct ApiDoc;

/// `/banners`, `/default-images` and `/videos`, all behind the JWT middleware
pub fn router(service: ContentService, uploads: UploadStore) -> Router {
    let state = Arc::new(ContentState { service, uploads });

    Router::new()
        .nest("/banners", banners::router(state.clone()))
        .nest("/default-images", default_images::router(state.clone()))
        .nest("/videos", videos::router(state))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::service::test_support::Mocks;
    use axum::{body::Body, http::Request, response::Response};
    use axum_helpers::UploadConfig;
    use http_body_util::BodyExt;

    const BOUNDARY: &str = "content-boundary";

    pub fn app(mocks: Mocks, upload_dir: &std::path::Path) -> Router {
        router(
            mocks.into_service(),
            UploadStore::new(UploadConfig::new(upload_dir)),
        )
    }

    /// Form with text fields and an optional PNG on `image`
    pub fn form_request(method: &str, uri: &str, fields: &[(&str, &str)], png: bool) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        if png {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
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
