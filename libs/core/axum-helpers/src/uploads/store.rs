use super::config::UploadConfig;
use super::form::MultipartForm;
use crate::errors::AppError;
use axum::extract::Multipart;
use axum::extract::multipart::Field;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Prefix of every stored file's public path
pub const PUBLIC_PREFIX: &str = "uploads";

/// A file written to the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Form field the file came from
    pub field: String,
    pub file_name: String,
    /// `uploads/<file_name>`
    pub path: String,
    pub content_type: String,
    pub size: usize,
}

/// A file read from the request but not yet written
struct PendingFile {
    field: String,
    original_name: Option<String>,
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct UploadStore {
    config: Arc<UploadConfig>,
}

impl UploadStore {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Read a multipart body. Files are accepted only on `file_fields`.
    ///
    /// Every part is checked before anything touches the disk, and a failed
    /// write removes the files already written, so a rejected request leaves
    /// no files behind.
    pub async fn read_form(
        &self,
        mut multipart: Multipart,
        file_fields: &[&str],
    ) -> Result<MultipartForm, AppError> {
        let mut form = MultipartForm::default();
        let mut pending = Vec::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if field.file_name().is_none() {
                let value = field.text().await?;
                form.insert_text(name, value);
                continue;
            }

            if !file_fields.contains(&name.as_str()) {
                return Err(AppError::BadRequest(format!("Unexpected file field: {name}")));
            }
            if pending.len() >= self.config.max_files {
                return Err(AppError::BadRequest(format!(
                    "Too many files, at most {} allowed",
                    self.config.max_files
                )));
            }

            pending.push(self.read_file(name, field).await?);
        }

        for stored in self.write_all(pending).await? {
            form.insert_file(stored);
        }

        Ok(form)
    }

    async fn read_file(&self, name: String, mut field: Field<'_>) -> Result<PendingFile, AppError> {
        let content_type = field.content_type().unwrap_or_default().to_string();
        if extension_for(&content_type).is_none() {
            return Err(AppError::BadRequest(
                "Only JPEG, PNG, GIF, WebP or AVIF images are allowed".to_string(),
            ));
        }

        let original_name = field.file_name().map(str::to_string);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if bytes.len() + chunk.len() > self.config.max_file_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds the {} byte limit",
                    self.config.max_file_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(PendingFile {
            field: name,
            original_name,
            content_type,
            bytes,
        })
    }

    async fn write_all(&self, files: Vec<PendingFile>) -> Result<Vec<StoredFile>, AppError> {
        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            match self.write(file).await {
                Ok(file) => stored.push(file),
                Err(e) => {
                    for file in &stored {
                        self.remove(&file.path).await;
                    }
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    async fn write(&self, file: PendingFile) -> Result<StoredFile, AppError> {
        fs::create_dir_all(&self.config.dir).await?;

        let file_name = stored_file_name(
            &file.field,
            file.original_name.as_deref(),
            &file.content_type,
        );
        fs::write(self.config.dir.join(&file_name), &file.bytes).await?;

        tracing::debug!(field = %file.field, file_name = %file_name, size = file.bytes.len(), "Stored upload");

        Ok(StoredFile {
            field: file.field,
            path: format!("{PUBLIC_PREFIX}/{file_name}"),
            file_name,
            content_type: file.content_type,
            size: file.bytes.len(),
        })
    }

    /// Delete a previously stored file by its public path. Missing files are ignored.
    pub async fn remove(&self, public_path: &str) {
        let Some(name) = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return;
        };
        // Never follow a path out of the upload dir
        if name.contains('/') || name.contains("..") {
            return;
        }

        if let Err(e) = fs::remove_file(self.config.dir.join(name)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %public_path, error = %e, "Failed to remove upload");
            }
        }
    }
}

/// `{field}-{unix_millis}-{random below 1e9}{.ext}`
///
/// The extension comes from the client's file name when it is a known raster
/// image extension, otherwise from the content type.
pub(crate) fn stored_file_name(field: &str, original_name: Option<&str>, content_type: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| RASTER_EXTENSIONS.contains(&ext.as_str()))
        .map(|ext| format!(".{ext}"))
        .or_else(|| extension_for(content_type).map(str::to_string))
        .unwrap_or_default();

    format!("{field}-{millis}-{suffix}{ext}")
}

const RASTER_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "avif"];

/// Accepted upload types. Scriptable formats such as SVG are served back
/// verbatim from the upload dir and stay out.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/avif" => Some(".avif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        body::Body,
        extract::State,
        http::{Request, StatusCode},
        response::IntoResponse,
        routing::post,
    };
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-SHOP-BOUNDARY";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn upload(State(store): State<UploadStore>, multipart: Multipart) -> impl IntoResponse {
        match store.read_form(multipart, &["images"]).await {
            Ok(form) => (
                StatusCode::OK,
                Json(serde_json::json!({
                    "name": form.text("name"),
                    "images": form.files("images"),
                })),
            )
                .into_response(),
            Err(e) => e.into_response(),
        }
    }

    fn app(dir: &Path, max_file_bytes: usize, max_files: usize) -> Router {
        let store = UploadStore::new(UploadConfig {
            dir: dir.to_path_buf(),
            max_file_bytes,
            max_files,
        });
        Router::new().route("/upload", post(upload)).with_state(store)
    }

    fn request(parts: &[Part]) -> Request<Body> {
        Request::post("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn test_stored_file_name_format() {
        let name = stored_file_name("images", Some("Red Shoe.PNG"), "image/png");
        let parts: Vec<&str> = name.splitn(3, '-').collect();
        assert_eq!(parts[0], "images");
        assert!(parts[1].parse::<i64>().is_ok());

        let (random, ext) = parts[2].split_once('.').unwrap();
        assert!(random.parse::<u32>().unwrap() < 1_000_000_000);
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_stored_file_name_falls_back_to_content_type() {
        assert!(stored_file_name("image", Some("blob"), "image/webp").ends_with(".webp"));
        assert!(!stored_file_name("image", None, "image/x-unknown").contains('.'));
        assert!(stored_file_name("image", Some("cat.svg"), "image/png").ends_with(".png"));
        assert!(stored_file_name("image", Some("cat.JPEG"), "image/jpeg").ends_with(".jpeg"));
    }

    #[tokio::test]
    async fn test_read_form_stores_images_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path(), 1024, 5)
            .oneshot(request(&[
                Part::Text("name", "Sneaker"),
                Part::File("images", "a.jpg", "image/jpeg", b"jpeg-bytes"),
                Part::File("images", "b.png", "image/png", b"png-bytes"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(files_in(dir.path()), 2);
    }

    #[tokio::test]
    async fn test_non_image_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path(), 1024, 5)
            .oneshot(request(&[
                Part::File("images", "a.jpg", "image/jpeg", b"jpeg-bytes"),
                Part::File("images", "notes.pdf", "application/pdf", b"%PDF"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_svg_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#;
        let response = app(dir.path(), 1024, 5)
            .oneshot(request(&[Part::File("images", "logo.svg", "image/svg+xml", svg)]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_failed_write_removes_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(UploadConfig::new(dir.path()));
        let file = |field: &str| PendingFile {
            field: field.to_string(),
            original_name: Some("a.png".to_string()),
            content_type: "image/png".to_string(),
            bytes: b"png-bytes".to_vec(),
        };

        // The second target sits in a directory that does not exist
        let result = store
            .write_all(vec![file("images"), file("missing/images")])
            .await;

        assert!(result.is_err());
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_oversized_file_is_413() {
        let dir = tempfile::tempdir().unwrap();
        let big = vec![0u8; 64];
        let response = app(dir.path(), 16, 5)
            .oneshot(request(&[Part::File("images", "a.png", "image/png", &big)]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_too_many_files_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path(), 1024, 1)
            .oneshot(request(&[
                Part::File("images", "a.png", "image/png", b"1"),
                Part::File("images", "b.png", "image/png", b"2"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unexpected_file_field_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path(), 1024, 5)
            .oneshot(request(&[Part::File("avatar", "a.png", "image/png", b"1")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_remove_deletes_only_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("image-1-2.png"), b"x").unwrap();
        let store = UploadStore::new(UploadConfig::new(dir.path()));

        store.remove("uploads/../secret").await;
        store.remove("uploads/image-1-2.png").await;
        store.remove("uploads/missing.png").await;

        assert_eq!(files_in(dir.path()), 0);
    }
}
