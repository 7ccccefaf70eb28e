//! Multipart image uploads stored on local disk.
//!
//! Files are written to [`UploadConfig::dir`] as
//! `{field}-{unix_millis}-{random}{.ext}` and referenced by their public
//! path `uploads/<name>`, which the binary serves statically.

mod config;
mod form;
mod store;

pub use config::UploadConfig;
pub use form::MultipartForm;
pub use store::{StoredFile, UploadStore, PUBLIC_PREFIX};
