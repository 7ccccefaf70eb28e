use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::path::PathBuf;

/// Upload limits and target directory.
///
/// Environment variables:
/// - `UPLOAD_DIR` (default `uploads`)
/// - `UPLOAD_MAX_FILE_BYTES` (default 5 MiB)
/// - `UPLOAD_MAX_FILES` (default 5, per request)
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_file_bytes: usize,
    pub max_files: usize,
}

impl UploadConfig {
    pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
    pub const DEFAULT_MAX_FILES: usize = 5;

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_file_bytes: Self::DEFAULT_MAX_FILE_BYTES,
            max_files: Self::DEFAULT_MAX_FILES,
        }
    }

    /// Largest request body a multipart route should accept.
    pub fn body_limit(&self) -> usize {
        // room for text fields and part headers
        self.max_file_bytes * self.max_files + 64 * 1024
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::new("uploads")
    }
}

impl FromEnv for UploadConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dir: PathBuf::from(env_or_default("UPLOAD_DIR", "uploads")),
            max_file_bytes: env_parse_or("UPLOAD_MAX_FILE_BYTES", Self::DEFAULT_MAX_FILE_BYTES)?,
            max_files: env_parse_or("UPLOAD_MAX_FILES", Self::DEFAULT_MAX_FILES)?,
        })
    }
}
