//! # Axum Helpers
//!
//! Shared plumbing for the storefront HTTP services.
//!
//! - **[`auth`]**: HS256 access/refresh tokens and the bearer middleware
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `{code, error, message, details}` error responses
//! - **[`extractors`]**: `UuidPath`, `ValidatedJson`
//! - **[`uploads`]**: multipart image uploads to local disk

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;
pub mod uploads;

pub use auth::{
    IssuedToken, JwtAuth, JwtClaims, JwtConfig, TokenError, TokenSubject, TokenType,
    jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

pub use http::{cors_layer_from_env, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, MessageResponse};

pub use extractors::{UuidPath, ValidatedJson};

pub use uploads::{MultipartForm, StoredFile, UploadConfig, UploadStore};
