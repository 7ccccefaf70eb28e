//! Bearer authentication.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/api/orders", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{IssuedToken, JwtAuth, JwtClaims, TokenError, TokenSubject, TokenType};
pub use middleware::{extract_token_from_request, jwt_auth_middleware};
