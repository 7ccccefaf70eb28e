//! Users Domain
//!
//! Shopper accounts and the auth/session subsystem.
//!
//! # Features
//!
//! - Registration with an emailed confirmation link and 6-digit OTP
//! - Password login issuing access/refresh JWT pairs
//! - Refresh-token rotation backed by server-side sessions, with reuse detection
//! - Password reset by emailed token
//! - Profile CRUD
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │ handlers / auth_handlers │  ← HTTP endpoints
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ UserService / AuthService│  ← Business logic, hashing, token issuance
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ User/Session repositories│  ← Data access (traits + MongoDB)
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │          Models          │  ← Entities, DTOs
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let users = Arc::new(MongoUserRepository::new(&db));
//! let sessions = Arc::new(MongoSessionRepository::new(&db));
//!
//! let auth = AuthService::new(users.clone(), sessions.clone(), jwt, mailer, base_url);
//! let app = Router::new()
//!     .nest("/auth", auth_handlers::router(auth, true))
//!     .nest("/users", handlers::router(UserService::new(users, sessions)));
//! ```

pub mod auth;
pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod secrets;
pub mod service;

pub use auth::AuthService;
pub use error::{UserError, UserResult};
pub use models::{Address, Gender, Session, UpdateUser, User, UserFilter, UserResponse};
pub use crate::mongodb::{MongoSessionRepository, MongoUserRepository};
pub use repository::{SessionRepository, UserRepository};
pub use service::UserService;
