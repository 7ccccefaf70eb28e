//! Admins Domain
//!
//! Back-office accounts. Anyone may create an admin (bootstrap); listing,
//! editing and removing admins needs a valid access token. Admin login
//! issues an access token whose roles are `["admin", <role>]`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let admins = Arc::new(MongoAdminRepository::new(&db));
//! let app = Router::new().nest("/admins", handlers::router(AdminService::new(admins, jwt)));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{AdminError, AdminResult};
pub use handlers::ApiDoc;
pub use models::{Admin, AdminResponse, AdminRole};
pub use crate::mongodb::MongoAdminRepository;
pub use repository::AdminRepository;
pub use service::AdminService;
