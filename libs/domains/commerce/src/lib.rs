//! Commerce Domain
//!
//! Shopping carts, orders and return requests. Each resource has its own
//! repository and a service generic over it, so handlers and tests can run
//! against MongoDB or a mock alike.
//!
//! Orders advance `pending → processing → shipped → delivered` and never
//! move back. Return requests keep a history entry for every status change.
//!
//! # Usage
//!
//! ```rust,ignore
//! let carts = CartService::new(MongoCartRepository::new(&db));
//! let orders = OrderService::new(MongoOrderRepository::new(&db));
//! let returns = ReturnService::new(MongoReturnRepository::new(&db));
//!
//! let app = Router::new().nest("/api", handlers::router(carts, orders, returns));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CommerceError, CommerceResult};
pub use handlers::ApiDoc;
pub use models::{Cart, Order, OrderStatus, ReturnRequest, ReturnStatus};
pub use crate::mongodb::{MongoCartRepository, MongoOrderRepository, MongoReturnRepository};
pub use repository::{CartRepository, OrderRepository, ReturnRepository};
pub use service::{CartService, OrderService, ReturnService};
