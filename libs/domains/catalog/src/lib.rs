//! Catalog Domain
//!
//! Products, their variants, categories, marks (brands) and reviews.
//!
//! Relationships are stored once, on the child: a product carries its
//! `category_id` and `mark_id`, variants and reviews carry `product_id`,
//! categories carry `parent_id`. Reverse memberships are computed by query.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │         handlers         │  ← HTTP endpoints, multipart parsing
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │      CatalogService      │  ← References, cascades, ratings
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │       repositories       │  ← One trait per collection + MongoDB
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let service = CatalogService::new(CatalogRepositories {
//!     products: Arc::new(MongoProductRepository::new(&db)),
//!     variants: Arc::new(MongoVariantRepository::new(&db)),
//!     categories: Arc::new(MongoCategoryRepository::new(&db)),
//!     marks: Arc::new(MongoMarkRepository::new(&db)),
//!     reviews: Arc::new(MongoReviewRepository::new(&db)),
//! });
//! let app = Router::new().nest("/api", handlers::router(service, uploads));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{Category, Mark, Product, ProductDetails, ProductVariant, Review};
pub use crate::mongodb::{
    MongoCategoryRepository, MongoMarkRepository, MongoProductRepository, MongoReviewRepository,
    MongoVariantRepository,
};
pub use repository::{
    CategoryRepository, MarkRepository, ProductRepository, ReviewRepository, VariantRepository,
};
pub use service::{CatalogRepositories, CatalogService};
