//! Content Domain
//!
//! Banners, default (fallback) images and product videos shown by the
//! storefront. Banners and default images carry one uploaded image each;
//! deleting the record removes the file.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ContentError, ContentResult};
pub use handlers::ApiDoc;
pub use models::{Banner, DefaultImage, Video};
pub use crate::mongodb::{MongoBannerRepository, MongoDefaultImageRepository, MongoVideoRepository};
pub use repository::{BannerRepository, DefaultImageRepository, VideoRepository};
pub use service::{ContentRepositories, ContentService};
