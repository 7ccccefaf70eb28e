//! Banners, default images and product videos

use axum::{Router, extract::DefaultBodyLimit};
use domain_content::{
    ContentRepositories, ContentService, MongoBannerRepository, MongoDefaultImageRepository,
    MongoVideoRepository, handlers,
};
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let db = &state.db;
    let service = ContentService::new(ContentRepositories {
        banners: Arc::new(MongoBannerRepository::new(db)),
        default_images: Arc::new(MongoDefaultImageRepository::new(db)),
        videos: Arc::new(MongoVideoRepository::new(db)),
    });

    handlers::router(service, state.uploads.clone())
        .layer(DefaultBodyLimit::max(state.config.uploads.body_limit()))
}

// default_images has none
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoBannerRepository::new(db).init_indexes().await?;
    MongoVideoRepository::new(db).init_indexes().await?;
    Ok(())
}
