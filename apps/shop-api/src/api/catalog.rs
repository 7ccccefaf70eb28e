//! Products, variants, categories, marks and reviews

use axum::{Router, extract::DefaultBodyLimit};
use domain_catalog::{
    CatalogRepositories, CatalogService, MongoCategoryRepository, MongoMarkRepository,
    MongoProductRepository, MongoReviewRepository, MongoVariantRepository, handlers,
};
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let db = &state.db;
    let service = CatalogService::new(CatalogRepositories {
        products: Arc::new(MongoProductRepository::new(db)),
        variants: Arc::new(MongoVariantRepository::new(db)),
        categories: Arc::new(MongoCategoryRepository::new(db)),
        marks: Arc::new(MongoMarkRepository::new(db)),
        reviews: Arc::new(MongoReviewRepository::new(db)),
    });

    handlers::router(service, state.uploads.clone())
        .layer(DefaultBodyLimit::max(state.config.uploads.body_limit()))
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoProductRepository::new(db).init_indexes().await?;
    MongoVariantRepository::new(db).init_indexes().await?;
    MongoCategoryRepository::new(db).init_indexes().await?;
    MongoMarkRepository::new(db).init_indexes().await?;
    MongoReviewRepository::new(db).init_indexes().await?;
    Ok(())
}
