//! Carts, orders and returns

use axum::Router;
use domain_commerce::{
    CartService, MongoCartRepository, MongoOrderRepository, MongoReturnRepository, OrderService,
    ReturnService, handlers,
};
use mongodb::Database;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let db = &state.db;
    handlers::router(
        CartService::new(MongoCartRepository::new(db)),
        OrderService::new(MongoOrderRepository::new(db)),
        ReturnService::new(MongoReturnRepository::new(db)),
    )
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoCartRepository::new(db).init_indexes().await?;
    MongoOrderRepository::new(db).init_indexes().await?;
    MongoReturnRepository::new(db).init_indexes().await?;
    Ok(())
}
