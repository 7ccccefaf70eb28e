//! Back-office accounts. The router guards its own protected routes.

use axum::Router;
use domain_admins::{AdminService, MongoAdminRepository, handlers};
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let admins = Arc::new(MongoAdminRepository::new(&state.db));
    handlers::router(AdminService::new(admins, state.jwt.clone()))
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoAdminRepository::new(db).init_indexes().await?;
    Ok(())
}
