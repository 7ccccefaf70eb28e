//! Accounts: `/auth` and `/users`

use axum::Router;
use domain_users::{
    AuthService, MongoSessionRepository, MongoUserRepository, UserService, auth_handlers,
    handlers,
};
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

fn repositories(db: &Database) -> (Arc<MongoUserRepository>, Arc<MongoSessionRepository>) {
    (
        Arc::new(MongoUserRepository::new(db)),
        Arc::new(MongoSessionRepository::new(db)),
    )
}

/// Registration and sessions. Public apart from `/me` and `/logout-all`.
pub fn auth_router(state: &AppState) -> Router {
    let (users, sessions) = repositories(&state.db);
    let service = AuthService::new(
        users,
        sessions,
        state.jwt.clone(),
        state.mailer.clone(),
        state.config.base_url.clone(),
    );
    auth_handlers::router(service, state.config.environment.use_https())
}

pub fn router(state: &AppState) -> Router {
    let (users, sessions) = repositories(&state.db);
    handlers::router(UserService::new(users, sessions))
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    let (users, sessions) = repositories(db);
    users.init_indexes().await?;
    sessions.init_indexes().await?;
    Ok(())
}
