//! HTTP wiring for each domain.
//!
//! Everything here is nested under `/api` by `axum_helpers::create_router`.

pub mod admins;
pub mod catalog;
pub mod commerce;
pub mod content;
pub mod health;
pub mod users;

use axum::{Router, middleware};
use axum_helpers::jwt_auth_middleware;
use mongodb::Database;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/auth", users::auth_router(state))
        .nest("/users", protect(users::router(state), state))
        .nest("/admins", admins::router(state))
        .merge(protect(catalog::router(state), state))
        .merge(protect(commerce::router(state), state))
        .merge(protect(content::router(state), state))
}

/// Put every route of `router` behind the bearer middleware
fn protect(router: Router, state: &AppState) -> Router {
    router.layer(middleware::from_fn_with_state(
        state.jwt.clone(),
        jwt_auth_middleware,
    ))
}

/// Create the indexes of every collection that declares some
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    users::init_indexes(db).await?;
    catalog::init_indexes(db).await?;
    commerce::init_indexes(db).await?;
    content::init_indexes(db).await?;
    admins::init_indexes(db).await?;
    Ok(())
}
