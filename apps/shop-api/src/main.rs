use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    let state = AppState::new(config, mongo_client)?;
    info!(
        database = %state.config.mongodb.database(),
        "Connected, creating indexes"
    );
    api::init_indexes(&state.db).await?;

    tokio::fs::create_dir_all(&state.config.uploads.dir).await?;

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    let app = router
        .nest_service("/uploads", ServeDir::new(&state.config.uploads.dir))
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!("Starting shop API (30s shutdown timeout)");

    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            drop(state);
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shop API shutdown complete");
    Ok(())
}
