//! Readiness probe

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

/// `/ready`; `/health` comes from `axum_helpers::health_router`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB answers a ping, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let client = state.mongo_client.clone();
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async move {
            if database::mongodb::check_health(&client).await {
                Ok(())
            } else {
                Err("ping failed".to_string())
            }
        }),
    )];
    run_health_checks(checks).await
}
