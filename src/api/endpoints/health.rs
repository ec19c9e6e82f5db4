//! Liveness endpoints.

use axum::extract::State;
use axum::Json;

use crate::api::types::ApiContext;
use crate::config::{APP_NAME, APP_VERSION};

pub async fn banner() -> &'static str {
    "NeuroScan API is running"
}

pub async fn health(State(ctx): State<ApiContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "name": APP_NAME,
        "version": APP_VERSION,
        "simulation": ctx.state.settings.simulation_mode(),
    }))
}
