use crate::server::ApiState;
use axum::extract::State;
use axum::response::Json;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// GET /health
pub async fn health_check(State(state): State<Arc<ApiState>>) -> Json<Value> {
    let engine = match state.handler.engine().ping().await {
        Ok(()) => "reachable",
        Err(e) => {
            debug!(error = %e, "Engine ping failed");
            "unreachable"
        }
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "engine_api_version": state.engine_api_version,
        "engine": engine,
    }))
}
