use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /health — liveness probe, returns agent metadata.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.registry.len(),
    }))
}

/// GET /project-dir — the workspace root this agent manages.
pub async fn project_dir_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "dir": state.config.paths.project,
    }))
}
