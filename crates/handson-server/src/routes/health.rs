//! Liveness and tool listing.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;
use crate::tools::{Tool, ToolInfo};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
}

/// GET /api/health — liveness and configured providers.
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "llm": state.provider_status,
        "ocrAvailable": state.pipeline.ocr_available(),
        "dataDir": state.config.data_paths.root,
    }))
}

/// GET /api/tools — names and descriptions for an agent layer.
async fn list_tools() -> Json<Vec<ToolInfo>> {
    Json(Tool::ALL.into_iter().map(Tool::info).collect())
}
