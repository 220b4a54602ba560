//! Invoke a tool by name with free-form input.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::state::AppState;
use crate::tools::{run_tool, Tool};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tools/{name}", post(invoke_tool))
}

#[derive(Deserialize)]
struct ToolInput {
    input: String,
}

/// POST /api/tools/{name} — `{"input": "..."}` → `{"tool", "output"}`.
async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<ToolInput>,
) -> impl IntoResponse {
    let Some(tool) = Tool::from_name(&name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("Unknown tool: {}", name) })),
        );
    };

    info!("Tool {} invoked", tool.name());
    let report = run_tool(&state.pipeline, tool, &body.input).await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "tool": tool.name(),
            "output": report.to_string(),
            "status": report.status,
        })),
    )
}
