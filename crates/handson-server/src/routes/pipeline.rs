//! Typed pipeline endpoints returning a serialized report.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use handson_pipeline::{spawn_filter, FilterRequest, MatchRequest, PipelineReport};

use super::report_status_code;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extract", post(extract))
        .route("/match", post(match_activities))
        .route("/filter", post(filter_activities))
        .route("/generate", post(generate))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractBody {
    pdf_path: PathBuf,
}

#[derive(Deserialize)]
struct GenerateBody {
    path: PathBuf,
}

fn respond(report: PipelineReport) -> impl IntoResponse {
    (report_status_code(&report), Json(report))
}

/// POST /api/extract — `{"pdfPath"}`.
async fn extract(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExtractBody>,
) -> impl IntoResponse {
    respond(state.pipeline.extract(&body.pdf_path).await)
}

/// POST /api/match — `{"masterPath", "secondaryPath"}`.
async fn match_activities(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MatchRequest>,
) -> impl IntoResponse {
    respond(state.pipeline.match_activities(&request).await)
}

/// POST /api/filter — `{"masterPath", "matchPath"}`.
async fn filter_activities(Json(request): Json<FilterRequest>) -> impl IntoResponse {
    respond(spawn_filter(request).await)
}

/// POST /api/generate — `{"path"}`.
async fn generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateBody>,
) -> impl IntoResponse {
    respond(state.pipeline.generate(&body.path).await)
}
