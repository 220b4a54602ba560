//! HTTP route handlers.

pub mod health;
pub mod pipeline;
pub mod tools;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handson_pipeline::{PipelineReport, ReportStatus};

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(tools::routes())
        .merge(pipeline::routes())
}

/// HTTP status for a pipeline outcome. Stage failures that are not the
/// caller's fault are still 200; the body carries the status.
pub fn report_status_code(report: &PipelineReport) -> StatusCode {
    match report.status {
        ReportStatus::InvalidInput | ReportStatus::SchemaError => StatusCode::UNPROCESSABLE_ENTITY,
        ReportStatus::NotFound => StatusCode::NOT_FOUND,
        ReportStatus::Success | ReportStatus::Empty | ReportStatus::Failed => StatusCode::OK,
    }
}
