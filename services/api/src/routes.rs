use crate::infra::{AppState, HrStack};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use hr_records::hr::hr_router;
use serde_json::json;
use std::path::Path;
use tower_http::services::ServeDir;

/// HR routes plus the operational endpoints, uploaded-file serving, and the JSON 404.
pub(crate) fn with_hr_routes(stack: &HrStack, upload_root: &Path) -> axum::Router {
    hr_router(
        stack.auth.clone(),
        stack.employees.clone(),
        stack.leaves.clone(),
    )
    .route("/", axum::routing::get(root))
    .route("/health", axum::routing::get(healthcheck))
    .route("/ready", axum::routing::get(readiness_endpoint))
    .route("/metrics", axum::routing::get(metrics_endpoint))
    .nest_service("/uploads", ServeDir::new(upload_root))
    .fallback(not_found)
}

pub(crate) async fn root() -> &'static str {
    "API is running..."
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Not Found",
            "success": false,
            "code": 404,
            "error": "The requested resource was not found on this server.",
        })),
    )
}
