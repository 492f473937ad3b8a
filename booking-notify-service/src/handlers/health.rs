use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::observability::render_metrics;

use crate::startup::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "service": "booking-notify-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/config-check`: which channel settings are present, never the values.
pub async fn config_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "config": state.config.summary()
    }))
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(),
    )
}
