use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use service_core::error::AppError;
use std::sync::Arc;

use super::extract::JsonPayload;
use crate::models::{BookingRequest, DeliveryResult};
use crate::services::DispatchReport;
use crate::startup::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeliveredResponse {
    ok: bool,
    line_delivered: bool,
    facebook_delivered: bool,
    sent: usize,
    total: usize,
    failed: Vec<DeliveryResult>,
}

#[derive(Debug, Serialize)]
struct UndeliveredResponse {
    ok: bool,
    error: &'static str,
    failed: Vec<DeliveryResult>,
    sent: usize,
    total: usize,
}

impl IntoResponse for DispatchReport {
    fn into_response(self) -> Response {
        if self.is_success() {
            (
                StatusCode::OK,
                Json(DeliveredResponse {
                    ok: true,
                    line_delivered: self.line_delivered,
                    facebook_delivered: self.facebook_delivered,
                    sent: self.sent,
                    total: self.total,
                    failed: self.failed,
                }),
            )
                .into_response()
        } else {
            (
                StatusCode::BAD_GATEWAY,
                Json(UndeliveredResponse {
                    ok: false,
                    error: "line-delivery-required",
                    failed: self.failed,
                    sent: self.sent,
                    total: self.total,
                }),
            )
                .into_response()
        }
    }
}

/// `POST /api/booking-notify`
#[tracing::instrument(skip_all)]
pub async fn booking_notify(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> Result<DispatchReport, AppError> {
    let booking = BookingRequest::from_json(payload)
        .map_err(|e| AppError::InvalidJson(e.to_string()))?;

    // A client that hangs up must not cut short deliveries already issued.
    let dispatcher = Arc::clone(&state.dispatcher);
    let now = Utc::now();
    tokio::spawn(async move { dispatcher.dispatch(&booking, now).await })
        .await
        .map_err(|e| anyhow::anyhow!("Dispatch task aborted: {}", e))?
}
