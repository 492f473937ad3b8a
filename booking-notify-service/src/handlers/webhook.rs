use axum::{body::Bytes, extract::rejection::BytesRejection, http::StatusCode};
use serde_json::Value;

use crate::services::extract_recipient_ids;

/// `POST /api/line-webhook`
///
/// Used once during setup: point the LINE channel's webhook here, message the
/// bot, and copy the logged ids into `LINE_TO_IDS`. Always acknowledges.
pub async fn line_webhook(body: Result<Bytes, BytesRejection>) -> StatusCode {
    let payload = match body {
        Ok(bytes) => serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null),
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "[line-webhook] unreadable body");
            Value::Null
        }
    };

    let pretty = serde_json::to_string_pretty(&payload).unwrap_or_default();
    tracing::info!(payload = %pretty, "[line-webhook] payload");

    let ids = extract_recipient_ids(&payload);
    if !ids.is_empty() {
        tracing::info!("[line-webhook] LINE_TO_IDS={}", ids.join(","));
    }

    StatusCode::OK
}
