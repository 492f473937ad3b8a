//! JSON body extractor that answers in the service's own error shape.
//!
//! axum's `Json` rejects with plain-text bodies and 422 for shape errors;
//! callers of this API expect `{ok:false, error:"invalid-json"}` and friends.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap, StatusCode};
use serde_json::{Map, Value};
use service_core::error::AppError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A parsed JSON object or array. An empty body reads as `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPayload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(AppError::UnsupportedMediaType {
                expected: JSON_CONTENT_TYPE,
            });
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::InvalidJson(rejection.body_text())
            }
        })?;

        parse_payload(&bytes).map(JsonPayload)
    }
}

/// `application/json`, with or without parameters such as `charset`.
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
}

fn parse_payload(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err(AppError::InvalidJson(
            "top-level JSON value must be an object or array".to_string(),
        )),
        Err(e) => Err(AppError::InvalidJson(e.to_string())),
    }
}
