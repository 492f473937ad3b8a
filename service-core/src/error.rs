use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Unsupported content type, expected {expected}")]
    UnsupportedMediaType { expected: &'static str },

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Missing configuration: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code carried in the `error` field of the body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidJson(_) => "invalid-json",
            AppError::UnsupportedMediaType { .. } => "unsupported-content-type",
            AppError::PayloadTooLarge => "payload-too-large",
            AppError::MissingConfig(_) => "missing-config",
            AppError::InternalError(_) => "internal-error",
            AppError::ConfigError(_) => "config-error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MissingConfig(_)
            | AppError::InternalError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            ok: bool,
            error: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            expected: Option<&'static str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            missing: Option<Vec<String>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            detail: Option<String>,
        }

        let status = self.status();
        let error = self.code();

        match &self {
            AppError::InvalidJson(reason) => {
                tracing::warn!(reason = %reason, "Rejected malformed JSON body")
            }
            AppError::InternalError(err) | AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Request failed")
            }
            _ => {}
        }

        let (expected, missing, detail) = match self {
            AppError::UnsupportedMediaType { expected } => (Some(expected), None, None),
            AppError::MissingConfig(keys) => (None, Some(keys), None),
            AppError::InternalError(err) => (None, None, Some(err.to_string())),
            _ => (None, None, None),
        };

        (
            status,
            Json(ErrorResponse {
                ok: false,
                error,
                expected,
                missing,
                detail,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_config_lists_keys() {
        let (status, body) = body_json(AppError::MissingConfig(vec![
            "LINE_TO_IDS".to_string(),
            "FB_PAGE_ACCESS_TOKEN".to_string(),
        ]))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "missing-config");
        assert_eq!(
            body["missing"],
            serde_json::json!(["LINE_TO_IDS", "FB_PAGE_ACCESS_TOKEN"])
        );
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn unsupported_media_type_names_expected_type() {
        let (status, body) = body_json(AppError::UnsupportedMediaType {
            expected: "application/json",
        })
        .await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "unsupported-content-type");
        assert_eq!(body["expected"], "application/json");
    }

    #[tokio::test]
    async fn invalid_json_hides_parser_detail() {
        let (status, body) =
            body_json(AppError::InvalidJson("EOF while parsing".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "ok": false, "error": "invalid-json" }));
    }

    #[tokio::test]
    async fn internal_error_carries_detail() {
        let (status, body) =
            body_json(AppError::InternalError(anyhow::anyhow!("task 3 panicked"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal-error");
        assert_eq!(body["detail"], "task 3 panicked");
    }
}
