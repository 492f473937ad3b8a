use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Browser access policy. An empty allow-list admits any origin (`*`);
/// otherwise only the listed origins are echoed back.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                    None
                }
            })
            .collect::<Vec<HeaderValue>>();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Answer any `OPTIONS` request that is not a CORS preflight with 204.
///
/// Sits inside [`cors_layer`], which handles real preflights itself, so the
/// routes never see `OPTIONS` and never answer it with 405.
pub async fn options_no_content(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(req).await
}
