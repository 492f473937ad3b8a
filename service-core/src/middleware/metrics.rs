use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Label used for requests no route matched (static files, 404s).
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Count and time every request by method, route template and status.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().as_str().to_owned();
    let route = route_label(&req);

    let response = next.run(req).await;

    let labels = [
        ("method", method),
        ("route", route),
        ("status", response.status().as_u16().to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels)
        .record(started.elapsed().as_secs_f64());

    response
}

/// The route template rather than the raw path, so ids in URLs and
/// arbitrary static paths do not explode label cardinality.
fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_owned(), |p| p.as_str().to_owned())
}
