pub mod cors;
pub mod metrics;
pub mod tracing;

pub use self::cors::{cors_layer, options_no_content};
pub use self::metrics::metrics_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware, trace_layer};
