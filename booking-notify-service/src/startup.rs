//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers;
use crate::services::{Dispatcher, FacebookInboxClient, LinePushClient, MessageChannel};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors_layer, metrics_middleware, options_no_content, request_id_middleware, trace_layer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::ServeDir;

/// Largest request body accepted by any route.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// State wired to the real LINE and Messenger APIs named in `config`.
    pub fn new(config: RelayConfig) -> Self {
        let line: Arc<dyn MessageChannel> = Arc::new(LinePushClient::new(
            config.line.api_url.clone(),
            config.delivery_timeout,
        ));
        let facebook: Arc<dyn MessageChannel> = Arc::new(FacebookInboxClient::new(
            config.facebook.graph_api.clone(),
            config.delivery_timeout,
        ));

        Self::with_channels(config, line, facebook)
    }

    pub fn with_channels(
        config: RelayConfig,
        line: Arc<dyn MessageChannel>,
        facebook: Arc<dyn MessageChannel>,
    ) -> Self {
        let config = Arc::new(config);
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&config), line, facebook));
        Self { config, dispatcher }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.http.allowed_origins);
    let static_dir = state.config.http.static_dir.clone();

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/booking-notify", post(handlers::booking_notify))
        .route("/api/line-webhook", post(handlers::line_webhook))
        .route("/api/config-check", get(handlers::config_check));

    if let Some(dir) = static_dir {
        tracing::info!(dir = %dir.display(), "Serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(trace_layer())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(options_no_content))
        .layer(cors)
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Bind the listener. Port 0 picks a free port, which tests rely on.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        Self::build_with_state(AppState::new(config)).await
    }

    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Booking notify service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM, then let in-flight requests finish.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
