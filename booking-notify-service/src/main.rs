use booking_notify_service::config::RelayConfig;
use booking_notify_service::startup::Application;
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT")
        .ok()
        .filter(|endpoint| !endpoint.is_empty());
    init_tracing(
        "booking-notify-service",
        &log_level,
        otlp_endpoint.as_deref(),
    );

    if let Err(e) = init_metrics() {
        tracing::warn!("Metrics recorder not installed: {}", e);
    }

    let config = RelayConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let summary = config.summary();
    tracing::info!(
        line_token = summary.line_token,
        line_targets = summary.line_targets,
        fb_token = summary.fb_token,
        fb_recipients = summary.fb_recipients,
        "Channel configuration loaded"
    );
    let missing = config.missing_keys();
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "Booking notifications will be rejected until these settings are provided"
        );
    }

    let app = Application::build(config)
        .await
        .map_err(|e| std::io::Error::other(format!("Startup error: {}", e)))?;

    app.run_until_stopped().await
}
