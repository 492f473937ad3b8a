use booking_notify_service::config::RelayConfig;
use booking_notify_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use wiremock::MockServer;

pub const LINE_TOKEN: &str = "line-test-token";
pub const FB_TOKEN: &str = "fb-test-token";
pub const LINE_PUSH_PATH: &str = "/v2/bot/message/push";
pub const FB_MESSAGES_PATH: &str = "/v22.0/me/messages";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub line_server: MockServer,
    pub facebook_server: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    /// One LINE target, one Messenger recipient, short delivery timeout.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Start from the default test environment and let the caller override
    /// keys. An empty value reads as unset.
    pub async fn spawn_with<F>(customize: F) -> Self
    where
        F: FnOnce(&mut HashMap<&'static str, String>),
    {
        let line_server = MockServer::start().await;
        let facebook_server = MockServer::start().await;

        let mut env: HashMap<&'static str, String> = HashMap::from([
            ("LINE_CHANNEL_ACCESS_TOKEN", LINE_TOKEN.to_string()),
            ("LINE_TO_IDS", "U-owner".to_string()),
            ("FB_PAGE_ACCESS_TOKEN", FB_TOKEN.to_string()),
            ("FB_RECIPIENT_PSIDS", "PSID-1".to_string()),
            (
                "LINE_PUSH_API",
                format!("{}{}", line_server.uri(), LINE_PUSH_PATH),
            ),
            ("FB_GRAPH_API", format!("{}/v22.0", facebook_server.uri())),
            ("DELIVERY_TIMEOUT_MS", "300".to_string()),
            ("ALLOWED_ORIGINS", "https://booking.example.com".to_string()),
        ]);
        customize(&mut env);

        // Use random port for testing (port 0)
        let config = RelayConfig::from_lookup(CoreConfig { port: 0 }, |key| env.get(key).cloned())
            .expect("Failed to build test configuration");

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            line_server,
            facebook_server,
            client,
        }
    }

    pub async fn post_booking(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/booking-notify", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
