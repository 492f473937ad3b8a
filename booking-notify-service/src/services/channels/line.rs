use super::{check_response, DeliveryError, MessageChannel};
use crate::models::Channel;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// LINE rejects text messages longer than 5000 characters; stay well below.
pub const LINE_MAX_TEXT_LEN: usize = 4500;

/// Push-message client for the LINE Messaging API.
#[derive(Clone)]
pub struct LinePushClient {
    client: Client,
    api_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct LinePushRequest<'a> {
    to: &'a str,
    messages: [LineTextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct LineTextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl LinePushClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MessageChannel for LinePushClient {
    fn channel(&self) -> Channel {
        Channel::Line
    }

    fn max_text_len(&self) -> usize {
        LINE_MAX_TEXT_LEN
    }

    async fn deliver(
        &self,
        credential: &str,
        target: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let request = LinePushRequest {
            to: target,
            messages: [LineTextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(credential)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::from_reqwest(e, self.timeout))?;

        check_response(response).await
    }
}
