use super::{check_response, DeliveryError, MessageChannel};
use crate::models::Channel;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Messenger caps text messages at 2000 characters.
pub const FACEBOOK_MAX_TEXT_LEN: usize = 1800;

/// Send API client delivering into page inboxes by PSID.
#[derive(Clone)]
pub struct FacebookInboxClient {
    client: Client,
    graph_api: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendApiRequest<'a> {
    recipient: Recipient<'a>,
    messaging_type: &'static str,
    message: TextMessage<'a>,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    text: &'a str,
}

impl FacebookInboxClient {
    pub fn new(graph_api: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            graph_api: graph_api.into(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/me/messages", self.graph_api.trim_end_matches('/'))
    }
}

#[async_trait]
impl MessageChannel for FacebookInboxClient {
    fn channel(&self) -> Channel {
        Channel::Facebook
    }

    fn max_text_len(&self) -> usize {
        FACEBOOK_MAX_TEXT_LEN
    }

    async fn deliver(
        &self,
        credential: &str,
        target: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let request = SendApiRequest {
            recipient: Recipient { id: target },
            messaging_type: "UPDATE",
            message: TextMessage { text },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("access_token", credential)])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::from_reqwest(e, self.timeout))?;

        check_response(response).await
    }
}
