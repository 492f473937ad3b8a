pub mod facebook;
pub mod line;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

use super::formatter::truncate_text;
use super::metrics::record_delivery;
use crate::models::{Channel, DeliveryResult};

pub use facebook::{FacebookInboxClient, FACEBOOK_MAX_TEXT_LEN};
pub use line::{LinePushClient, LINE_MAX_TEXT_LEN};

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The API answered outside 2xx.
    #[error("Request failed with status code {}", .status.as_u16())]
    Rejected { status: StatusCode, body: String },

    #[error("timeout of {}ms exceeded", .after.as_millis())]
    Timeout { after: Duration },

    /// Connection, TLS or protocol failure before a status was received.
    #[error("{0}")]
    Transport(String),
}

impl DeliveryError {
    /// Classify a `reqwest` failure. The URL is dropped from the message
    /// because the inbox API carries its token in the query string.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return DeliveryError::Timeout { after: timeout };
        }
        DeliveryError::Transport(error_chain(&err.without_url()))
    }

    /// Short text for the `error` field of a failed result: the API's own
    /// response body when it sent one, else this error's message.
    pub fn summary(&self) -> String {
        match self {
            DeliveryError::Rejected { body, .. } if !body.trim().is_empty() => {
                match serde_json::from_str::<Value>(body) {
                    Ok(Value::String(text)) => text,
                    Ok(json) => json.to_string(),
                    Err(_) => body.clone(),
                }
            }
            other => other.to_string(),
        }
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Map a received response to the delivery outcome: 2xx is delivered,
/// anything else is rejected with whatever body came back.
pub(crate) async fn check_response(response: Response) -> Result<(), DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(DeliveryError::Rejected { status, body })
}

/// One outbound messaging API able to deliver text to a single recipient.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    fn channel(&self) -> Channel;

    /// Longest text, in characters, the API accepts in one message.
    fn max_text_len(&self) -> usize;

    async fn deliver(&self, credential: &str, target: &str, text: &str)
        -> Result<(), DeliveryError>;
}

/// Send `text` to every target at once and wait for all of them.
///
/// Results come back in target order, one per target. A failed delivery is
/// recorded in its result and never stops the others. `Err` means a delivery
/// job aborted without producing a result; it is only returned after every
/// other job has finished.
///
/// Each delivery runs as its own detached task: dropping the returned future
/// stops the waiting, not the calls already issued.
pub async fn send_to_all(
    sender: Arc<dyn MessageChannel>,
    credential: &Secret<String>,
    targets: &[String],
    text: &str,
) -> Result<Vec<DeliveryResult>, JoinError> {
    let channel = sender.channel();
    let text: Arc<str> = Arc::from(truncate_text(text, sender.max_text_len()).as_ref());
    let credential: Arc<str> = Arc::from(credential.expose_secret().as_str());

    let jobs: Vec<JoinHandle<DeliveryResult>> = targets
        .iter()
        .cloned()
        .map(|target| {
            let sender = Arc::clone(&sender);
            let text = Arc::clone(&text);
            let credential = Arc::clone(&credential);
            tokio::spawn(async move { deliver_one(sender, &credential, target, &text).await })
        })
        .collect();

    let mut results = Vec::with_capacity(jobs.len());
    let mut aborted = None;
    for job in jobs {
        match job.await {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::error!(channel = %channel, error = %e, "Delivery job aborted");
                aborted.get_or_insert(e);
            }
        }
    }

    match aborted {
        Some(e) => Err(e),
        None => Ok(results),
    }
}

async fn deliver_one(
    sender: Arc<dyn MessageChannel>,
    credential: &str,
    target: String,
    text: &str,
) -> DeliveryResult {
    let channel = sender.channel();
    let result = match sender.deliver(credential, &target, text).await {
        Ok(()) => {
            tracing::info!(channel = %channel, target = %target, "Message delivered");
            DeliveryResult::delivered(channel, target)
        }
        Err(e) => {
            let summary = e.summary();
            tracing::warn!(
                channel = %channel,
                target = %target,
                error = %summary,
                "Message delivery failed"
            );
            DeliveryResult::failed(channel, target, summary)
        }
    };
    record_delivery(channel, result.ok);
    result
}
