//! Scripted channel for exercising fan-out and dispatch without a network.

use super::{DeliveryError, MessageChannel};
use crate::models::Channel;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Ok,
    DelayedOk(Duration),
    /// Rejected by the API with this response body.
    Fail(String),
    Panic,
}

pub struct MockChannel {
    channel: Channel,
    max_text_len: usize,
    outcomes: HashMap<String, MockOutcome>,
    send_count: AtomicU64,
    completed_count: AtomicU64,
    sent: Mutex<Vec<(String, String)>>,
}

impl MockChannel {
    /// Every target succeeds unless scripted otherwise.
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            max_text_len: 4500,
            outcomes: HashMap::new(),
            send_count: AtomicU64::new(0),
            completed_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_outcome(mut self, target: &str, outcome: MockOutcome) -> Self {
        self.outcomes.insert(target.to_string(), outcome);
        self
    }

    pub fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = max_text_len;
        self
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn completed_count(&self) -> u64 {
        self.completed_count.load(Ordering::SeqCst)
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn credentials(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(cred, _)| cred.clone()).collect()
    }
}

#[async_trait]
impl MessageChannel for MockChannel {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn max_text_len(&self) -> usize {
        self.max_text_len
    }

    async fn deliver(
        &self,
        credential: &str,
        target: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((credential.to_string(), text.to_string()));

        let outcome = self.outcomes.get(target).cloned().unwrap_or(MockOutcome::Ok);
        let result = match outcome {
            MockOutcome::Ok => Ok(()),
            MockOutcome::DelayedOk(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            MockOutcome::Fail(body) => Err(DeliveryError::Rejected {
                status: StatusCode::BAD_REQUEST,
                body,
            }),
            MockOutcome::Panic => panic!("[MOCK] delivery to {} blew up", target),
        };

        self.completed_count.fetch_add(1, Ordering::SeqCst);
        result
    }
}
