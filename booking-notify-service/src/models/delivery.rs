use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// LINE Messaging API push.
    Line,
    /// Facebook Messenger page inbox.
    Facebook,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Line => "line",
            Channel::Facebook => "facebook",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one message sent to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryResult {
    pub channel: Channel,
    pub target: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryResult {
    pub fn delivered(channel: Channel, target: impl Into<String>) -> Self {
        Self {
            channel,
            target: target.into(),
            ok: true,
            error: None,
        }
    }

    pub fn failed(channel: Channel, target: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            channel,
            target: target.into(),
            ok: false,
            error: Some(error.into()),
        }
    }
}
