use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LINE_PUSH_API: &str = "https://api.line.me/v2/bot/message/push";
pub const DEFAULT_FB_GRAPH_API: &str = "https://graph.facebook.com/v22.0";
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 8000;

pub const LINE_CHANNEL_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const LINE_TO_IDS: &str = "LINE_TO_IDS";
pub const FB_PAGE_ACCESS_TOKEN: &str = "FB_PAGE_ACCESS_TOKEN";
pub const FB_RECIPIENT_PSIDS: &str = "FB_RECIPIENT_PSIDS";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub line: LineConfig,
    pub facebook: FacebookConfig,
    pub http: HttpConfig,
    /// Upper bound on each outbound delivery call.
    pub delivery_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LineConfig {
    pub api_url: String,
    pub channel_access_token: Option<Secret<String>>,
    /// User, group or room ids that receive every booking.
    pub to_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FacebookConfig {
    pub graph_api: String,
    pub page_access_token: Option<Secret<String>>,
    /// Page-scoped ids of the staff inboxes.
    pub recipient_psids: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Empty means any origin may call the API from a browser.
    pub allowed_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
}

/// Everything a dispatch needs, borrowed from a fully configured [`RelayConfig`].
#[derive(Debug, Clone, Copy)]
pub struct DeliveryPlan<'a> {
    pub line_token: &'a Secret<String>,
    pub line_targets: &'a [String],
    pub facebook_token: &'a Secret<String>,
    pub facebook_recipients: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub line_token: bool,
    pub line_targets: usize,
    pub fb_token: bool,
    pub fb_recipients: usize,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing channel settings are not an error
    /// here; they are reported per request so the service can still start and
    /// answer `/api/config-check`.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let delivery_timeout_ms = match non_empty("DELIVERY_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "DELIVERY_TIMEOUT_MS must be a whole number of milliseconds: {}",
                    e
                ))
            })?,
            None => DEFAULT_DELIVERY_TIMEOUT_MS,
        };

        Ok(RelayConfig {
            common,
            line: LineConfig {
                api_url: non_empty("LINE_PUSH_API")
                    .unwrap_or_else(|| DEFAULT_LINE_PUSH_API.to_string()),
                channel_access_token: non_empty(LINE_CHANNEL_ACCESS_TOKEN).map(Secret::new),
                to_ids: parse_csv(lookup(LINE_TO_IDS).as_deref()),
            },
            facebook: FacebookConfig {
                graph_api: non_empty("FB_GRAPH_API")
                    .unwrap_or_else(|| DEFAULT_FB_GRAPH_API.to_string()),
                page_access_token: non_empty(FB_PAGE_ACCESS_TOKEN).map(Secret::new),
                recipient_psids: parse_csv(lookup(FB_RECIPIENT_PSIDS).as_deref()),
            },
            http: HttpConfig {
                allowed_origins: parse_csv(lookup("ALLOWED_ORIGINS").as_deref()),
                static_dir: non_empty("STATIC_DIR").map(PathBuf::from),
            },
            delivery_timeout: Duration::from_millis(delivery_timeout_ms),
        })
    }

    /// Names of the required channel settings that are absent, in a fixed order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.line.channel_access_token.is_none() {
            missing.push(LINE_CHANNEL_ACCESS_TOKEN);
        }
        if self.line.to_ids.is_empty() {
            missing.push(LINE_TO_IDS);
        }
        if self.facebook.page_access_token.is_none() {
            missing.push(FB_PAGE_ACCESS_TOKEN);
        }
        if self.facebook.recipient_psids.is_empty() {
            missing.push(FB_RECIPIENT_PSIDS);
        }
        missing
    }

    pub fn delivery_plan(&self) -> Result<DeliveryPlan<'_>, Vec<&'static str>> {
        match (
            &self.line.channel_access_token,
            &self.facebook.page_access_token,
        ) {
            (Some(line_token), Some(facebook_token))
                if !self.line.to_ids.is_empty() && !self.facebook.recipient_psids.is_empty() =>
            {
                Ok(DeliveryPlan {
                    line_token,
                    line_targets: &self.line.to_ids,
                    facebook_token,
                    facebook_recipients: &self.facebook.recipient_psids,
                })
            }
            _ => Err(self.missing_keys()),
        }
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            line_token: self
                .line
                .channel_access_token
                .as_ref()
                .is_some_and(|t| !t.expose_secret().is_empty()),
            line_targets: self.line.to_ids.len(),
            fb_token: self
                .facebook
                .page_access_token
                .as_ref()
                .is_some_and(|t| !t.expose_secret().is_empty()),
            fb_recipients: self.facebook.recipient_psids.len(),
        }
    }
}

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn parse_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
