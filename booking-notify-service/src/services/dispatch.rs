//! Booking dispatch: one message, both channels, one verdict.
//!
//! LINE is the channel staff actually watch, so a booking counts as delivered
//! once any LINE target has it. Messenger is best effort and only reported.

use chrono::{DateTime, Utc};
use service_core::error::AppError;
use std::sync::Arc;

use super::channels::{send_to_all, MessageChannel};
use super::formatter::build_booking_message;
use super::metrics::record_dispatch;
use crate::config::RelayConfig;
use crate::models::{BookingRequest, DeliveryResult};

/// Aggregated outcome of one dispatch, after the success policy.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    /// At least one LINE target received the message.
    pub line_delivered: bool,
    /// No Messenger failures, or at least one Messenger success.
    pub facebook_delivered: bool,
    pub sent: usize,
    pub total: usize,
    /// Every failed result, LINE first.
    pub failed: Vec<DeliveryResult>,
}

impl DispatchReport {
    pub fn from_results(line: Vec<DeliveryResult>, facebook: Vec<DeliveryResult>) -> Self {
        let line_success = line.iter().filter(|r| r.ok).count();
        let facebook_success = facebook.iter().filter(|r| r.ok).count();
        let facebook_failed = facebook.len() - facebook_success;

        let total = line.len() + facebook.len();
        let failed: Vec<DeliveryResult> = line
            .into_iter()
            .chain(facebook)
            .filter(|r| !r.ok)
            .collect();

        Self {
            line_delivered: line_success > 0,
            facebook_delivered: facebook_failed == 0 || facebook_success > 0,
            sent: total - failed.len(),
            total,
            failed,
        }
    }

    /// Overall verdict: LINE delivery is required, Messenger is not.
    pub fn is_success(&self) -> bool {
        self.line_delivered
    }
}

pub struct Dispatcher {
    config: Arc<RelayConfig>,
    line: Arc<dyn MessageChannel>,
    facebook: Arc<dyn MessageChannel>,
}

impl Dispatcher {
    pub fn new(
        config: Arc<RelayConfig>,
        line: Arc<dyn MessageChannel>,
        facebook: Arc<dyn MessageChannel>,
    ) -> Self {
        Self {
            config,
            line,
            facebook,
        }
    }

    /// Deliver `booking` to every configured LINE target and Messenger
    /// recipient concurrently.
    ///
    /// Fails before any outbound call when a required setting is missing.
    /// Individual delivery failures are part of the report, not errors.
    #[tracing::instrument(skip_all)]
    pub async fn dispatch(
        &self,
        booking: &BookingRequest,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport, AppError> {
        let plan = self.config.delivery_plan().map_err(|missing| {
            tracing::error!(missing = ?missing, "Booking received but channels are not configured");
            AppError::MissingConfig(missing.into_iter().map(str::to_string).collect())
        })?;

        let message = build_booking_message(booking, now);

        let (line, facebook) = tokio::join!(
            send_to_all(
                Arc::clone(&self.line),
                plan.line_token,
                plan.line_targets,
                &message
            ),
            send_to_all(
                Arc::clone(&self.facebook),
                plan.facebook_token,
                plan.facebook_recipients,
                &message
            ),
        );

        let line = line.map_err(|e| anyhow::anyhow!("LINE delivery job aborted: {}", e))?;
        let facebook =
            facebook.map_err(|e| anyhow::anyhow!("Facebook delivery job aborted: {}", e))?;

        let report = DispatchReport::from_results(line, facebook);
        record_dispatch(report.is_success());

        tracing::info!(
            line_delivered = report.line_delivered,
            facebook_delivered = report.facebook_delivered,
            sent = report.sent,
            total = report.total,
            "Booking dispatched"
        );

        Ok(report)
    }
}
