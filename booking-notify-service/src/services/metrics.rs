//! Delivery counters, rendered at `/metrics` by the service-core exporter.

use crate::models::Channel;
use metrics::counter;

/// Count one delivery attempt by channel and outcome.
pub fn record_delivery(channel: Channel, ok: bool) {
    let status = if ok { "delivered" } else { "failed" };
    counter!(
        "booking_notify_deliveries_total",
        "channel" => channel.as_str(),
        "status" => status
    )
    .increment(1);
}

/// Count one completed dispatch by overall verdict.
pub fn record_dispatch(success: bool) {
    let outcome = if success { "delivered" } else { "line_undelivered" };
    counter!("booking_notify_dispatch_total", "outcome" => outcome).increment(1);
}
