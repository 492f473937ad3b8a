//! HTTP handlers for booking-notify-service.

pub mod booking;
pub mod extract;
pub mod health;
pub mod webhook;

pub use booking::booking_notify;
pub use health::{config_check, health_check, metrics};
pub use webhook::line_webhook;
