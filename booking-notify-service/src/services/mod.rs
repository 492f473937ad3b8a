pub mod channels;
pub mod dispatch;
pub mod formatter;
pub mod metrics;
pub mod webhook;

pub use channels::{
    send_to_all, DeliveryError, FacebookInboxClient, LinePushClient, MessageChannel,
};
pub use dispatch::{DispatchReport, Dispatcher};
pub use formatter::{build_booking_message, truncate_text};
pub use webhook::extract_recipient_ids;
