pub mod booking;
pub mod delivery;

pub use booking::BookingRequest;
pub use delivery::{Channel, DeliveryResult};
