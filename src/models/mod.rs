//! Data models for Parkwise

pub mod booking;
pub mod slot;

// Re-export commonly used types
pub use booking::{Booking, BookingStatus, PaymentMethod, PaymentStatus};
pub use slot::Slot;
