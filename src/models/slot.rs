//! Parking slot model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A physical parking slot with its sensor.
///
/// `is_occupied` tracks physical presence and is written only by sensor
/// ingestion; `is_reserved` is the logical hold written only by the booking
/// lifecycle. The two flags are independent: a slot can be reserved before
/// the vehicle arrives, and briefly occupied with no booking at all.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Slot {
    pub slot_number: String,
    pub floor_number: i32,
    pub is_occupied: bool,
    pub is_reserved: bool,
    pub sensor_id: String,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    /// A slot is available for new bookings only when both flags are clear.
    pub fn is_available(&self) -> bool {
        !self.is_occupied && !self.is_reserved
    }
}
