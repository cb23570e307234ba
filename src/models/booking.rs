//! Booking model and lifecycle state machine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Booking lifecycle status.
///
/// `cancelled` and `paid` are terminal; `completed` only transitions further
/// when payment is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Reserved,
    Active,
    Completed,
    Cancelled,
    Paid,
}

impl BookingStatus {
    /// The closed transition table. Every status mutation goes through
    /// [`Booking::transition_to`], which rejects anything not listed here.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Reserved, Active)
                | (Reserved, Cancelled)
                | (Active, Cancelled)
                | (Active, Completed)
                | (Completed, Paid)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Reserved => "reserved",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Paid => "paid",
        };
        write!(f, "{}", label)
    }
}

/// Payment method, accepted as opaque pass-through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    Wallet,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

/// Payment processing status, accepted as opaque pass-through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// A reservation of one slot for a vehicle over a time window, with billing.
///
/// `slot_number` is a soft reference; slots are never deleted, and the
/// reservation invariant (not a foreign key) keeps at most one non-terminal
/// booking per slot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub bill_number: String,
    pub vehicle_number: String,
    pub owner_name: String,
    pub phone_number: String,
    pub slot_number: String,
    pub sensor_id: String,
    pub floor_number: i32,

    // Booking times
    pub booked_from: DateTime<Utc>,
    pub booked_until: DateTime<Utc>,
    pub actual_entry_time: Option<DateTime<Utc>>,
    pub actual_exit_time: Option<DateTime<Utc>>,

    // Status and amounts
    pub status: BookingStatus,
    pub duration_minutes: i64,
    pub total_amount: Decimal,
    pub is_paid: bool,

    // Payment details
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,

    // Additional info
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
}

impl Booking {
    /// Move to `next`, rejecting any edge outside the transition table.
    pub fn transition_to(&mut self, next: BookingStatus) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidState(format!(
                "booking {} cannot go from \"{}\" to \"{}\"",
                self.bill_number, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }

    /// The entry instant used for completion billing: the sensor-recorded
    /// entry when one exists, otherwise the originally booked start.
    pub fn billable_entry_time(&self) -> DateTime<Utc> {
        self.actual_entry_time.unwrap_or(self.booked_from)
    }
}

/// Create booking command
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub slot_number: String,
    pub vehicle_number: String,
    pub owner_name: String,
    pub phone_number: String,
    pub booked_from: DateTime<Utc>,
    pub booked_until: DateTime<Utc>,
}

/// Generate a bill number: `BILL-` plus 8 uppercase hex digits.
/// Opaque to everything else; collision-free in practice via UUIDv4.
pub fn generate_bill_number() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("BILL-{}", hex[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use BookingStatus::*;
        assert!(Reserved.can_transition_to(Active));
        assert!(Reserved.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Paid));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use BookingStatus::*;
        for next in [Reserved, Active, Completed, Cancelled, Paid] {
            assert!(!Cancelled.can_transition_to(next));
            assert!(!Paid.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_shortcuts() {
        use BookingStatus::*;
        assert!(!Reserved.can_transition_to(Completed));
        assert!(!Reserved.can_transition_to(Paid));
        assert!(!Active.can_transition_to(Paid));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Active));
    }

    #[test]
    fn test_bill_number_shape() {
        let bill = generate_bill_number();
        assert!(bill.starts_with("BILL-"));
        assert_eq!(bill.len(), 13);
        assert!(bill[5..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
