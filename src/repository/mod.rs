//! Repository layer: the in-process persistence collaborator
//!
//! Provides atomic get-and-update by slot number and by bill number, plus
//! uniqueness on slot number, sensor id and bill number. The locking unit is
//! the single logical operation; no lock is held across an await, and the
//! slot and booking locks are never nested.

pub mod bookings;
pub mod slots;

/// Main repository struct holding both entity stores
#[derive(Clone, Default)]
pub struct Repository {
    pub slots: slots::SlotsRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create an empty repository; slots are provisioned at startup
    pub fn new() -> Self {
        Self {
            slots: slots::SlotsRepository::new(),
            bookings: bookings::BookingsRepository::new(),
        }
    }
}
