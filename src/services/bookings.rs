//! Booking lifecycle service
//!
//! Owns every booking transition, the billing call sites and the
//! reconciliation of sensor-reported occupancy against reservation state.
//! All read-modify-write sequences run through the repository's atomic
//! update, so racing operations on one booking serialize and the loser
//! fails the transition table with `InvalidState`.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    config::BillingConfig,
    error::{AppError, AppResult},
    models::{
        booking::{generate_bill_number, Booking, BookingStatus, CreateBooking},
        slot::Slot,
        PaymentMethod,
    },
    repository::Repository,
    services::{billing, clock::Clock},
};

/// Outcome of one sensor event: the slot after the occupancy write, and the
/// booking the event transitioned, when one matched.
#[derive(Debug, Clone)]
pub struct SensorReconciliation {
    pub slot: Slot,
    pub booking: Option<Booking>,
}

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    billing: BillingConfig,
    clock: Arc<dyn Clock>,
}

impl BookingsService {
    pub fn new(repository: Repository, billing: BillingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            billing,
            clock,
        }
    }

    /// Reserve a slot for a vehicle over a requested window.
    ///
    /// The slot hold is placed first (atomic check-and-set); if anything
    /// fails before the booking is persisted, the hold is released again so
    /// a slot can never stay reserved with no live booking behind it.
    pub async fn create_booking(&self, request: CreateBooking) -> AppResult<Booking> {
        let minutes = (request.booked_until - request.booked_from).num_minutes();
        if minutes < 60 {
            return Err(AppError::InvalidDuration(
                "minimum booking duration is 1 hour".to_string(),
            ));
        }

        let slot = self.repository.slots.reserve(&request.slot_number).await?;

        let quote = billing::quote(
            request.booked_from,
            request.booked_until,
            self.billing.hourly_rate,
        );

        let booking = Booking {
            bill_number: generate_bill_number(),
            vehicle_number: request.vehicle_number,
            owner_name: request.owner_name,
            phone_number: request.phone_number,
            slot_number: slot.slot_number.clone(),
            sensor_id: slot.sensor_id.clone(),
            floor_number: slot.floor_number,
            booked_from: request.booked_from,
            booked_until: request.booked_until,
            actual_entry_time: None,
            actual_exit_time: None,
            status: BookingStatus::Reserved,
            duration_minutes: quote.duration_minutes,
            total_amount: quote.amount,
            is_paid: false,
            payment_method: PaymentMethod::default(),
            payment_status: Default::default(),
            payment_reference: None,
            created_at: self.clock.now(),
            cancelled_at: None,
            cancellation_reason: None,
        };

        if let Err(err) = self.repository.bookings.insert(booking.clone()).await {
            // Compensating action, not a transaction: undo the slot hold
            if let Err(release_err) = self.repository.slots.release(&slot.slot_number).await {
                tracing::error!(
                    "Failed to release slot {} after booking persist failure: {}",
                    slot.slot_number,
                    release_err
                );
            }
            return Err(err);
        }

        tracing::info!(
            "Created booking {} on slot {} ({} min, {} {})",
            booking.bill_number,
            booking.slot_number,
            booking.duration_minutes,
            booking.total_amount,
            self.billing.currency
        );

        Ok(booking)
    }

    /// Reconcile one sensor report against the booking store.
    ///
    /// Occupancy with no matching reserved booking is recorded on the slot
    /// and otherwise ignored (unauthorized parking is tolerated); vacancy
    /// with no active booking likewise only updates the slot.
    pub async fn handle_sensor_event(
        &self,
        sensor_id: &str,
        occupied: bool,
    ) -> AppResult<SensorReconciliation> {
        let now = self.clock.now();
        let slot = self.repository.slots.set_occupancy(sensor_id, occupied).await?;

        if occupied {
            let booking = self
                .repository
                .bookings
                .update_reserved_on_slot(&slot.slot_number, now, |b| {
                    b.transition_to(BookingStatus::Active)?;
                    b.actual_entry_time = Some(now);
                    Ok(())
                })
                .await?;

            match &booking {
                Some(b) => {
                    tracing::info!("Booking {} active on slot {}", b.bill_number, slot.slot_number)
                }
                None => tracing::debug!(
                    "Occupancy on slot {} with no matching reserved booking",
                    slot.slot_number
                ),
            }

            return Ok(SensorReconciliation { slot, booking });
        }

        let rate = self.billing.hourly_rate;
        let booking = self
            .repository
            .bookings
            .update_active_on_slot(&slot.slot_number, |b| {
                b.transition_to(BookingStatus::Completed)?;
                b.actual_exit_time = Some(now);
                // Recompute over the actual stay; entry falls back to the
                // booked start when no sensor-in event was ever seen
                let quote = billing::quote(b.billable_entry_time(), now, rate);
                b.duration_minutes = quote.duration_minutes;
                b.total_amount = quote.amount;
                Ok(())
            })
            .await?;

        match booking {
            Some(b) => {
                // Free the slot for new reservations regardless of payment state
                let slot = self.repository.slots.release(&b.slot_number).await?;
                tracing::info!(
                    "Booking {} completed on slot {} ({} min, {} {})",
                    b.bill_number,
                    slot.slot_number,
                    b.duration_minutes,
                    b.total_amount,
                    self.billing.currency
                );
                Ok(SensorReconciliation {
                    slot,
                    booking: Some(b),
                })
            }
            None => {
                tracing::debug!(
                    "Vacancy on slot {} with no active booking",
                    slot.slot_number
                );
                Ok(SensorReconciliation { slot, booking: None })
            }
        }
    }

    /// Cancel a reserved or active booking and free its slot
    pub async fn cancel_booking(
        &self,
        bill_number: &str,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let now = self.clock.now();

        let booking = self
            .repository
            .bookings
            .update(bill_number, |b| {
                b.transition_to(BookingStatus::Cancelled)?;
                b.cancelled_at = Some(now);
                b.cancellation_reason = reason;
                Ok(())
            })
            .await?;

        self.repository.slots.release(&booking.slot_number).await?;

        tracing::info!(
            "Cancelled booking {} and freed slot {}",
            booking.bill_number,
            booking.slot_number
        );

        Ok(booking)
    }

    /// Push the booked window out and bill the added span.
    ///
    /// Billing is incremental over `(old booked_until, new_exit_time)` only;
    /// the original window's rounding is never revisited. This is deliberate
    /// and load-bearing for billing compatibility.
    pub async fn extend_booking(
        &self,
        bill_number: &str,
        new_exit_time: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let rate = self.billing.hourly_rate;

        let booking = self
            .repository
            .bookings
            .update(bill_number, |b| {
                if !matches!(b.status, BookingStatus::Reserved | BookingStatus::Active) {
                    return Err(AppError::InvalidState(format!(
                        "booking {} with status \"{}\" cannot be extended",
                        b.bill_number, b.status
                    )));
                }
                if new_exit_time <= b.booked_until {
                    return Err(AppError::InvalidExtension(
                        "new exit time must be after the current exit time".to_string(),
                    ));
                }

                let quote = billing::quote(b.booked_until, new_exit_time, rate);
                if quote.duration_minutes < 60 {
                    return Err(AppError::InvalidExtension(
                        "minimum extension is 1 hour".to_string(),
                    ));
                }

                b.booked_until = new_exit_time;
                b.duration_minutes += quote.duration_minutes;
                b.total_amount += quote.amount;
                Ok(())
            })
            .await?;

        tracing::info!(
            "Extended booking {} until {} (total {} {})",
            booking.bill_number,
            booking.booked_until,
            booking.total_amount,
            self.billing.currency
        );

        Ok(booking)
    }

    /// Mark a bill paid. Idempotent; only `completed` bookings change
    /// status (to `paid`) — paying early leaves the lifecycle alone.
    pub async fn confirm_payment(
        &self,
        bill_number: &str,
        method: Option<PaymentMethod>,
        reference: Option<String>,
    ) -> AppResult<Booking> {
        let booking = self
            .repository
            .bookings
            .update(bill_number, |b| {
                b.is_paid = true;
                if let Some(method) = method {
                    b.payment_method = method;
                }
                if let Some(reference) = reference {
                    b.payment_reference = Some(reference);
                }
                if b.status == BookingStatus::Completed {
                    b.transition_to(BookingStatus::Paid)?;
                }
                Ok(())
            })
            .await?;

        tracing::info!("Payment confirmed for booking {}", booking.bill_number);

        Ok(booking)
    }

    /// Get one booking by bill number
    pub async fn get_booking(&self, bill_number: &str) -> AppResult<Booking> {
        self.repository.bookings.get(bill_number).await
    }

    /// Full booking history, newest first
    pub async fn booking_history(&self) -> AppResult<Vec<Booking>> {
        self.repository.bookings.history().await
    }

    /// Reserved and active bookings whose window is still open
    pub async fn active_bookings(&self) -> AppResult<Vec<Booking>> {
        self.repository.bookings.active(self.clock.now()).await
    }

    /// Search bookings by vehicle, owner, phone, bill or slot number
    pub async fn search(&self, query: &str) -> AppResult<Vec<Booking>> {
        self.repository.bookings.search(query).await
    }
}
