//! Booking store: in-memory, atomic get-and-update by bill number
//!
//! Every read-validate-mutate runs under the map lock, and mutation is
//! copy-on-write: the closure works on a clone and the clone replaces the
//! stored booking only when the closure succeeds. A failed validation never
//! leaves partial state behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingStatus},
};

#[derive(Clone, Default)]
pub struct BookingsRepository {
    bookings: Arc<Mutex<HashMap<String, Booking>>>,
}

impl BookingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<String, Booking>>> {
        self.bookings
            .lock()
            .map_err(|_| AppError::Internal("booking store lock poisoned".to_string()))
    }

    /// Persist a new booking. Bill numbers are unique.
    pub async fn insert(&self, booking: Booking) -> AppResult<()> {
        let mut map = self.lock()?;

        if map.contains_key(&booking.bill_number) {
            return Err(AppError::Internal(format!(
                "bill number {} already exists",
                booking.bill_number
            )));
        }

        map.insert(booking.bill_number.clone(), booking);
        Ok(())
    }

    /// Get a booking by bill number
    pub async fn get(&self, bill_number: &str) -> AppResult<Booking> {
        let map = self.lock()?;
        map.get(bill_number)
            .cloned()
            .ok_or_else(|| AppError::BookingNotFound(format!("no booking {}", bill_number)))
    }

    /// Atomically read-validate-mutate the booking with this bill number.
    /// The closure sees a clone; it is committed only on success.
    pub async fn update<M>(&self, bill_number: &str, mutate: M) -> AppResult<Booking>
    where
        M: FnOnce(&mut Booking) -> AppResult<()>,
    {
        let mut map = self.lock()?;

        let current = map
            .get(bill_number)
            .ok_or_else(|| AppError::BookingNotFound(format!("no booking {}", bill_number)))?;

        let mut updated = current.clone();
        mutate(&mut updated)?;
        map.insert(bill_number.to_string(), updated.clone());

        Ok(updated)
    }

    /// Atomically mutate the `reserved` booking on this slot whose window
    /// contains `now`, if one exists. The earliest-starting match wins.
    pub async fn update_reserved_on_slot<M>(
        &self,
        slot_number: &str,
        now: DateTime<Utc>,
        mutate: M,
    ) -> AppResult<Option<Booking>>
    where
        M: FnOnce(&mut Booking) -> AppResult<()>,
    {
        let mut map = self.lock()?;

        let candidate = map
            .values()
            .filter(|b| {
                b.slot_number == slot_number
                    && b.status == BookingStatus::Reserved
                    && b.booked_from <= now
                    && now <= b.booked_until
            })
            .min_by_key(|b| b.booked_from)
            .map(|b| b.bill_number.clone());

        let Some(bill_number) = candidate else {
            return Ok(None);
        };

        let mut updated = map[&bill_number].clone();
        mutate(&mut updated)?;
        map.insert(bill_number, updated.clone());

        Ok(Some(updated))
    }

    /// Atomically mutate the `active` booking on this slot, if one exists.
    /// At most one should exist by the reservation invariant; the most
    /// recently activated match wins.
    pub async fn update_active_on_slot<M>(
        &self,
        slot_number: &str,
        mutate: M,
    ) -> AppResult<Option<Booking>>
    where
        M: FnOnce(&mut Booking) -> AppResult<()>,
    {
        let mut map = self.lock()?;

        let candidate = map
            .values()
            .filter(|b| b.slot_number == slot_number && b.status == BookingStatus::Active)
            .max_by_key(|b| b.actual_entry_time.unwrap_or(b.booked_from))
            .map(|b| b.bill_number.clone());

        let Some(bill_number) = candidate else {
            return Ok(None);
        };

        let mut updated = map[&bill_number].clone();
        mutate(&mut updated)?;
        map.insert(bill_number, updated.clone());

        Ok(Some(updated))
    }

    /// Full booking history, newest first
    pub async fn history(&self) -> AppResult<Vec<Booking>> {
        let map = self.lock()?;
        let mut bookings: Vec<Booking> = map.values().cloned().collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    /// Reserved or active bookings whose window has not yet closed,
    /// ordered by start time
    pub async fn active(&self, now: DateTime<Utc>) -> AppResult<Vec<Booking>> {
        let map = self.lock()?;
        let mut bookings: Vec<Booking> = map
            .values()
            .filter(|b| {
                matches!(b.status, BookingStatus::Reserved | BookingStatus::Active)
                    && b.booked_until > now
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.booked_from.cmp(&b.booked_from));
        Ok(bookings)
    }

    /// Case-insensitive substring search over vehicle number, owner name,
    /// phone number, bill number and slot number; newest first
    pub async fn search(&self, query: &str) -> AppResult<Vec<Booking>> {
        let map = self.lock()?;
        let needle = query.to_lowercase();
        let mut bookings: Vec<Booking> = map
            .values()
            .filter(|b| {
                b.vehicle_number.to_lowercase().contains(&needle)
                    || b.owner_name.to_lowercase().contains(&needle)
                    || b.phone_number.to_lowercase().contains(&needle)
                    || b.bill_number.to_lowercase().contains(&needle)
                    || b.slot_number.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}
