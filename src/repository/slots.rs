//! Slot registry: in-memory store of the provisioned slot set
//!
//! The whole map sits behind one mutex, which makes `reserve` the atomic
//! check-and-set required to keep two racing bookings off the same slot.
//! The lock is never held across an await point.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::{
    config::SlotSeed,
    error::{AppError, AppResult},
    models::slot::Slot,
};

#[derive(Clone, Default)]
pub struct SlotsRepository {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl SlotsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<String, Slot>>> {
        self.slots
            .lock()
            .map_err(|_| AppError::Internal("slot store lock poisoned".to_string()))
    }

    /// Provision a slot if it does not exist yet. Returns the slot and
    /// whether it was created. Sensor ids must be unique across slots.
    pub async fn get_or_create(&self, seed: &SlotSeed, now: DateTime<Utc>) -> AppResult<(Slot, bool)> {
        let mut map = self.lock()?;

        if let Some(existing) = map.get(&seed.slot_number) {
            return Ok((existing.clone(), false));
        }

        if map.values().any(|s| s.sensor_id == seed.sensor_id) {
            return Err(AppError::Validation(format!(
                "sensor id {} is already assigned to another slot",
                seed.sensor_id
            )));
        }

        let slot = Slot {
            slot_number: seed.slot_number.clone(),
            floor_number: seed.floor_number,
            is_occupied: false,
            is_reserved: false,
            sensor_id: seed.sensor_id.clone(),
            created_at: now,
        };
        map.insert(slot.slot_number.clone(), slot.clone());

        Ok((slot, true))
    }

    /// All slots, ordered by slot number
    pub async fn list(&self) -> AppResult<Vec<Slot>> {
        let map = self.lock()?;
        let mut slots: Vec<Slot> = map.values().cloned().collect();
        slots.sort_by(|a, b| a.slot_number.cmp(&b.slot_number));
        Ok(slots)
    }

    /// Slots open for new bookings: neither occupied nor reserved
    pub async fn list_available(&self) -> AppResult<Vec<Slot>> {
        let map = self.lock()?;
        let mut slots: Vec<Slot> = map.values().filter(|s| s.is_available()).cloned().collect();
        slots.sort_by(|a, b| a.slot_number.cmp(&b.slot_number));
        Ok(slots)
    }

    /// Get a slot by number
    pub async fn get(&self, slot_number: &str) -> AppResult<Slot> {
        let map = self.lock()?;
        map.get(slot_number)
            .cloned()
            .ok_or_else(|| AppError::SlotNotFound(format!("slot {} does not exist", slot_number)))
    }

    /// Place the logical hold on a slot. Check-and-set under the map lock:
    /// of two racing callers exactly one succeeds.
    pub async fn reserve(&self, slot_number: &str) -> AppResult<Slot> {
        let mut map = self.lock()?;

        let slot = map
            .get_mut(slot_number)
            .ok_or_else(|| AppError::SlotNotFound(format!("slot {} does not exist", slot_number)))?;

        if slot.is_occupied || slot.is_reserved {
            return Err(AppError::SlotUnavailable(format!(
                "slot {} is already occupied or reserved",
                slot_number
            )));
        }

        slot.is_reserved = true;
        Ok(slot.clone())
    }

    /// Clear both flags. Idempotent: releasing a free slot is a no-op.
    pub async fn release(&self, slot_number: &str) -> AppResult<Slot> {
        let mut map = self.lock()?;

        let slot = map
            .get_mut(slot_number)
            .ok_or_else(|| AppError::SlotNotFound(format!("slot {} does not exist", slot_number)))?;

        slot.is_reserved = false;
        slot.is_occupied = false;
        Ok(slot.clone())
    }

    /// Record sensor-reported occupancy and return the affected slot for
    /// the caller to reconcile against the booking store.
    pub async fn set_occupancy(&self, sensor_id: &str, occupied: bool) -> AppResult<Slot> {
        let mut map = self.lock()?;

        let slot = map
            .values_mut()
            .find(|s| s.sensor_id == sensor_id)
            .ok_or_else(|| AppError::UnknownSensor(format!("no slot owns sensor {}", sensor_id)))?;

        slot.is_occupied = occupied;
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(n: &str, sensor: &str) -> SlotSeed {
        SlotSeed {
            slot_number: n.to_string(),
            sensor_id: sensor.to_string(),
            floor_number: 1,
        }
    }

    async fn repo_with_slot() -> SlotsRepository {
        let repo = SlotsRepository::new();
        repo.get_or_create(&seed("A01", "SENSOR_001"), Utc::now())
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_reserve_is_check_and_set() {
        let repo = repo_with_slot().await;

        let slot = repo.reserve("A01").await.unwrap();
        assert!(slot.is_reserved);

        let err = repo.reserve("A01").await.unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable(_)));
    }

    #[tokio::test]
    async fn test_reserve_rejects_occupied_slot() {
        let repo = repo_with_slot().await;

        repo.set_occupancy("SENSOR_001", true).await.unwrap();
        let err = repo.reserve("A01").await.unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable(_)));
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let repo = repo_with_slot().await;

        repo.reserve("A01").await.unwrap();
        let slot = repo.release("A01").await.unwrap();
        assert!(slot.is_available());

        // Releasing an already-free slot is a no-op, not an error
        let slot = repo.release("A01").await.unwrap();
        assert!(slot.is_available());
    }

    #[tokio::test]
    async fn test_unknown_sensor() {
        let repo = repo_with_slot().await;

        let err = repo.set_occupancy("SENSOR_999", true).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownSensor(_)));
    }

    #[tokio::test]
    async fn test_available_listing_tracks_flags() {
        let repo = repo_with_slot().await;
        repo.get_or_create(&seed("A02", "SENSOR_002"), Utc::now())
            .await
            .unwrap();

        assert_eq!(repo.list_available().await.unwrap().len(), 2);

        repo.reserve("A01").await.unwrap();
        let available = repo.list_available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].slot_number, "A02");
    }

    #[tokio::test]
    async fn test_duplicate_sensor_rejected() {
        let repo = repo_with_slot().await;

        let err = repo
            .get_or_create(&seed("A02", "SENSOR_001"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_provisioning_is_get_or_create() {
        let repo = repo_with_slot().await;

        let (_, created) = repo
            .get_or_create(&seed("A01", "SENSOR_001"), Utc::now())
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
