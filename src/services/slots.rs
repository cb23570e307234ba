//! Slot registry service

use std::sync::Arc;

use crate::{
    config::SlotSeed,
    error::AppResult,
    models::slot::Slot,
    repository::Repository,
    services::clock::Clock,
};

#[derive(Clone)]
pub struct SlotsService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl SlotsService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Get all slots
    pub async fn list(&self) -> AppResult<Vec<Slot>> {
        self.repository.slots.list().await
    }

    /// Get slots open for new bookings
    pub async fn list_available(&self) -> AppResult<Vec<Slot>> {
        self.repository.slots.list_available().await
    }

    /// Provision the configured slot set at startup. Existing slots are
    /// left untouched.
    pub async fn provision(&self, seeds: &[SlotSeed]) -> AppResult<usize> {
        let now = self.clock.now();
        let mut created = 0;

        for seed in seeds {
            let (slot, was_created) = self.repository.slots.get_or_create(seed, now).await?;
            if was_created {
                tracing::info!("Provisioned slot {} (sensor {})", slot.slot_number, slot.sensor_id);
                created += 1;
            } else {
                tracing::debug!("Slot {} already provisioned", slot.slot_number);
            }
        }

        Ok(created)
    }
}
