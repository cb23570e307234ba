//! Business logic services

pub mod billing;
pub mod bookings;
pub mod clock;
pub mod payments;
pub mod slots;

use std::sync::Arc;

use crate::{
    config::{BillingConfig, PaymentConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub slots: slots::SlotsService,
    pub bookings: bookings::BookingsService,
    pub payments: payments::PaymentsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        billing_config: BillingConfig,
        payment_config: PaymentConfig,
        clock: Arc<dyn clock::Clock>,
    ) -> Self {
        Self {
            slots: slots::SlotsService::new(repository.clone(), clock.clone()),
            bookings: bookings::BookingsService::new(repository, billing_config.clone(), clock),
            payments: payments::PaymentsService::new(payment_config, &billing_config),
        }
    }
}
