//! Parkwise Smart Parking Reservation System
//!
//! A Rust implementation of the Parkwise parking server, allocating
//! physical slots to vehicles for timed intervals, reconciling sensor
//! occupancy against reservations and computing billing.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
