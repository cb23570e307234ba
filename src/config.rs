//! Configuration management for Parkwise server

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Fixed-rate billing parameters. The rate is configuration, never a literal
/// in the billing code, so deployments (and tests) can vary it.
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    pub hourly_rate: Decimal,
    pub currency: String,
}

/// Payee identity handed to the payment/QR collaborator
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    pub upi_id: String,
    pub payee_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// One provisioned slot. The slot set is fixed at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct SlotSeed {
    pub slot_number: String,
    pub sensor_id: String,
    pub floor_number: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    pub logging: LoggingConfig,
    #[serde(default = "default_slots")]
    pub slots: Vec<SlotSeed>,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix PARKWISE_)
            .add_source(
                Environment::with_prefix("PARKWISE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            hourly_rate: Decimal::new(1000, 2),
            currency: "INR".to_string(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            upi_id: "parkwise@okicici".to_string(),
            payee_name: "Parkwise Smart Parking".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn default_slots() -> Vec<SlotSeed> {
    (1..=4)
        .map(|n| SlotSeed {
            slot_number: format!("A{:02}", n),
            sensor_id: format!("SENSOR_{:03}", n),
            floor_number: 1,
        })
        .collect()
}
