//! API handlers for Parkwise REST endpoints

pub mod bookings;
pub mod health;
pub mod openapi;
pub mod sensors;
pub mod slots;
