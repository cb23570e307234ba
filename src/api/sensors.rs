//! Sensor ingestion endpoint
//!
//! Accepts pre-parsed occupancy reports keyed by sensor id. Sensor
//! authenticity is not validated here.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::booking::BookingStatus};

/// One occupancy report from a slot sensor
#[derive(Debug, Deserialize, ToSchema)]
pub struct SensorEventRequest {
    pub sensor_id: String,
    pub is_occupied: bool,
}

/// Result of reconciling a sensor report
#[derive(Serialize, ToSchema)]
pub struct SensorEventResponse {
    pub slot_number: String,
    pub sensor_id: String,
    pub is_occupied: bool,
    /// Bill number of the booking the event transitioned, if any
    pub bill_number: Option<String>,
    /// Status that booking ended up in
    pub booking_status: Option<BookingStatus>,
    pub timestamp: DateTime<Utc>,
}

/// Ingest a sensor occupancy report and reconcile booking state
#[utoipa::path(
    post,
    path = "/sensor-data",
    tag = "sensors",
    request_body = SensorEventRequest,
    responses(
        (status = 200, description = "Occupancy recorded", body = SensorEventResponse),
        (status = 404, description = "No slot owns this sensor id")
    )
)]
pub async fn sensor_event(
    State(state): State<crate::AppState>,
    Json(request): Json<SensorEventRequest>,
) -> AppResult<Json<SensorEventResponse>> {
    let outcome = state
        .services
        .bookings
        .handle_sensor_event(&request.sensor_id, request.is_occupied)
        .await?;

    Ok(Json(SensorEventResponse {
        slot_number: outcome.slot.slot_number.clone(),
        sensor_id: request.sensor_id,
        is_occupied: request.is_occupied,
        bill_number: outcome.booking.as_ref().map(|b| b.bill_number.clone()),
        booking_status: outcome.booking.as_ref().map(|b| b.status),
        timestamp: Utc::now(),
    }))
}
