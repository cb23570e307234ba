//! Slot endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::slot::Slot};

/// Get all parking slots (available, reserved, occupied)
#[utoipa::path(
    get,
    path = "/slots",
    tag = "slots",
    responses(
        (status = 200, description = "All slots ordered by slot number", body = Vec<Slot>)
    )
)]
pub async fn list_slots(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Slot>>> {
    let slots = state.services.slots.list().await?;
    Ok(Json(slots))
}

/// Get slots open for new bookings
#[utoipa::path(
    get,
    path = "/slots/available",
    tag = "slots",
    responses(
        (status = 200, description = "Slots neither occupied nor reserved", body = Vec<Slot>)
    )
)]
pub async fn list_available_slots(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Slot>>> {
    let slots = state.services.slots.list_available().await?;
    Ok(Json(slots))
}
