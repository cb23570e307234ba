//! Booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::booking::{Booking, CreateBooking, PaymentMethod},
    services::payments::PaymentRequest,
};

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Target slot number
    #[validate(length(min = 1, max = 10))]
    pub slot_number: String,
    /// Vehicle registration number
    #[validate(length(min = 1, max = 20))]
    pub vehicle_number: String,
    /// Owner name
    #[validate(length(min = 1, max = 100))]
    pub owner_name: String,
    /// Contact phone number
    #[validate(length(min = 1, max = 15))]
    pub phone_number: String,
    /// Requested start of the window (ISO 8601)
    pub booked_from: DateTime<Utc>,
    /// Requested end of the window (ISO 8601)
    pub booked_until: DateTime<Utc>,
}

/// Booking response with the persisted record
#[derive(Serialize, ToSchema)]
pub struct BookingResponse {
    /// Status message
    pub message: String,
    /// The booking
    pub booking: Booking,
}

/// One line of the per-hour bill breakdown
#[derive(Serialize, ToSchema)]
pub struct BreakdownLine {
    pub description: String,
    pub rate: Decimal,
    pub amount: Decimal,
}

/// Detailed booking view with billing breakdown and payment handoff
#[derive(Serialize, ToSchema)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub breakdown: Vec<BreakdownLine>,
    pub payment: PaymentRequest,
}

/// Cancel booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelBookingRequest {
    /// Free-text reason kept with the booking
    pub cancellation_reason: Option<String>,
}

/// Extend booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtendBookingRequest {
    /// New end of the window; must extend the current one by at least an hour
    pub new_exit_time: DateTime<Utc>,
}

/// Confirm payment request (metadata is opaque pass-through)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
}

/// Search query
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchQuery {
    /// Substring matched against vehicle, owner, phone, bill and slot number
    pub q: Option<String>,
}

/// Create a new parking booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid request or duration under 1 hour"),
        (status = 404, description = "Slot not found"),
        (status = 409, description = "Slot already occupied or reserved")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    request.validate()?;

    let booking = state
        .services
        .bookings
        .create_booking(CreateBooking {
            slot_number: request.slot_number,
            vehicle_number: request.vehicle_number,
            owner_name: request.owner_name,
            phone_number: request.phone_number,
            booked_from: request.booked_from,
            booked_until: request.booked_until,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Parking booking created successfully".to_string(),
            booking,
        }),
    ))
}

/// Get detailed booking information with bill breakdown and payment data
#[utoipa::path(
    get,
    path = "/bookings/{bill_number}",
    tag = "bookings",
    params(
        ("bill_number" = String, Path, description = "Bill number")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    Path(bill_number): Path<String>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.get_booking(&bill_number).await?;

    let rate = state.config.billing.hourly_rate;
    let hours = (booking.duration_minutes + 59) / 60;
    let breakdown = (1..=hours)
        .map(|hour| BreakdownLine {
            description: if hour == 1 {
                "First hour".to_string()
            } else {
                format!("Hour {}", hour)
            },
            rate,
            amount: rate,
        })
        .collect();

    let payment = state
        .services
        .payments
        .payment_request(booking.total_amount, &booking.bill_number);

    Ok(Json(BookingDetails {
        booking,
        breakdown,
        payment,
    }))
}

/// Get the payment URL and amount for a bill
#[utoipa::path(
    get,
    path = "/bookings/{bill_number}/payment",
    tag = "bookings",
    params(
        ("bill_number" = String, Path, description = "Bill number")
    ),
    responses(
        (status = 200, description = "Payment handoff data", body = PaymentRequest),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_payment(
    State(state): State<crate::AppState>,
    Path(bill_number): Path<String>,
) -> AppResult<Json<PaymentRequest>> {
    let booking = state.services.bookings.get_booking(&bill_number).await?;
    let payment = state
        .services
        .payments
        .payment_request(booking.total_amount, &booking.bill_number);
    Ok(Json(payment))
}

/// Get all booking history, newest first
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    responses(
        (status = 200, description = "All bookings", body = Vec<Booking>)
    )
)]
pub async fn booking_history(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.services.bookings.booking_history().await?;
    Ok(Json(bookings))
}

/// Get reserved and active bookings whose window is still open
#[utoipa::path(
    get,
    path = "/bookings/active",
    tag = "bookings",
    responses(
        (status = 200, description = "Open bookings ordered by start time", body = Vec<Booking>)
    )
)]
pub async fn active_bookings(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state.services.bookings.active_bookings().await?;
    Ok(Json(bookings))
}

/// Search bookings
#[utoipa::path(
    get,
    path = "/bookings/search",
    tag = "bookings",
    params(
        ("q" = Option<String>, Query, description = "Search text")
    ),
    responses(
        (status = 200, description = "Matching bookings, newest first", body = Vec<Booking>)
    )
)]
pub async fn search_bookings(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = match query.q.as_deref() {
        Some(q) if !q.is_empty() => state.services.bookings.search(q).await?,
        _ => state.services.bookings.booking_history().await?,
    };
    Ok(Json(bookings))
}

/// Cancel a reserved or active booking
#[utoipa::path(
    post,
    path = "/bookings/{bill_number}/cancel",
    tag = "bookings",
    params(
        ("bill_number" = String, Path, description = "Bill number")
    ),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled, slot freed", body = BookingResponse),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is not reserved or active")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    Path(bill_number): Path<String>,
    Json(request): Json<CancelBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .cancel_booking(&bill_number, request.cancellation_reason)
        .await?;

    Ok(Json(BookingResponse {
        message: "Booking cancelled successfully".to_string(),
        booking,
    }))
}

/// Extend a reserved or active booking
#[utoipa::path(
    post,
    path = "/bookings/{bill_number}/extend",
    tag = "bookings",
    params(
        ("bill_number" = String, Path, description = "Bill number")
    ),
    request_body = ExtendBookingRequest,
    responses(
        (status = 200, description = "Booking extended, added span billed", body = BookingResponse),
        (status = 400, description = "Extension not after current end or under 1 hour"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is not reserved or active")
    )
)]
pub async fn extend_booking(
    State(state): State<crate::AppState>,
    Path(bill_number): Path<String>,
    Json(request): Json<ExtendBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .extend_booking(&bill_number, request.new_exit_time)
        .await?;

    Ok(Json(BookingResponse {
        message: "Booking extended successfully".to_string(),
        booking,
    }))
}

/// Confirm payment for a booking
#[utoipa::path(
    post,
    path = "/bookings/{bill_number}/confirm-payment",
    tag = "bookings",
    params(
        ("bill_number" = String, Path, description = "Bill number")
    ),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = BookingResponse),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn confirm_payment(
    State(state): State<crate::AppState>,
    Path(bill_number): Path<String>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .confirm_payment(&bill_number, request.payment_method, request.payment_reference)
        .await?;

    Ok(Json(BookingResponse {
        message: "Payment confirmed successfully".to_string(),
        booking,
    }))
}
