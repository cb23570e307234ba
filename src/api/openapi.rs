//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, sensors, slots};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parkwise API",
        version = "1.0.0",
        description = "Smart Parking Reservation System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Slots
        slots::list_slots,
        slots::list_available_slots,
        // Sensors
        sensors::sensor_event,
        // Bookings
        bookings::create_booking,
        bookings::get_booking,
        bookings::get_payment,
        bookings::booking_history,
        bookings::active_bookings,
        bookings::search_bookings,
        bookings::cancel_booking,
        bookings::extend_booking,
        bookings::confirm_payment,
    ),
    components(
        schemas(
            // Slots
            crate::models::slot::Slot,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingStatus,
            crate::models::booking::PaymentMethod,
            crate::models::booking::PaymentStatus,
            bookings::CreateBookingRequest,
            bookings::BookingResponse,
            bookings::BookingDetails,
            bookings::BreakdownLine,
            bookings::CancelBookingRequest,
            bookings::ExtendBookingRequest,
            bookings::ConfirmPaymentRequest,
            // Sensors
            sensors::SensorEventRequest,
            sensors::SensorEventResponse,
            // Payments
            crate::services::payments::PaymentRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "slots", description = "Parking slot registry"),
        (name = "sensors", description = "Sensor occupancy ingestion"),
        (name = "bookings", description = "Booking lifecycle and billing")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
