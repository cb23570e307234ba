//! Error types for Parkwise server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid extension: {0}")]
    InvalidExtension(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind reported to API clients
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::SlotUnavailable(_) => "slot_unavailable",
            AppError::SlotNotFound(_) => "slot_not_found",
            AppError::UnknownSensor(_) => "unknown_sensor",
            AppError::BookingNotFound(_) => "booking_not_found",
            AppError::InvalidDuration(_) => "invalid_duration",
            AppError::InvalidExtension(_) => "invalid_extension",
            AppError::InvalidState(_) => "invalid_state",
            AppError::Validation(_) => "validation",
            AppError::Internal(_) => "internal",
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::SlotUnavailable(_) => StatusCode::CONFLICT,
            AppError::SlotNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnknownSensor(_) => StatusCode::NOT_FOUND,
            AppError::BookingNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidDuration(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidExtension(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            error: self.kind().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
