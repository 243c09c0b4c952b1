//! Auction escrow — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use escrow_core::error::EscrowError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `EscrowError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub EscrowError);

impl From<EscrowError> for ApiError {
    fn from(err: EscrowError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            EscrowError::InvalidSchedule(_) => (StatusCode::BAD_REQUEST, "invalid_schedule"),
            EscrowError::AlreadyDeposited(_) => (StatusCode::CONFLICT, "already_deposited"),
            EscrowError::NotDeposited(_) => (StatusCode::NOT_FOUND, "not_deposited"),
            EscrowError::NotStarted { .. } => (StatusCode::CONFLICT, "not_started"),
            EscrowError::Expired { .. } => (StatusCode::GONE, "expired"),
            EscrowError::Custody(_) => (StatusCode::UNPROCESSABLE_ENTITY, "custody_rejected"),
            EscrowError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
