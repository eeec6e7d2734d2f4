//! HTTP error types for the `KeyVault` server.
//!
//! Maps domain errors from `keyvault-core` into JSON responses with a
//! machine-readable `error` field and a human-readable `message`. Storage
//! failures are reported with a generic retry message; the details go to
//! the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use keyvault_core::error::{AdminError, WaitlistError};

/// Message shown to a visitor whose signup could not be saved.
pub const SAVE_FAILED_MESSAGE: &str = "Error saving entry. Please try again.";

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Admin session missing or password wrong.
    Unauthorized(String),
    /// Client sent invalid input.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<WaitlistError> for AppError {
    fn from(err: WaitlistError) -> Self {
        match err {
            WaitlistError::MissingField { .. } => Self::BadRequest(err.to_string()),
            WaitlistError::Serialization { .. } | WaitlistError::Storage(_) => {
                Self::Internal(SAVE_FAILED_MESSAGE.to_owned())
            }
        }
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidPassword | AdminError::NotAuthenticated => {
                Self::Unauthorized(err.to_string())
            }
        }
    }
}
