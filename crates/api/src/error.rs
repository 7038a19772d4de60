//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::{CheckoutError, SubmitError, UnknownStep};
use storage::StorageError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Checkout workflow error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        CheckoutError::Validation(_)
        | CheckoutError::Submission(SubmitError::Validation(_))
        | CheckoutError::PlacedOrder(SubmitError::Validation(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        CheckoutError::PlacedOrder(e) if e.status() == Some(404) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        CheckoutError::Submission(_) | CheckoutError::PlacedOrder(_) => {
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        CheckoutError::SubmissionInFlight
        | CheckoutError::PaymentInFlight
        | CheckoutError::InvalidTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
        CheckoutError::ItemNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        CheckoutError::Storage(_) => {
            tracing::error!(error = %err, "storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<UnknownStep> for ApiError {
    fn from(err: UnknownStep) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open storage: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
