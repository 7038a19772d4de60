//! Checkout error types.

use common::ProductId;
use domain::ValidationError;
use storage::StorageError;
use thiserror::Error;

use crate::state::CheckoutStep;

/// Shown when the backend cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Could not reach the server. Please try again.";

/// Shown when the backend fails without a message of its own.
pub const ORDER_FAILED_MESSAGE: &str = "Failed to create order";

pub const ORDER_DETAILS_FAILED_MESSAGE: &str = "Failed to fetch order details";

pub const PAYMENT_FAILED_MESSAGE: &str = "Payment processing failed";

/// Why an order backend request failed.
///
/// `Display` is the customer-facing text: backend messages pass through
/// verbatim, transport failures get a generic retry prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The request was incomplete; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request never got a response.
    #[error("{0}")]
    Network(String),

    /// The backend answered with an error.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl SubmitError {
    /// A transport failure with the generic retry prompt.
    pub fn network() -> Self {
        SubmitError::Network(NETWORK_ERROR_MESSAGE.to_string())
    }

    /// A backend failure, using the generic message when `message` is blank.
    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::server_or(status, message, ORDER_FAILED_MESSAGE)
    }

    /// A backend failure, using `fallback` when `message` is blank.
    pub fn server_or(status: u16, message: Option<String>, fallback: &str) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        SubmitError::Server { status, message }
    }

    /// The HTTP status the backend answered with, if it answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the error kind as a string, for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Validation(_) => "validation",
            SubmitError::Network(_) => "network",
            SubmitError::Server { .. } => "server",
        }
    }
}

/// Errors surfaced by the checkout controller.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Input the customer must correct; the step did not change.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The order submission failed; the session is now `Failed`.
    #[error("{0}")]
    Submission(#[from] SubmitError),

    /// Fetching or paying a placed order failed. The checkout step is untouched.
    #[error("{0}")]
    PlacedOrder(SubmitError),

    /// A submission is in flight; the request was ignored.
    #[error("An order submission is already in progress")]
    SubmissionInFlight,

    /// A payment is in flight; the request was ignored.
    #[error("A payment is already in progress")]
    PaymentInFlight,

    /// The requested move is not allowed from the current step.
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: CheckoutStep, to: CheckoutStep },

    /// The cart holds no line for this product.
    #[error("Item not found in cart: {0}")]
    ItemNotFound(ProductId),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
