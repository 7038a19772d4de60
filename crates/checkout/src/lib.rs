//! Checkout workflow for the storefront.
//!
//! This crate drives a checkout session through its steps:
//! 1. Cart
//! 2. Shipping address
//! 3. Payment method
//! 4. Review and place order
//!
//! The [`CheckoutController`] guards every transition and allows at most one
//! order submission in flight. The [`OrderSubmissionClient`] posts the draft
//! to an [`OrderBackend`] exactly once per attempt. Placed orders can then be
//! fetched and paid through the same backend.

pub mod client;
pub mod controller;
pub mod error;
pub mod services;
pub mod state;
pub mod summary;

pub use client::OrderSubmissionClient;
pub use controller::{CheckoutController, Navigation};
pub use error::{
    CheckoutError, NETWORK_ERROR_MESSAGE, ORDER_DETAILS_FAILED_MESSAGE, ORDER_FAILED_MESSAGE,
    PAYMENT_FAILED_MESSAGE, Result, SubmitError,
};
pub use services::{HttpOrderBackend, InMemoryOrderBackend, OrderBackend, RecordedCall};
pub use state::{CheckoutStep, UnknownStep};
pub use summary::CheckoutSummary;
