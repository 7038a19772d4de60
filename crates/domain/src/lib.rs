//! Checkout domain layer.
//!
//! This crate provides the core checkout abstractions including:
//! - Money, cart lines, shipping address, and payment method value objects
//! - Price computation under a configurable pricing policy
//! - Order draft assembly with the review guards
//! - Placed order details and payment receipts
//! - Action and Slice traits, checkout slices with pure reducers
//! - The observable Store that holds checkout state

pub mod cart;
pub mod error;
pub mod reducer;
pub mod store;

pub use cart::{
    CartItem, CartState, CheckoutAction, CheckoutState, Money, OrderConfirmation,
    OrderCreateState, OrderDetails, OrderDetailsState, OrderDraft, OrderPayState, PaymentMethod,
    PaymentResult, PriceBreakdown, PricingPolicy, ShippingAddress, UserInfo, UserLoginState,
};
pub use error::ValidationError;
pub use reducer::{Action, Slice};
pub use store::{Store, SubscriptionId};
