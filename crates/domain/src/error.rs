//! Domain error types.

use thiserror::Error;

/// A local, pre-submission problem the customer can fix.
///
/// The `Display` text is what the checkout shows to the customer, so the three
/// review guards keep the storefront's wording exactly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No payment method has been selected.
    #[error("Please select a payment method")]
    MissingPaymentMethod,

    /// The cart has no items.
    #[error("Your cart is empty")]
    EmptyCart,

    /// No shipping address has been captured.
    #[error("Please provide a shipping address")]
    MissingShippingAddress,

    /// A field of the shipping form is blank.
    #[error("Please provide a {field}")]
    MissingAddressField { field: &'static str },

    /// A payment method name that the storefront does not offer.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// A cart line without a product reference.
    #[error("A product is required")]
    MissingProduct,

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// Invalid price.
    #[error("Invalid price: {price} cents (must not be negative)")]
    NegativePrice { price: i64 },

    /// More units requested than the catalog has.
    #[error("Only {available} of {product_id} in stock ({requested} requested)")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    /// A price, line or order total above the supported maximum.
    #[error("Amount exceeds the maximum order value")]
    AmountOutOfRange,

    /// A payment receipt without the processor's transaction ID.
    #[error("Payment reference is missing")]
    MissingPaymentReference,

    /// The draft's price breakdown does not match its items.
    #[error("Order totals do not match the order items")]
    PriceMismatch,
}
