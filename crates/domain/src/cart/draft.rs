//! Order draft assembled right before submission.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

use super::{CartItem, Money, PaymentMethod, PriceBreakdown, PricingPolicy, ShippingAddress};

/// The order payload posted to the backend.
///
/// Serializes to `{orderItems, shippingAddress, paymentMethod, itemsPrice,
/// shippingPrice, taxPrice, totalPrice}`. The client-computed prices are sent
/// as-is; the backend does not recompute them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub order_items: Vec<CartItem>,

    pub shipping_address: ShippingAddress,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    #[serde(flatten)]
    pub prices: PriceBreakdown,
}

impl OrderDraft {
    /// Assembles a draft from checkout state, applying the review guards.
    ///
    /// Guards run in a fixed order and stop at the first failure:
    /// payment method, then non-empty cart, then shipping address.
    pub fn assemble(
        items: &[CartItem],
        shipping_address: &ShippingAddress,
        payment_method: Option<PaymentMethod>,
        policy: &PricingPolicy,
    ) -> Result<Self, ValidationError> {
        let payment_method = payment_method.ok_or(ValidationError::MissingPaymentMethod)?;

        if items.is_empty() {
            return Err(ValidationError::EmptyCart);
        }

        if !shipping_address.is_present() {
            return Err(ValidationError::MissingShippingAddress);
        }

        Ok(Self {
            order_items: items.to_vec(),
            shipping_address: shipping_address.clone(),
            payment_method: Some(payment_method),
            prices: PriceBreakdown::compute(items, policy),
        })
    }

    /// Structural check run by the submission client before any network call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.payment_method.is_none() {
            return Err(ValidationError::MissingPaymentMethod);
        }

        if self.order_items.is_empty() {
            return Err(ValidationError::EmptyCart);
        }

        if !self.shipping_address.is_present() {
            return Err(ValidationError::MissingShippingAddress);
        }

        for item in &self.order_items {
            item.validate()?;
        }

        let items_price = PriceBreakdown::checked_items_price(&self.order_items)?;
        if items_price != self.prices.items_price || !self.prices.is_consistent() {
            return Err(ValidationError::PriceMismatch);
        }

        Ok(())
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.order_items.iter().map(|item| item.quantity).sum()
    }
}

/// The backend's acknowledgment of a created order.
///
/// The backend answers with the whole order document; only `_id` is required.
/// The optional fields read as `None` when they are missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    #[serde(rename = "_id")]
    pub order_id: OrderId,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_price: Option<Money>,
}

/// Reads an optional field, yielding `None` for any value that does not parse.
pub(super) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Parsed(T),
        Ignored(serde::de::IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Parsed(value) => Some(value),
        Lenient::Ignored(_) => None,
    })
}

impl OrderConfirmation {
    /// Creates a confirmation carrying only the order ID.
    pub fn new(order_id: impl Into<OrderId>) -> Self {
        Self {
            order_id: order_id.into(),
            created_at: None,
            total_price: None,
        }
    }
}
