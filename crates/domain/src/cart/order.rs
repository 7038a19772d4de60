//! Placed orders as the backend reports them, and their payment.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::draft::lenient;
use super::{CartItem, Money, PaymentMethod, ShippingAddress};

/// The payment processor's receipt, sent when paying an order.
///
/// Serializes with the processor's field names:
/// `{id, status, update_time, email_address}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub update_time: String,
    #[serde(default)]
    pub email_address: String,
}

impl PaymentResult {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            ..Self::default()
        }
    }

    /// A receipt must carry the processor's transaction ID.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingPaymentReference);
        }
        Ok(())
    }
}

/// A placed order, fetched back from the backend.
///
/// Only `_id` is required. Missing flags read as false; optional fields that
/// are missing or malformed read as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(rename = "_id")]
    pub order_id: OrderId,

    #[serde(default)]
    pub order_items: Vec<CartItem>,

    #[serde(default)]
    pub shipping_address: ShippingAddress,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_method: Option<PaymentMethod>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_price: Option<Money>,

    #[serde(default)]
    pub is_paid: bool,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_result: Option<PaymentResult>,

    #[serde(default)]
    pub is_delivered: bool,

    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderDetails {
    /// An unpaid order carrying only its ID.
    pub fn new(order_id: impl Into<OrderId>) -> Self {
        Self {
            order_id: order_id.into(),
            order_items: Vec::new(),
            shipping_address: ShippingAddress::default(),
            payment_method: None,
            total_price: None,
            is_paid: false,
            paid_at: None,
            payment_result: None,
            is_delivered: false,
            created_at: None,
        }
    }

    /// Marks the order paid with `result` at `paid_at`.
    pub fn paid(mut self, result: PaymentResult, paid_at: DateTime<Utc>) -> Self {
        self.is_paid = true;
        self.paid_at = Some(paid_at);
        self.payment_result = Some(result);
        self
    }
}
