//! Read model of a checkout session.

use common::SessionId;
use domain::{
    CartItem, CheckoutState, OrderCreateState, PaymentMethod, PriceBreakdown, PricingPolicy,
    ShippingAddress,
};
use serde::Serialize;

use crate::state::CheckoutStep;

/// Everything a checkout page renders, in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub session_id: SessionId,
    pub step: CheckoutStep,
    pub cart_items: Vec<CartItem>,
    pub item_count: u32,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<PaymentMethod>,
    pub prices: PriceBreakdown,
    pub order: OrderCreateState,
    pub notice: Option<String>,
    pub signed_in: bool,
}

impl CheckoutSummary {
    pub fn build(
        session_id: SessionId,
        step: CheckoutStep,
        state: &CheckoutState,
        policy: &PricingPolicy,
        notice: Option<String>,
    ) -> Self {
        Self {
            session_id,
            step,
            cart_items: state.cart.cart_items.clone(),
            item_count: state.cart.item_count(),
            shipping_address: state.cart.shipping_address.clone(),
            payment_method: state.cart.payment_method,
            prices: state.cart.prices(policy),
            order: state.order_create.clone(),
            notice,
            signed_in: state.user_login.user_info.is_some(),
        }
    }
}
