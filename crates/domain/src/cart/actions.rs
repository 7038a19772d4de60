//! Checkout actions.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::reducer::Action;

use super::{CartItem, OrderConfirmation, OrderDetails, PaymentMethod, ShippingAddress, UserInfo};

/// Every action the checkout state container accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutAction {
    /// Adds a line, replacing any line for the same product.
    CartAddItem(CartItem),

    /// Removes the line for a product.
    CartRemoveItem(ProductId),

    /// Empties the cart, keeping address and payment method.
    CartClearItems,

    CartSaveShippingAddress(ShippingAddress),

    CartSavePaymentMethod(PaymentMethod),

    /// Order submission started.
    OrderCreateRequest,

    OrderCreateSuccess(OrderConfirmation),

    /// Order submission failed with a customer-facing message.
    OrderCreateFail(String),

    /// Returns order creation to idle.
    OrderCreateReset,

    /// A placed order is being fetched.
    OrderDetailsRequest,

    OrderDetailsSuccess(OrderDetails),

    OrderDetailsFail(String),

    /// Payment of a placed order started.
    OrderPayRequest,

    /// The order as the backend reports it after payment.
    OrderPaySuccess(OrderDetails),

    OrderPayFail(String),

    /// Returns order payment to idle.
    OrderPayReset,

    UserLogin(UserInfo),

    UserLogout,
}

impl CheckoutAction {
    /// Returns true for actions handled by the cart slice.
    pub fn is_cart_action(&self) -> bool {
        matches!(
            self,
            CheckoutAction::CartAddItem(_)
                | CheckoutAction::CartRemoveItem(_)
                | CheckoutAction::CartClearItems
                | CheckoutAction::CartSaveShippingAddress(_)
                | CheckoutAction::CartSavePaymentMethod(_)
        )
    }

    /// Returns true for actions handled by the order creation slice.
    pub fn is_order_action(&self) -> bool {
        matches!(
            self,
            CheckoutAction::OrderCreateRequest
                | CheckoutAction::OrderCreateSuccess(_)
                | CheckoutAction::OrderCreateFail(_)
                | CheckoutAction::OrderCreateReset
        )
    }

    /// Returns true for actions handled by the order details or payment slices.
    pub fn is_placed_order_action(&self) -> bool {
        matches!(
            self,
            CheckoutAction::OrderDetailsRequest
                | CheckoutAction::OrderDetailsSuccess(_)
                | CheckoutAction::OrderDetailsFail(_)
                | CheckoutAction::OrderPayRequest
                | CheckoutAction::OrderPaySuccess(_)
                | CheckoutAction::OrderPayFail(_)
                | CheckoutAction::OrderPayReset
        )
    }
}

impl Action for CheckoutAction {
    fn action_type(&self) -> &'static str {
        match self {
            CheckoutAction::CartAddItem(_) => "CART_ADD_ITEM",
            CheckoutAction::CartRemoveItem(_) => "CART_REMOVE_ITEM",
            CheckoutAction::CartClearItems => "CART_CLEAR_ITEMS",
            CheckoutAction::CartSaveShippingAddress(_) => "CART_SAVE_SHIPPING_ADDRESS",
            CheckoutAction::CartSavePaymentMethod(_) => "CART_SAVE_PAYMENT_METHOD",
            CheckoutAction::OrderCreateRequest => "ORDER_CREATE_REQUEST",
            CheckoutAction::OrderCreateSuccess(_) => "ORDER_CREATE_SUCCESS",
            CheckoutAction::OrderCreateFail(_) => "ORDER_CREATE_FAIL",
            CheckoutAction::OrderCreateReset => "ORDER_CREATE_RESET",
            CheckoutAction::OrderDetailsRequest => "ORDER_DETAILS_REQUEST",
            CheckoutAction::OrderDetailsSuccess(_) => "ORDER_DETAILS_SUCCESS",
            CheckoutAction::OrderDetailsFail(_) => "ORDER_DETAILS_FAIL",
            CheckoutAction::OrderPayRequest => "ORDER_PAY_REQUEST",
            CheckoutAction::OrderPaySuccess(_) => "ORDER_PAY_SUCCESS",
            CheckoutAction::OrderPayFail(_) => "ORDER_PAY_FAIL",
            CheckoutAction::OrderPayReset => "ORDER_PAY_RESET",
            CheckoutAction::UserLogin(_) => "USER_LOGIN",
            CheckoutAction::UserLogout => "USER_LOGOUT",
        }
    }
}
