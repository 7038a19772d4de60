//! Checkout state slices and their reducers.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::reducer::Slice;

use super::{
    CartItem, CheckoutAction, OrderConfirmation, OrderDetails, OrderDraft, PaymentMethod,
    PriceBreakdown, PricingPolicy, ShippingAddress, UserInfo,
};

/// The cart slice: items, shipping address, and payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub cart_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<PaymentMethod>,
}

impl CartState {
    /// Returns the line for a product, if present.
    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.cart_items
            .iter()
            .find(|item| &item.product_id == product_id)
    }

    /// Returns true if the cart holds a line for the product.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.item(product_id).is_some()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.cart_items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }

    /// Checks that `item` may be upserted: the line itself is valid and the
    /// resulting subtotal stays within [`Money::LIMIT`](super::Money::LIMIT).
    pub fn check_upsert(&self, item: &CartItem) -> Result<(), ValidationError> {
        item.validate()?;

        let others: Vec<CartItem> = self
            .cart_items
            .iter()
            .filter(|existing| existing.product_id != item.product_id)
            .cloned()
            .chain(std::iter::once(item.clone()))
            .collect();
        PriceBreakdown::checked_items_price(&others).map(|_| ())
    }

    /// Derived prices for the current items.
    pub fn prices(&self, policy: &PricingPolicy) -> PriceBreakdown {
        PriceBreakdown::compute(&self.cart_items, policy)
    }

    /// Assembles an order draft, applying the review guards.
    pub fn draft(&self, policy: &PricingPolicy) -> Result<OrderDraft, ValidationError> {
        OrderDraft::assemble(
            &self.cart_items,
            &self.shipping_address,
            self.payment_method,
            policy,
        )
    }
}

impl Slice for CartState {
    type Action = CheckoutAction;

    fn reduce(&self, action: &Self::Action) -> Self {
        match action {
            CheckoutAction::CartAddItem(item) => {
                let mut cart_items = self.cart_items.clone();
                match cart_items
                    .iter_mut()
                    .find(|existing| existing.product_id == item.product_id)
                {
                    Some(existing) => *existing = item.clone(),
                    None => cart_items.push(item.clone()),
                }
                Self {
                    cart_items,
                    ..self.clone()
                }
            }
            CheckoutAction::CartRemoveItem(product_id) => Self {
                cart_items: self
                    .cart_items
                    .iter()
                    .filter(|item| &item.product_id != product_id)
                    .cloned()
                    .collect(),
                ..self.clone()
            },
            CheckoutAction::CartClearItems => Self {
                cart_items: Vec::new(),
                ..self.clone()
            },
            CheckoutAction::CartSaveShippingAddress(address) => Self {
                shipping_address: address.clone(),
                ..self.clone()
            },
            CheckoutAction::CartSavePaymentMethod(method) => Self {
                payment_method: Some(*method),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}

/// Order submission lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OrderCreateState {
    #[default]
    Idle,
    Pending,
    Succeeded { order: OrderConfirmation },
    Failed { error: String },
}

impl OrderCreateState {
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderCreateState::Pending)
    }

    /// The created order, once submission succeeded.
    pub fn order(&self) -> Option<&OrderConfirmation> {
        match self {
            OrderCreateState::Succeeded { order } => Some(order),
            _ => None,
        }
    }

    /// The failure message, once submission failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            OrderCreateState::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderCreateState::Idle => "idle",
            OrderCreateState::Pending => "pending",
            OrderCreateState::Succeeded { .. } => "succeeded",
            OrderCreateState::Failed { .. } => "failed",
        }
    }
}

impl Slice for OrderCreateState {
    type Action = CheckoutAction;

    fn reduce(&self, action: &Self::Action) -> Self {
        match action {
            CheckoutAction::OrderCreateRequest => OrderCreateState::Pending,
            CheckoutAction::OrderCreateSuccess(order) => OrderCreateState::Succeeded {
                order: order.clone(),
            },
            CheckoutAction::OrderCreateFail(error) => OrderCreateState::Failed {
                error: error.clone(),
            },
            CheckoutAction::OrderCreateReset => OrderCreateState::Idle,
            _ => self.clone(),
        }
    }
}

/// A placed order fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OrderDetailsState {
    #[default]
    Idle,
    Loading,
    Loaded { order: OrderDetails },
    Failed { error: String },
}

impl OrderDetailsState {
    pub fn order(&self) -> Option<&OrderDetails> {
        match self {
            OrderDetailsState::Loaded { order } => Some(order),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OrderDetailsState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

impl Slice for OrderDetailsState {
    type Action = CheckoutAction;

    fn reduce(&self, action: &Self::Action) -> Self {
        match action {
            CheckoutAction::OrderDetailsRequest => OrderDetailsState::Loading,
            CheckoutAction::OrderDetailsSuccess(order) => OrderDetailsState::Loaded {
                order: order.clone(),
            },
            CheckoutAction::OrderDetailsFail(error) => OrderDetailsState::Failed {
                error: error.clone(),
            },
            // A payment of the order on display refreshes it.
            CheckoutAction::OrderPaySuccess(paid) => match self {
                OrderDetailsState::Loaded { order } if order.order_id == paid.order_id => {
                    OrderDetailsState::Loaded {
                        order: paid.clone(),
                    }
                }
                _ => self.clone(),
            },
            _ => self.clone(),
        }
    }
}

/// Payment of a placed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OrderPayState {
    #[default]
    Idle,
    Pending,
    Paid { order: OrderDetails },
    Failed { error: String },
}

impl OrderPayState {
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderPayState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OrderPayState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

impl Slice for OrderPayState {
    type Action = CheckoutAction;

    fn reduce(&self, action: &Self::Action) -> Self {
        match action {
            CheckoutAction::OrderPayRequest => OrderPayState::Pending,
            CheckoutAction::OrderPaySuccess(order) => OrderPayState::Paid {
                order: order.clone(),
            },
            CheckoutAction::OrderPayFail(error) => OrderPayState::Failed {
                error: error.clone(),
            },
            CheckoutAction::OrderPayReset => OrderPayState::Idle,
            _ => self.clone(),
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginState {
    pub user_info: Option<UserInfo>,
}

impl UserLoginState {
    /// Bearer token for authenticated requests.
    pub fn token(&self) -> Option<&str> {
        self.user_info.as_ref().and_then(UserInfo::bearer_token)
    }
}

impl Slice for UserLoginState {
    type Action = CheckoutAction;

    fn reduce(&self, action: &Self::Action) -> Self {
        match action {
            CheckoutAction::UserLogin(user_info) => Self {
                user_info: Some(user_info.clone()),
            },
            CheckoutAction::UserLogout => Self { user_info: None },
            _ => self.clone(),
        }
    }
}

/// The whole checkout state tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutState {
    pub cart: CartState,
    pub order_create: OrderCreateState,
    #[serde(default)]
    pub order_details: OrderDetailsState,
    #[serde(default)]
    pub order_pay: OrderPayState,
    pub user_login: UserLoginState,
}

impl Slice for CheckoutState {
    type Action = CheckoutAction;

    fn reduce(&self, action: &Self::Action) -> Self {
        Self {
            cart: self.cart.reduce(action),
            order_create: self.order_create.reduce(action),
            order_details: self.order_details.reduce(action),
            order_pay: self.order_pay.reduce(action),
            user_login: self.user_login.reduce(action),
        }
    }
}
