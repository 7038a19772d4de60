//! Checkout session endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkout::{CheckoutController, CheckoutStep, CheckoutSummary, Navigation, OrderBackend};
use common::{OrderId, ProductId};
use domain::{
    CartItem, OrderConfirmation, OrderDetails, PaymentMethod, PaymentResult, ShippingAddress,
    UserInfo,
};
use serde::{Deserialize, Serialize};
use storage::KeyValueStore;

use crate::error::ApiError;

/// The checkout controller as the service runs it: storage and backend are
/// picked at startup.
pub type SessionController = CheckoutController<Arc<dyn KeyValueStore>, Arc<dyn OrderBackend>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub controller: SessionController,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub requested: CheckoutStep,
    pub step: CheckoutStep,
    pub redirected: bool,
    pub checkout: CheckoutSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOptionsResponse {
    pub payment_method: PaymentMethod,
    pub available: Vec<PaymentMethod>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub order: OrderConfirmation,
    pub checkout: CheckoutSummary,
}

// -- Handlers --

/// GET /checkout: snapshot of the session.
#[tracing::instrument(skip(state))]
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<CheckoutSummary> {
    Json(state.controller.summary())
}

/// POST /checkout/cart: add a line, replacing any line for the same product.
#[tracing::instrument(skip(state, item))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(item): Json<CartItem>,
) -> Result<Json<CheckoutSummary>, ApiError> {
    state.controller.add_to_cart(item)?;
    Ok(Json(state.controller.summary()))
}

/// DELETE /checkout/cart/{product_id}: remove one line.
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<CheckoutSummary>, ApiError> {
    state
        .controller
        .remove_from_cart(&ProductId::new(product_id))?;
    Ok(Json(state.controller.summary()))
}

/// DELETE /checkout/cart: empty the cart.
#[tracing::instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CheckoutSummary>, ApiError> {
    state.controller.clear_cart()?;
    Ok(Json(state.controller.summary()))
}

/// POST /checkout/steps/{step}: navigate to a step. Guards may redirect.
#[tracing::instrument(skip(state))]
pub async fn enter_step(
    State(state): State<Arc<AppState>>,
    Path(step): Path<String>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let requested: CheckoutStep = step.parse()?;
    let navigation = state.controller.enter(requested)?;

    Ok(Json(NavigationResponse {
        requested,
        step: navigation.step(),
        redirected: matches!(navigation, Navigation::Redirect { .. }),
        checkout: state.controller.summary(),
    }))
}

/// PUT /checkout/shipping: submit the shipping form.
#[tracing::instrument(skip(state, address))]
pub async fn submit_shipping(
    State(state): State<Arc<AppState>>,
    Json(address): Json<ShippingAddress>,
) -> Result<Json<CheckoutSummary>, ApiError> {
    state.controller.submit_shipping(address)?;
    Ok(Json(state.controller.summary()))
}

/// GET /checkout/payment: the method the payment form preselects.
#[tracing::instrument(skip(state))]
pub async fn payment_options(State(state): State<Arc<AppState>>) -> Json<PaymentOptionsResponse> {
    Json(PaymentOptionsResponse {
        payment_method: state.controller.payment_preselection(),
        available: PaymentMethod::ALL.to_vec(),
    })
}

/// PUT /checkout/payment: submit the payment form.
#[tracing::instrument(skip(state, req))]
pub async fn submit_payment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<CheckoutSummary>, ApiError> {
    state.controller.submit_payment(req.payment_method)?;
    Ok(Json(state.controller.summary()))
}

/// POST /checkout/order: place the order.
#[tracing::instrument(skip(state))]
pub async fn place_order(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<OrderPlacedResponse>), ApiError> {
    let order = state.controller.place_order().await?;

    let response = OrderPlacedResponse {
        order,
        checkout: state.controller.summary(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /checkout/order/{order_id}: fetch a placed order from the backend.
#[tracing::instrument(skip(state))]
pub async fn order_details(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderDetails>, ApiError> {
    let order = state
        .controller
        .order_details(&OrderId::new(order_id))
        .await?;
    Ok(Json(order))
}

/// PUT /checkout/order/{order_id}/pay: record the payment processor's receipt.
#[tracing::instrument(skip(state, result))]
pub async fn pay_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
    Json(result): Json<PaymentResult>,
) -> Result<Json<OrderDetails>, ApiError> {
    let order = state
        .controller
        .pay_order(&OrderId::new(order_id), result)
        .await?;
    Ok(Json(order))
}

/// PUT /checkout/session: store the signed-in user.
#[tracing::instrument(skip(state, user_info))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(user_info): Json<UserInfo>,
) -> Json<CheckoutSummary> {
    state.controller.login(user_info);
    Json(state.controller.summary())
}

/// DELETE /checkout/session: sign out.
#[tracing::instrument(skip(state))]
pub async fn logout(State(state): State<Arc<AppState>>) -> StatusCode {
    state.controller.logout();
    StatusCode::NO_CONTENT
}
