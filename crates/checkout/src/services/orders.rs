//! Order backend trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::OrderId;
use domain::{OrderConfirmation, OrderDetails, OrderDraft, PaymentResult};

use crate::error::SubmitError;

/// The backend endpoint that persists orders.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Creates an order from `draft`, authenticated with `token` when present.
    ///
    /// Implementations make exactly one attempt.
    async fn create_order(
        &self,
        draft: &OrderDraft,
        token: Option<&str>,
    ) -> Result<OrderConfirmation, SubmitError>;

    /// Fetches a placed order.
    async fn get_order(
        &self,
        order_id: &OrderId,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError>;

    /// Records `result` as the payment of a placed order and returns the
    /// updated order.
    async fn pay_order(
        &self,
        order_id: &OrderId,
        result: &PaymentResult,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError>;
}

#[async_trait]
impl<T: OrderBackend + ?Sized> OrderBackend for Arc<T> {
    async fn create_order(
        &self,
        draft: &OrderDraft,
        token: Option<&str>,
    ) -> Result<OrderConfirmation, SubmitError> {
        (**self).create_order(draft, token).await
    }

    async fn get_order(
        &self,
        order_id: &OrderId,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        (**self).get_order(order_id, token).await
    }

    async fn pay_order(
        &self,
        order_id: &OrderId,
        result: &PaymentResult,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        (**self).pay_order(order_id, result, token).await
    }
}

/// A request received by [`InMemoryOrderBackend`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub draft: OrderDraft,
    pub token: Option<String>,
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    calls: Vec<RecordedCall>,
    orders: HashMap<OrderId, OrderDetails>,
    next_id: u32,
    fail_with: Option<SubmitError>,
    delay: Option<Duration>,
}

/// In-memory order backend for testing.
///
/// Created orders are kept and can be fetched and paid. The configured
/// failure and delay apply to every request.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderBackend {
    state: Arc<Mutex<InMemoryOrderState>>,
}

impl InMemoryOrderBackend {
    /// Creates a new in-memory order backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every following call to fail with `error`. `None` restores success.
    pub fn set_fail_with(&self, error: Option<SubmitError>) {
        self.lock().fail_with = error;
    }

    /// Delays every following response, keeping the submission in flight.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.lock().delay = delay;
    }

    /// Returns a created order as currently stored.
    pub fn order(&self, order_id: &OrderId) -> Option<OrderDetails> {
        self.lock().orders.get(order_id).cloned()
    }

    /// Returns the number of create calls received.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Returns every call received, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryOrderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleeps for the configured delay, then fails if configured to.
    async fn respond(&self) -> Result<(), SubmitError> {
        let delay = self.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.lock().fail_with.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found() -> SubmitError {
        SubmitError::server(404, Some("Order not found".to_string()))
    }
}

#[async_trait]
impl OrderBackend for InMemoryOrderBackend {
    async fn create_order(
        &self,
        draft: &OrderDraft,
        token: Option<&str>,
    ) -> Result<OrderConfirmation, SubmitError> {
        self.lock().calls.push(RecordedCall {
            draft: draft.clone(),
            token: token.map(str::to_string),
        });
        self.respond().await?;

        let mut state = self.lock();
        state.next_id += 1;
        let created_at = Utc::now();
        let order_id = OrderId::new(format!("ORD-{:04}", state.next_id));

        let order = OrderDetails {
            order_items: draft.order_items.clone(),
            shipping_address: draft.shipping_address.clone(),
            payment_method: draft.payment_method,
            total_price: Some(draft.prices.total_price),
            created_at: Some(created_at),
            ..OrderDetails::new(order_id.clone())
        };
        state.orders.insert(order_id.clone(), order);

        let mut confirmation = OrderConfirmation::new(order_id);
        confirmation.total_price = Some(draft.prices.total_price);
        confirmation.created_at = Some(created_at);
        Ok(confirmation)
    }

    async fn get_order(
        &self,
        order_id: &OrderId,
        _token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        self.respond().await?;
        self.order(order_id).ok_or_else(Self::not_found)
    }

    async fn pay_order(
        &self,
        order_id: &OrderId,
        result: &PaymentResult,
        _token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        self.respond().await?;

        let mut state = self.lock();
        let order = state.orders.get_mut(order_id).ok_or_else(Self::not_found)?;
        *order = order.clone().paid(result.clone(), Utc::now());
        Ok(order.clone())
    }
}
