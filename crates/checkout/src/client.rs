//! Order submission client.

use common::OrderId;
use domain::{OrderConfirmation, OrderDetails, OrderDraft, PaymentResult};

use crate::error::SubmitError;
use crate::services::OrderBackend;

/// Submits a finished draft to the order backend.
///
/// Every call to [`submit`](Self::submit) makes at most one backend call and
/// never retries. Retrying is the customer's decision, made from the failed
/// step.
#[derive(Debug, Clone)]
pub struct OrderSubmissionClient<B: OrderBackend> {
    backend: B,
}

impl<B: OrderBackend> OrderSubmissionClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validates `draft` and posts it.
    ///
    /// An incomplete draft fails with [`SubmitError::Validation`] before any
    /// network call.
    #[tracing::instrument(
        skip(self, draft, token),
        fields(items = draft.order_items.len(), total = %draft.prices.total_price)
    )]
    pub async fn submit(
        &self,
        draft: &OrderDraft,
        token: Option<&str>,
    ) -> Result<OrderConfirmation, SubmitError> {
        if let Err(e) = draft.validate() {
            tracing::warn!(error = %e, "refusing to submit incomplete draft");
            return Err(e.into());
        }

        let confirmation = self.backend.create_order(draft, token).await?;
        tracing::info!(order_id = %confirmation.order_id, "order created");
        Ok(confirmation)
    }

    #[tracing::instrument(skip(self, token))]
    pub async fn fetch(
        &self,
        order_id: &OrderId,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        self.backend.get_order(order_id, token).await
    }

    /// Records `result` as the payment of `order_id`.
    ///
    /// A receipt without a transaction ID fails with
    /// [`SubmitError::Validation`] before any network call.
    #[tracing::instrument(skip(self, result, token), fields(status = %result.status))]
    pub async fn pay(
        &self,
        order_id: &OrderId,
        result: &PaymentResult,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        if let Err(e) = result.validate() {
            tracing::warn!(error = %e, "refusing to send incomplete payment receipt");
            return Err(e.into());
        }

        let order = self.backend.pay_order(order_id, result, token).await?;
        tracing::info!(order_id = %order.order_id, paid = order.is_paid, "order payment recorded");
        Ok(order)
    }
}
