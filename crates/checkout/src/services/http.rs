//! HTTP order backend.

use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use domain::{OrderConfirmation, OrderDetails, OrderDraft, PaymentResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::OrderBackend;
use crate::error::{
    ORDER_DETAILS_FAILED_MESSAGE, ORDER_FAILED_MESSAGE, PAYMENT_FAILED_MESSAGE, SubmitError,
};

/// Error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Talks to the orders resource at `{base_url}/orders` with a bearer token.
///
/// - create: `POST {base_url}/orders`
/// - fetch: `GET {base_url}/orders/{id}`
/// - pay: `PUT {base_url}/orders/{id}/pay`
#[derive(Debug, Clone)]
pub struct HttpOrderBackend {
    client: reqwest::Client,
    orders_url: String,
}

impl HttpOrderBackend {
    /// Creates a backend for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a backend from an existing client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            orders_url: format!("{}/orders", base_url.trim_end_matches('/')),
        }
    }

    /// The URL orders are posted to.
    pub fn orders_url(&self) -> &str {
        &self.orders_url
    }

    /// The URL of a placed order.
    pub fn order_url(&self, order_id: &OrderId) -> String {
        format!("{}/{}", self.orders_url, order_id)
    }

    /// Sends `request` once and decodes a 2xx body as `T`.
    ///
    /// A non-2xx answer carries the body's `message`, else `fallback`. A 2xx
    /// body that does not decode is reported as a server error with `fallback`.
    async fn send<T: DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
        token: Option<&str>,
        fallback: &str,
    ) -> Result<T, SubmitError> {
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "order request failed");
            SubmitError::network()
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, %status, "failed to read order response");
            SubmitError::network()
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            tracing::warn!(%status, message = ?message, "backend rejected request");
            return Err(SubmitError::server_or(status.as_u16(), message, fallback));
        }

        serde_json::from_slice::<T>(&body).map_err(|e| {
            tracing::warn!(error = %e, %status, "order response has no order id");
            SubmitError::server_or(status.as_u16(), None, fallback)
        })
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    #[tracing::instrument(skip(self, draft, token), fields(url = %self.orders_url))]
    async fn create_order(
        &self,
        draft: &OrderDraft,
        token: Option<&str>,
    ) -> Result<OrderConfirmation, SubmitError> {
        let request = self.client.post(&self.orders_url).json(draft);
        self.send(request, token, ORDER_FAILED_MESSAGE).await
    }

    #[tracing::instrument(skip(self, token), fields(%order_id))]
    async fn get_order(
        &self,
        order_id: &OrderId,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        let request = self.client.get(self.order_url(order_id));
        self.send(request, token, ORDER_DETAILS_FAILED_MESSAGE).await
    }

    #[tracing::instrument(skip(self, result, token), fields(%order_id))]
    async fn pay_order(
        &self,
        order_id: &OrderId,
        result: &PaymentResult,
        token: Option<&str>,
    ) -> Result<OrderDetails, SubmitError> {
        let request = self
            .client
            .put(format!("{}/pay", self.order_url(order_id)))
            .json(result);
        self.send(request, token, PAYMENT_FAILED_MESSAGE).await
    }
}
