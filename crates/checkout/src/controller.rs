//! Checkout workflow controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use common::{OrderId, ProductId, SessionId};
use domain::{
    CartItem, CheckoutAction, CheckoutState, OrderConfirmation, OrderDetails, PaymentMethod,
    PaymentResult, PricingPolicy, ShippingAddress, Store, UserInfo, ValidationError,
};
use persistence::{StorageMirror, attach, keys, load_initial_state, load_payment_method};
use storage::{KeyValueStore, LocalPersistence};

use crate::client::OrderSubmissionClient;
use crate::error::{CheckoutError, NETWORK_ERROR_MESSAGE, Result};
use crate::services::OrderBackend;
use crate::state::CheckoutStep;
use crate::summary::CheckoutSummary;

/// Outcome of entering a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The session is now on the requested step.
    Proceed(CheckoutStep),

    /// A prerequisite is missing; the session moved to `to` instead.
    Redirect {
        to: CheckoutStep,
        reason: ValidationError,
    },
}

impl Navigation {
    /// The step the session ended up on.
    pub fn step(&self) -> CheckoutStep {
        match self {
            Navigation::Proceed(step) => *step,
            Navigation::Redirect { to, .. } => *to,
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    step: CheckoutStep,
    notice: Option<String>,
    paying: bool,
}

/// Drives one checkout session through its steps.
///
/// The controller owns the step and the current notice. Cart, address,
/// payment and order status live in the injected [`Store`]; the controller
/// only changes them by dispatching actions.
///
/// At most one order submission is in flight per session: while the step is
/// `Submitting`, further `place_order` calls return
/// [`CheckoutError::SubmissionInFlight`] without touching the backend. Order
/// payments are single-flight the same way.
pub struct CheckoutController<S, B>
where
    S: KeyValueStore,
    B: OrderBackend,
{
    session_id: SessionId,
    store: Arc<Store<CheckoutState>>,
    persistence: LocalPersistence<S>,
    client: OrderSubmissionClient<B>,
    policy: PricingPolicy,
    session: Mutex<Session>,
}

impl<S, B> CheckoutController<S, B>
where
    S: KeyValueStore,
    B: OrderBackend,
{
    /// Creates a controller over an existing store.
    pub fn new(
        store: Arc<Store<CheckoutState>>,
        persistence: LocalPersistence<S>,
        client: OrderSubmissionClient<B>,
        policy: PricingPolicy,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            store,
            persistence,
            client,
            policy,
            session: Mutex::new(Session::default()),
        }
    }

    /// Creates a controller whose store is seeded from storage and mirrored
    /// back to it.
    pub fn hydrated(persistence: LocalPersistence<S>, backend: B, policy: PricingPolicy) -> Self
    where
        S: Clone + 'static,
    {
        let initial = load_initial_state(&persistence);
        let store = Arc::new(Store::new(initial.clone()));
        attach(
            &store,
            Arc::new(StorageMirror::new(persistence.clone(), &initial)),
        );

        let controller = Self::new(
            store,
            persistence,
            OrderSubmissionClient::new(backend),
            policy,
        );
        tracing::info!(
            session_id = %controller.session_id,
            items = initial.cart.cart_items.len(),
            "checkout session started"
        );
        controller
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn store(&self) -> &Arc<Store<CheckoutState>> {
        &self.store
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn client(&self) -> &OrderSubmissionClient<B> {
        &self.client
    }

    /// The step the session is on.
    pub fn step(&self) -> CheckoutStep {
        self.session().step
    }

    /// The current customer-facing message, if any.
    pub fn notice(&self) -> Option<String> {
        self.session().notice.clone()
    }

    /// Snapshot of the whole session.
    pub fn summary(&self) -> CheckoutSummary {
        let (step, notice) = {
            let session = self.session();
            (session.step, session.notice.clone())
        };
        CheckoutSummary::build(
            self.session_id,
            step,
            &self.store.get_state(),
            &self.policy,
            notice,
        )
    }

    /// Enters a step by navigation.
    ///
    /// - Payment without a shipping address redirects to Shipping.
    /// - Review picks up a stored payment method when the state has none.
    /// - Leaving Success or Failed resets the order status.
    /// - Submitting, Success and Failed cannot be entered this way, and
    ///   nothing can be entered while a submission is in flight.
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn enter(&self, target: CheckoutStep) -> Result<Navigation> {
        let mut session = self.session();
        let from = session.step;

        if from == CheckoutStep::Submitting {
            return Err(CheckoutError::SubmissionInFlight);
        }
        if !target.is_navigable() {
            return Err(CheckoutError::InvalidTransition { from, to: target });
        }

        if from.is_settled() {
            self.store.dispatch(CheckoutAction::OrderCreateReset);
        }

        let state = self.store.get_state();
        let navigation = match target {
            CheckoutStep::Payment if !state.cart.shipping_address.is_present() => {
                Navigation::Redirect {
                    to: CheckoutStep::Shipping,
                    reason: ValidationError::MissingShippingAddress,
                }
            }
            CheckoutStep::Review => {
                if state.cart.payment_method.is_none()
                    && let Some(method) = load_payment_method(&self.persistence)
                {
                    tracing::debug!(%method, "restored payment method from storage");
                    self.store
                        .dispatch(CheckoutAction::CartSavePaymentMethod(method));
                }
                Navigation::Proceed(CheckoutStep::Review)
            }
            _ => Navigation::Proceed(target),
        };

        session.step = navigation.step();
        session.notice = match &navigation {
            Navigation::Redirect { reason, .. } => Some(reason.to_string()),
            Navigation::Proceed(_) => None,
        };

        if let Navigation::Redirect { to, reason } = &navigation {
            tracing::info!(%from, requested = %target, %to, %reason, "redirected");
        } else {
            tracing::debug!(%from, to = %session.step, "entered step");
        }

        Ok(navigation)
    }

    /// Adds a line to the cart, replacing any line for the same product.
    #[tracing::instrument(
        skip(self, item),
        fields(session_id = %self.session_id, product_id = %item.product_id)
    )]
    pub fn add_to_cart(&self, item: CartItem) -> Result<()> {
        let mut session = self.unlocked_session()?;
        if let Err(e) = self.store.get_state().cart.check_upsert(&item) {
            return Err(Self::reject(&mut session, e));
        }

        self.store.dispatch(CheckoutAction::CartAddItem(item));
        session.notice = None;
        Ok(())
    }

    /// Removes the line for `product_id`.
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn remove_from_cart(&self, product_id: &ProductId) -> Result<()> {
        let _session = self.unlocked_session()?;
        if !self.store.get_state().cart.contains(product_id) {
            return Err(CheckoutError::ItemNotFound(product_id.clone()));
        }

        self.store
            .dispatch(CheckoutAction::CartRemoveItem(product_id.clone()));
        Ok(())
    }

    /// Empties the cart. Address and payment method are kept.
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn clear_cart(&self) -> Result<()> {
        let _session = self.unlocked_session()?;
        self.store.dispatch(CheckoutAction::CartClearItems);
        Ok(())
    }

    /// Saves the shipping form and moves on to Payment.
    #[tracing::instrument(skip(self, address), fields(session_id = %self.session_id))]
    pub fn submit_shipping(&self, address: ShippingAddress) -> Result<CheckoutStep> {
        let mut session = self.unlocked_session()?;
        let address = address.trimmed();
        if let Err(e) = address.validate() {
            return Err(Self::reject(&mut session, e));
        }

        self.store
            .dispatch(CheckoutAction::CartSaveShippingAddress(address));
        session.step = CheckoutStep::Payment;
        session.notice = None;
        Ok(session.step)
    }

    /// Saves the payment form and moves on to Review.
    ///
    /// No selection is a validation error and leaves the step unchanged. The
    /// selection is written to storage here, not by the storage mirror, and
    /// reaches the state only once that write succeeded.
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn submit_payment(&self, method: Option<PaymentMethod>) -> Result<CheckoutStep> {
        let mut session = self.unlocked_session()?;
        let Some(method) = method else {
            return Err(Self::reject(
                &mut session,
                ValidationError::MissingPaymentMethod,
            ));
        };

        self.persistence.save(keys::PAYMENT_METHOD, &method)?;
        self.store
            .dispatch(CheckoutAction::CartSavePaymentMethod(method));
        session.step = CheckoutStep::Review;
        session.notice = None;
        Ok(session.step)
    }

    /// The method the payment form should show as selected: the session's,
    /// else the stored one, else PayPal.
    pub fn payment_preselection(&self) -> PaymentMethod {
        self.store
            .get_state()
            .cart
            .payment_method
            .or_else(|| load_payment_method(&self.persistence))
            .unwrap_or_default()
    }

    /// Stores the signed-in user. Its token authenticates order submission.
    #[tracing::instrument(skip(self, user_info), fields(session_id = %self.session_id))]
    pub fn login(&self, user_info: UserInfo) {
        self.store.dispatch(CheckoutAction::UserLogin(user_info));
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn logout(&self) {
        self.store.dispatch(CheckoutAction::UserLogout);
    }

    /// Places the order.
    ///
    /// Allowed from Review, and from Failed to retry. The draft is rebuilt
    /// from the current state each time. The guards run in order (payment
    /// method, non-empty cart, shipping address), then every line and the
    /// prices are checked. A failure sets the notice and leaves the step
    /// unchanged without any backend call.
    ///
    /// On success the session moves to Success and the stored payment method
    /// is removed. On failure it moves to Failed with the error as notice.
    /// Dropping the returned future mid-flight also moves it to Failed.
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn place_order(&self) -> Result<OrderConfirmation> {
        let (draft, token) = {
            let mut session = self.session();

            if session.step == CheckoutStep::Submitting {
                tracing::warn!("order submission already in flight, ignoring");
                metrics::counter!("checkout_submissions_ignored_total").increment(1);
                return Err(CheckoutError::SubmissionInFlight);
            }
            if !session.step.can_place_order() {
                return Err(CheckoutError::InvalidTransition {
                    from: session.step,
                    to: CheckoutStep::Submitting,
                });
            }

            let state = self.store.get_state();
            let draft = match state
                .cart
                .draft(&self.policy)
                .and_then(|draft| draft.validate().map(|()| draft))
            {
                Ok(draft) => draft,
                Err(e) => return Err(Self::reject(&mut session, e)),
            };

            session.step = CheckoutStep::Submitting;
            session.notice = None;
            (draft, state.user_login.token().map(str::to_string))
        };

        self.store.dispatch(CheckoutAction::OrderCreateRequest);
        tracing::info!(
            items = draft.order_items.len(),
            total = %draft.prices.total_price,
            payment_method = ?draft.payment_method,
            "submitting order"
        );

        let started = Instant::now();
        let in_flight = InFlight::new(self, Request::Create);
        let result = self.client.submit(&draft, token.as_deref()).await;
        in_flight.settle();
        metrics::histogram!("checkout_submission_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match result {
            Ok(confirmation) => {
                self.store
                    .dispatch(CheckoutAction::OrderCreateSuccess(confirmation.clone()));
                if let Err(e) = self.persistence.remove(keys::PAYMENT_METHOD) {
                    tracing::warn!(error = %e, "failed to clear stored payment method");
                }

                let mut session = self.session();
                session.step = CheckoutStep::Success;
                session.notice = None;

                metrics::counter!("checkout_orders_placed_total").increment(1);
                tracing::info!(order_id = %confirmation.order_id, "order placed");
                Ok(confirmation)
            }
            Err(e) => {
                let message = e.to_string();
                self.store
                    .dispatch(CheckoutAction::OrderCreateFail(message.clone()));

                let mut session = self.session();
                session.step = CheckoutStep::Failed;
                session.notice = Some(message);

                metrics::counter!("checkout_orders_failed_total", "kind" => e.kind())
                    .increment(1);
                tracing::warn!(error = %e, kind = e.kind(), "order submission failed");
                Err(CheckoutError::Submission(e))
            }
        }
    }

    /// Fetches a placed order into the order details slice.
    ///
    /// Independent of the checkout step; the step and notice are untouched.
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn order_details(&self, order_id: &OrderId) -> Result<OrderDetails> {
        let token = self.token();
        self.store.dispatch(CheckoutAction::OrderDetailsRequest);

        match self.client.fetch(order_id, token.as_deref()).await {
            Ok(order) => {
                self.store
                    .dispatch(CheckoutAction::OrderDetailsSuccess(order.clone()));
                Ok(order)
            }
            Err(e) => {
                self.store
                    .dispatch(CheckoutAction::OrderDetailsFail(e.to_string()));
                tracing::warn!(error = %e, kind = e.kind(), "failed to fetch order");
                Err(CheckoutError::PlacedOrder(e))
            }
        }
    }

    /// Pays a placed order with the processor's receipt.
    ///
    /// One payment is in flight at a time; a second call returns
    /// [`CheckoutError::PaymentInFlight`] without touching the backend. A
    /// receipt without a transaction ID is a validation error. The checkout
    /// step is untouched.
    #[tracing::instrument(skip(self, result), fields(session_id = %self.session_id))]
    pub async fn pay_order(
        &self,
        order_id: &OrderId,
        result: PaymentResult,
    ) -> Result<OrderDetails> {
        {
            let mut session = self.session();
            if session.paying {
                tracing::warn!("payment already in flight, ignoring");
                return Err(CheckoutError::PaymentInFlight);
            }
            if let Err(e) = result.validate() {
                return Err(Self::reject(&mut session, e));
            }
            session.paying = true;
        }

        let token = self.token();
        self.store.dispatch(CheckoutAction::OrderPayRequest);

        let in_flight = InFlight::new(self, Request::Payment);
        let outcome = self.client.pay(order_id, &result, token.as_deref()).await;
        in_flight.settle();
        self.session().paying = false;

        match outcome {
            Ok(order) => {
                self.store
                    .dispatch(CheckoutAction::OrderPaySuccess(order.clone()));
                metrics::counter!("checkout_payments_total").increment(1);
                Ok(order)
            }
            Err(e) => {
                self.store
                    .dispatch(CheckoutAction::OrderPayFail(e.to_string()));
                metrics::counter!("checkout_payments_failed_total", "kind" => e.kind())
                    .increment(1);
                tracing::warn!(error = %e, kind = e.kind(), "order payment failed");
                Err(CheckoutError::PlacedOrder(e))
            }
        }
    }

    fn token(&self) -> Option<String> {
        self.store
            .get_state()
            .user_login
            .token()
            .map(str::to_string)
    }

    /// Fails a request whose future was dropped mid-flight.
    fn abandon(&self, request: Request) {
        match request {
            Request::Create => {
                self.store.dispatch(CheckoutAction::OrderCreateFail(
                    NETWORK_ERROR_MESSAGE.to_string(),
                ));

                let mut session = self.session();
                session.step = CheckoutStep::Failed;
                session.notice = Some(NETWORK_ERROR_MESSAGE.to_string());
                metrics::counter!("checkout_orders_failed_total", "kind" => "cancelled")
                    .increment(1);
            }
            Request::Payment => {
                self.store.dispatch(CheckoutAction::OrderPayFail(
                    NETWORK_ERROR_MESSAGE.to_string(),
                ));

                self.session().paying = false;
                metrics::counter!("checkout_payments_failed_total", "kind" => "cancelled")
                    .increment(1);
            }
        }
        tracing::warn!(
            session_id = %self.session_id,
            ?request,
            "request cancelled before settling"
        );
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the session, refusing while a submission is in flight.
    fn unlocked_session(&self) -> Result<MutexGuard<'_, Session>> {
        let session = self.session();
        if session.step == CheckoutStep::Submitting {
            return Err(CheckoutError::SubmissionInFlight);
        }
        Ok(session)
    }

    fn reject(session: &mut Session, error: ValidationError) -> CheckoutError {
        tracing::info!(step = %session.step, %error, "validation failed");
        metrics::counter!("checkout_validation_failures_total").increment(1);
        session.notice = Some(error.to_string());
        CheckoutError::Validation(error)
    }
}

#[derive(Debug, Clone, Copy)]
enum Request {
    Create,
    Payment,
}

/// Marks a backend request in flight. Dropped unsettled, it fails the
/// request so the session never stays stuck in `Submitting` or paying.
struct InFlight<'a, S, B>
where
    S: KeyValueStore,
    B: OrderBackend,
{
    controller: &'a CheckoutController<S, B>,
    request: Request,
    settled: bool,
}

impl<'a, S, B> InFlight<'a, S, B>
where
    S: KeyValueStore,
    B: OrderBackend,
{
    fn new(controller: &'a CheckoutController<S, B>, request: Request) -> Self {
        Self {
            controller,
            request,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl<S, B> Drop for InFlight<'_, S, B>
where
    S: KeyValueStore,
    B: OrderBackend,
{
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abandon(self.request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryOrderBackend;
    use domain::{Money, OrderCreateState};
    use storage::{InMemoryStorage, StorageError};

    /// Storage that refuses every write.
    #[derive(Debug, Clone, Default)]
    struct ReadOnlyStorage(InMemoryStorage);

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, key: &str) -> storage::Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, _value: &str) -> storage::Result<()> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&self, key: &str) -> storage::Result<()> {
            self.0.remove(key)
        }

        fn keys(&self) -> storage::Result<Vec<String>> {
            self.0.keys()
        }
    }

    fn controller() -> CheckoutController<InMemoryStorage, InMemoryOrderBackend> {
        CheckoutController::hydrated(
            LocalPersistence::new(InMemoryStorage::new()),
            InMemoryOrderBackend::new(),
            PricingPolicy::default(),
        )
    }

    fn address() -> ShippingAddress {
        ShippingAddress::new("1 Main St", "Lagos", "100001", "NG")
    }

    #[test]
    fn test_starts_on_cart() {
        let c = controller();
        assert_eq!(c.step(), CheckoutStep::Cart);
        assert!(c.notice().is_none());
    }

    #[test]
    fn test_cart_to_shipping_is_unconditional() {
        let c = controller();
        assert_eq!(
            c.enter(CheckoutStep::Shipping).unwrap(),
            Navigation::Proceed(CheckoutStep::Shipping)
        );
    }

    #[test]
    fn test_payment_without_address_redirects() {
        let c = controller();
        let nav = c.enter(CheckoutStep::Payment).unwrap();

        assert_eq!(
            nav,
            Navigation::Redirect {
                to: CheckoutStep::Shipping,
                reason: ValidationError::MissingShippingAddress,
            }
        );
        assert_eq!(c.step(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_invalid_shipping_form_keeps_step() {
        let c = controller();
        c.enter(CheckoutStep::Shipping).unwrap();

        let err = c
            .submit_shipping(ShippingAddress::new("1 Main St", "", "100001", "NG"))
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(c.step(), CheckoutStep::Shipping);
        assert_eq!(c.notice().as_deref(), Some("Please provide a city"));
    }

    #[test]
    fn test_missing_payment_method_keeps_step() {
        let c = controller();
        c.submit_shipping(address()).unwrap();

        let err = c.submit_payment(None).unwrap_err();

        assert_eq!(err.to_string(), "Please select a payment method");
        assert_eq!(c.step(), CheckoutStep::Payment);
    }

    #[test]
    fn test_payment_preselection_order() {
        let c = controller();
        assert_eq!(c.payment_preselection(), PaymentMethod::PayPal);

        c.persistence
            .save(keys::PAYMENT_METHOD, &PaymentMethod::Stripe)
            .unwrap();
        assert_eq!(c.payment_preselection(), PaymentMethod::Stripe);

        c.store
            .dispatch(CheckoutAction::CartSavePaymentMethod(PaymentMethod::PayPal));
        assert_eq!(c.payment_preselection(), PaymentMethod::PayPal);
    }

    #[test]
    fn test_review_restores_stored_payment_method() {
        let c = controller();
        c.persistence
            .save(keys::PAYMENT_METHOD, &PaymentMethod::Stripe)
            .unwrap();

        c.enter(CheckoutStep::Review).unwrap();

        assert_eq!(
            c.store.get_state().cart.payment_method,
            Some(PaymentMethod::Stripe)
        );
    }

    #[test]
    fn test_cannot_navigate_to_outcome_steps() {
        let c = controller();
        for target in [
            CheckoutStep::Submitting,
            CheckoutStep::Success,
            CheckoutStep::Failed,
        ] {
            assert!(matches!(
                c.enter(target),
                Err(CheckoutError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_add_to_cart_rejects_overstock() {
        let c = controller();
        let item = CartItem::new("p1", "Shirt", Money::from_dollars(10), 5).with_stock(3);

        let err = c.add_to_cart(item).unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::InsufficientStock { .. })
        ));
        assert!(c.store.get_state().cart.is_empty());
    }

    #[test]
    fn test_add_to_cart_bounds_the_subtotal() {
        let c = controller();
        c.add_to_cart(CartItem::new("p1", "Yacht", Money::LIMIT, 1))
            .unwrap();

        let err = c
            .add_to_cart(CartItem::new("p2", "Dinghy", Money::from_dollars(1), 1))
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::AmountOutOfRange)
        ));
        assert_eq!(c.store.get_state().cart.cart_items.len(), 1);
        assert_eq!(c.summary().prices.items_price, Money::LIMIT);
    }

    #[test]
    fn test_add_to_cart_rejects_oversized_line() {
        let c = controller();
        let item = CartItem::new("p1", "Shirt", Money::from_cents(i64::MAX / 2), 1_000);

        assert!(matches!(
            c.add_to_cart(item),
            Err(CheckoutError::Validation(ValidationError::AmountOutOfRange))
        ));
        assert!(c.store.get_state().cart.is_empty());
    }

    #[test]
    fn test_payment_method_needs_a_successful_write() {
        let c = CheckoutController::hydrated(
            LocalPersistence::new(ReadOnlyStorage::default()),
            InMemoryOrderBackend::new(),
            PricingPolicy::default(),
        );
        c.submit_shipping(address()).unwrap();

        let err = c.submit_payment(Some(PaymentMethod::Stripe)).unwrap_err();

        assert!(matches!(err, CheckoutError::Storage(_)));
        assert_eq!(c.store.get_state().cart.payment_method, None);
        assert_eq!(c.step(), CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_place_order_checks_lines_before_submitting() {
        let c = controller();
        c.store.dispatch(CheckoutAction::CartAddItem(CartItem::new(
            "p1",
            "Shirt",
            Money::from_dollars(10),
            0,
        )));
        c.submit_shipping(address()).unwrap();
        c.submit_payment(Some(PaymentMethod::PayPal)).unwrap();

        let err = c.place_order().await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::InvalidQuantity { quantity: 0 })
        ));
        assert_eq!(c.step(), CheckoutStep::Review);
        assert_eq!(c.client().backend().call_count(), 0);
        assert_eq!(c.store.get_state().order_create, OrderCreateState::Idle);
    }

    #[test]
    fn test_remove_unknown_item() {
        let c = controller();
        let err = c.remove_from_cart(&ProductId::new("nope")).unwrap_err();
        assert!(matches!(err, CheckoutError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_place_order_requires_review() {
        let c = controller();
        let err = c.place_order().await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InvalidTransition {
                from: CheckoutStep::Cart,
                to: CheckoutStep::Submitting
            }
        ));
    }
}
