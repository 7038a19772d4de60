//! Integration tests for the checkout workflow.
//!
//! These drive a controller from cart to order confirmation against the
//! in-memory backend and check storage, state and backend calls.

use std::sync::Arc;
use std::time::Duration;

use checkout::{
    CheckoutController, CheckoutError, CheckoutStep, InMemoryOrderBackend, NETWORK_ERROR_MESSAGE,
    Navigation, SubmitError,
};
use common::OrderId;
use domain::{
    CartItem, Money, OrderCreateState, OrderDetailsState, OrderPayState, PaymentMethod,
    PaymentResult, PricingPolicy, ShippingAddress, UserInfo, ValidationError,
};
use persistence::keys;
use storage::{InMemoryStorage, KeyValueStore, LocalPersistence};

type TestController = CheckoutController<InMemoryStorage, InMemoryOrderBackend>;

struct TestHarness {
    controller: TestController,
    backend: InMemoryOrderBackend,
    storage: InMemoryStorage,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_storage(InMemoryStorage::new())
    }

    fn with_storage(storage: InMemoryStorage) -> Self {
        let backend = InMemoryOrderBackend::new();
        let controller = CheckoutController::hydrated(
            LocalPersistence::new(storage.clone()),
            backend.clone(),
            PricingPolicy::default(),
        );
        Self {
            controller,
            backend,
            storage,
        }
    }

    fn fill_cart(&self) {
        self.controller
            .add_to_cart(CartItem::new("p1", "Shirt", Money::from_dollars(50), 2).with_stock(10))
            .unwrap();
    }

    fn sign_in(&self) {
        self.controller.login(UserInfo {
            id: "u1".into(),
            name: "Ada".into(),
            token: "jwt-token".into(),
            ..UserInfo::default()
        });
    }

    /// Walks the session to Review with a full cart.
    fn ready_for_review(&self) {
        self.sign_in();
        self.fill_cart();
        self.controller.enter(CheckoutStep::Shipping).unwrap();
        self.controller
            .submit_shipping(ShippingAddress::new("1 Main St", "Lagos", "100001", "NG"))
            .unwrap();
        self.controller
            .submit_payment(Some(PaymentMethod::Stripe))
            .unwrap();
        assert_eq!(self.controller.step(), CheckoutStep::Review);
    }
}

mod happy_path {
    use super::*;

    #[tokio::test]
    async fn full_checkout_places_order() {
        let h = TestHarness::new();
        h.ready_for_review();

        let confirmation = h.controller.place_order().await.unwrap();

        assert_eq!(confirmation.order_id.as_str(), "ORD-0001");
        assert_eq!(h.controller.step(), CheckoutStep::Success);
        assert_eq!(h.backend.call_count(), 1);

        let call = &h.backend.calls()[0];
        assert_eq!(call.token.as_deref(), Some("jwt-token"));
        assert_eq!(call.draft.payment_method, Some(PaymentMethod::Stripe));
        assert_eq!(call.draft.prices.items_price, Money::from_dollars(100));
        assert_eq!(call.draft.prices.shipping_price, Money::from_dollars(10));
        assert_eq!(call.draft.prices.tax_price, Money::from_dollars(15));
        assert_eq!(call.draft.prices.total_price, Money::from_dollars(125));

        let state = h.controller.store().get_state();
        assert_eq!(
            state.order_create.order().map(|o| o.order_id.as_str()),
            Some("ORD-0001")
        );
    }

    #[tokio::test]
    async fn success_clears_stored_payment_method_only() {
        let h = TestHarness::new();
        h.ready_for_review();
        assert!(h.storage.contains(keys::PAYMENT_METHOD).unwrap());

        h.controller.place_order().await.unwrap();

        assert!(!h.storage.contains(keys::PAYMENT_METHOD).unwrap());
        assert!(h.storage.contains(keys::CART_ITEMS).unwrap());
        assert!(h.storage.contains(keys::SHIPPING_ADDRESS).unwrap());
    }

    #[tokio::test]
    async fn leaving_success_resets_order_status() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.controller.place_order().await.unwrap();

        h.controller.clear_cart().unwrap();
        h.controller.enter(CheckoutStep::Cart).unwrap();

        let state = h.controller.store().get_state();
        assert_eq!(state.order_create, OrderCreateState::Idle);
        assert!(state.cart.is_empty());
        assert_eq!(h.controller.step(), CheckoutStep::Cart);
    }
}

mod guards {
    use super::*;

    #[tokio::test]
    async fn empty_cart_never_reaches_network() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.controller.clear_cart().unwrap();

        let err = h.controller.place_order().await.unwrap_err();

        assert_eq!(err.to_string(), "Your cart is empty");
        assert_eq!(h.controller.notice().as_deref(), Some("Your cart is empty"));
        assert_eq!(h.controller.step(), CheckoutStep::Review);
        assert_eq!(h.backend.call_count(), 0);
        assert_eq!(
            h.controller.store().get_state().order_create,
            OrderCreateState::Idle
        );
    }

    #[tokio::test]
    async fn payment_guard_runs_before_cart_guard() {
        let h = TestHarness::new();
        h.controller.enter(CheckoutStep::Review).unwrap();

        let err = h.controller.place_order().await.unwrap_err();

        assert_eq!(err.to_string(), "Please select a payment method");
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn address_guard_runs_last() {
        let h = TestHarness::new();
        h.fill_cart();
        h.controller
            .submit_payment(Some(PaymentMethod::PayPal))
            .unwrap();

        let err = h.controller.place_order().await.unwrap_err();

        assert_eq!(err.to_string(), "Please provide a shipping address");
        assert_eq!(h.controller.step(), CheckoutStep::Review);
        assert_eq!(h.backend.call_count(), 0);
    }

    #[test]
    fn direct_payment_entry_without_address_redirects() {
        let h = TestHarness::new();
        h.fill_cart();

        let nav = h.controller.enter(CheckoutStep::Payment).unwrap();

        assert!(matches!(
            nav,
            Navigation::Redirect {
                to: CheckoutStep::Shipping,
                ..
            }
        ));
        assert_eq!(h.controller.step(), CheckoutStep::Shipping);
    }

    #[test]
    fn payment_entry_with_address_proceeds() {
        let h = TestHarness::new();
        h.controller
            .submit_shipping(ShippingAddress::new("1 Main St", "Lagos", "100001", "NG"))
            .unwrap();
        h.controller.enter(CheckoutStep::Cart).unwrap();

        let nav = h.controller.enter(CheckoutStep::Payment).unwrap();
        assert_eq!(nav, Navigation::Proceed(CheckoutStep::Payment));
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn double_submit_makes_one_network_call() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.backend.set_delay(Some(Duration::from_millis(50)));

        let (first, second) = tokio::join!(h.controller.place_order(), h.controller.place_order());

        assert!(first.is_ok());
        assert!(matches!(second, Err(CheckoutError::SubmissionInFlight)));
        assert_eq!(h.backend.call_count(), 1);
        assert_eq!(h.controller.step(), CheckoutStep::Success);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_tasks_share_one_submission() {
        let h = Arc::new(TestHarness::new());
        h.ready_for_review();
        h.backend.set_delay(Some(Duration::from_millis(100)));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let h = h.clone();
                tokio::spawn(async move { h.controller.place_order().await })
            })
            .collect();

        let mut placed = 0;
        let mut ignored = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => placed += 1,
                Err(CheckoutError::SubmissionInFlight) => ignored += 1,
                Err(CheckoutError::InvalidTransition { .. }) => ignored += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(placed, 1);
        assert_eq!(ignored, 7);
        assert_eq!(h.backend.call_count(), 1);
    }

    #[tokio::test]
    async fn navigation_refused_while_submitting() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.backend.set_delay(Some(Duration::from_millis(50)));

        let (placed, nav, add) = tokio::join!(h.controller.place_order(), async {
            h.controller.enter(CheckoutStep::Cart)
        }, async {
            h.controller
                .add_to_cart(CartItem::new("p2", "Mug", Money::from_dollars(5), 1))
        });

        assert!(placed.is_ok());
        assert!(matches!(nav, Err(CheckoutError::SubmissionInFlight)));
        assert!(matches!(add, Err(CheckoutError::SubmissionInFlight)));
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn server_message_is_surfaced_verbatim() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.backend.set_fail_with(Some(SubmitError::server(
            400,
            Some("Shirt is out of stock".into()),
        )));

        let err = h.controller.place_order().await.unwrap_err();

        assert_eq!(err.to_string(), "Shirt is out of stock");
        assert_eq!(h.controller.step(), CheckoutStep::Failed);
        assert_eq!(
            h.controller.notice().as_deref(),
            Some("Shirt is out of stock")
        );
        assert_eq!(
            h.controller.store().get_state().order_create.error(),
            Some("Shirt is out of stock")
        );
        assert!(h.storage.contains(keys::PAYMENT_METHOD).unwrap());
    }

    #[tokio::test]
    async fn retry_from_failed_uses_current_state() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.backend.set_fail_with(Some(SubmitError::network()));

        let err = h.controller.place_order().await.unwrap_err();
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert_eq!(h.backend.call_count(), 1);

        h.controller
            .add_to_cart(CartItem::new("p1", "Shirt", Money::from_dollars(50), 3))
            .unwrap();
        h.backend.set_fail_with(None);

        h.controller.place_order().await.unwrap();

        let calls = h.backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].draft.total_quantity(), 3);
        assert!(calls[1].draft.prices.shipping_price.is_zero());
        assert_eq!(h.controller.step(), CheckoutStep::Success);
    }

    #[tokio::test]
    async fn dropped_submission_fails_and_can_be_retried() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.backend.set_delay(Some(Duration::from_millis(200)));

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), h.controller.place_order()).await;
        assert!(timed_out.is_err());

        assert_eq!(h.controller.step(), CheckoutStep::Failed);
        assert_eq!(h.controller.notice().as_deref(), Some(NETWORK_ERROR_MESSAGE));
        assert_eq!(
            h.controller.store().get_state().order_create.error(),
            Some(NETWORK_ERROR_MESSAGE)
        );

        h.backend.set_delay(None);
        h.controller.place_order().await.unwrap();

        assert_eq!(h.backend.call_count(), 2);
        assert_eq!(h.controller.step(), CheckoutStep::Success);
    }

    #[tokio::test]
    async fn aborted_task_does_not_wedge_the_session() {
        let h = Arc::new(TestHarness::new());
        h.ready_for_review();
        h.backend.set_delay(Some(Duration::from_secs(5)));

        let task = {
            let h = h.clone();
            tokio::spawn(async move { h.controller.place_order().await })
        };
        while h.backend.call_count() == 0 {
            tokio::task::yield_now().await;
        }
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert_eq!(h.controller.step(), CheckoutStep::Failed);
        assert!(h.controller.enter(CheckoutStep::Review).is_ok());
    }

    #[tokio::test]
    async fn failed_then_back_to_review_resets_status() {
        let h = TestHarness::new();
        h.ready_for_review();
        h.backend.set_fail_with(Some(SubmitError::network()));
        let _ = h.controller.place_order().await;

        h.controller.enter(CheckoutStep::Review).unwrap();

        assert_eq!(h.controller.step(), CheckoutStep::Review);
        assert_eq!(
            h.controller.store().get_state().order_create,
            OrderCreateState::Idle
        );
    }
}

mod placed_orders {
    use super::*;

    fn receipt() -> PaymentResult {
        PaymentResult {
            email_address: "ada@example.com".into(),
            ..PaymentResult::new("PAY-1", "COMPLETED")
        }
    }

    #[tokio::test]
    async fn placed_order_can_be_fetched_and_paid() {
        let h = TestHarness::new();
        h.ready_for_review();
        let confirmation = h.controller.place_order().await.unwrap();

        let order = h
            .controller
            .order_details(&confirmation.order_id)
            .await
            .unwrap();
        assert_eq!(order.total_price, Some(Money::from_dollars(125)));
        assert!(!order.is_paid);

        let paid = h
            .controller
            .pay_order(&confirmation.order_id, receipt())
            .await
            .unwrap();
        assert!(paid.is_paid);
        assert_eq!(paid.payment_result, Some(receipt()));

        let state = h.controller.store().get_state();
        assert_eq!(state.order_details.order(), Some(&paid));
        assert_eq!(state.order_pay, OrderPayState::Paid { order: paid });
        assert_eq!(h.controller.step(), CheckoutStep::Success);
    }

    #[tokio::test]
    async fn unknown_order_fails_details_only() {
        let h = TestHarness::new();

        let err = h
            .controller
            .order_details(&OrderId::new("nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PlacedOrder(_)));
        assert_eq!(err.to_string(), "Order not found");
        let state = h.controller.store().get_state();
        assert_eq!(state.order_details.error(), Some("Order not found"));
        assert_eq!(state.order_create, OrderCreateState::Idle);
        assert_eq!(h.controller.step(), CheckoutStep::Cart);
    }

    #[tokio::test]
    async fn receipt_without_id_is_rejected_locally() {
        let h = TestHarness::new();
        h.ready_for_review();
        let confirmation = h.controller.place_order().await.unwrap();

        let err = h
            .controller
            .pay_order(&confirmation.order_id, PaymentResult::new("", "COMPLETED"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingPaymentReference)
        ));
        assert_eq!(
            h.controller.store().get_state().order_pay,
            OrderPayState::Idle
        );
        assert!(!h.backend.order(&confirmation.order_id).unwrap().is_paid);
    }

    #[tokio::test]
    async fn double_payment_makes_one_call() {
        let h = TestHarness::new();
        h.ready_for_review();
        let confirmation = h.controller.place_order().await.unwrap();
        h.backend.set_delay(Some(Duration::from_millis(50)));

        let (first, second) = tokio::join!(
            h.controller.pay_order(&confirmation.order_id, receipt()),
            h.controller.pay_order(&confirmation.order_id, receipt())
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(CheckoutError::PaymentInFlight)));
    }

    #[tokio::test]
    async fn dropped_payment_can_be_retried() {
        let h = TestHarness::new();
        h.ready_for_review();
        let confirmation = h.controller.place_order().await.unwrap();
        h.backend.set_delay(Some(Duration::from_millis(200)));

        let timed_out = tokio::time::timeout(
            Duration::from_millis(20),
            h.controller.pay_order(&confirmation.order_id, receipt()),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(
            h.controller.store().get_state().order_pay.error(),
            Some(NETWORK_ERROR_MESSAGE)
        );

        h.backend.set_delay(None);
        let paid = h
            .controller
            .pay_order(&confirmation.order_id, receipt())
            .await
            .unwrap();
        assert!(paid.is_paid);
    }

    #[tokio::test]
    async fn declined_payment_keeps_order_unpaid() {
        let h = TestHarness::new();
        h.ready_for_review();
        let confirmation = h.controller.place_order().await.unwrap();
        h.controller
            .order_details(&confirmation.order_id)
            .await
            .unwrap();
        h.backend.set_fail_with(Some(SubmitError::server(
            402,
            Some("Card declined".into()),
        )));

        let err = h
            .controller
            .pay_order(&confirmation.order_id, receipt())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Card declined");
        let state = h.controller.store().get_state();
        assert_eq!(state.order_pay.error(), Some("Card declined"));
        assert!(matches!(
            state.order_details,
            OrderDetailsState::Loaded { ref order } if !order.is_paid
        ));
    }
}

mod reload {
    use super::*;

    #[tokio::test]
    async fn restarted_session_resumes_review() {
        let storage = InMemoryStorage::new();
        {
            let h = TestHarness::with_storage(storage.clone());
            h.ready_for_review();
        }

        let h = TestHarness::with_storage(storage);
        assert_eq!(h.controller.step(), CheckoutStep::Cart);
        h.controller.enter(CheckoutStep::Review).unwrap();

        let confirmation = h.controller.place_order().await.unwrap();
        assert_eq!(confirmation.order_id.as_str(), "ORD-0001");
        assert_eq!(h.backend.calls()[0].token.as_deref(), Some("jwt-token"));
    }

    #[tokio::test]
    async fn invalid_stored_line_never_reaches_network() {
        let storage = InMemoryStorage::new();
        storage
            .set(
                keys::CART_ITEMS,
                r#"[{"product":"p1","name":"Shirt","price":10,"qty":0}]"#,
            )
            .unwrap();
        storage
            .set(
                keys::SHIPPING_ADDRESS,
                r#"{"address":"1 Main St","city":"Lagos","postalCode":"100001","country":"NG"}"#,
            )
            .unwrap();
        storage.set(keys::PAYMENT_METHOD, r#""PayPal""#).unwrap();

        let h = TestHarness::with_storage(storage);
        assert!(h.controller.store().get_state().cart.is_empty());
        h.controller.enter(CheckoutStep::Review).unwrap();

        let err = h.controller.place_order().await.unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(h.controller.step(), CheckoutStep::Review);
        assert_eq!(h.backend.call_count(), 0);
        assert_eq!(
            h.controller.store().get_state().order_create,
            OrderCreateState::Idle
        );
    }
}
