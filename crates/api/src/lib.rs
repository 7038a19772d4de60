//! Headless HTTP service for the storefront checkout.
//!
//! Exposes one checkout session over REST, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use checkout::{CheckoutController, HttpOrderBackend, OrderBackend};
use domain::PricingPolicy;
use metrics_exporter_prometheus::PrometheusHandle;
use storage::{FileStorage, InMemoryStorage, KeyValueStore, LocalPersistence};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use error::StartupError;
use routes::checkout::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/checkout", get(routes::checkout::summary))
        .route(
            "/checkout/cart",
            post(routes::checkout::add_item).delete(routes::checkout::clear_cart),
        )
        .route(
            "/checkout/cart/{product_id}",
            delete(routes::checkout::remove_item),
        )
        .route("/checkout/steps/{step}", post(routes::checkout::enter_step))
        .route("/checkout/shipping", put(routes::checkout::submit_shipping))
        .route(
            "/checkout/payment",
            get(routes::checkout::payment_options).put(routes::checkout::submit_payment),
        )
        .route("/checkout/order", post(routes::checkout::place_order))
        .route(
            "/checkout/order/{order_id}",
            get(routes::checkout::order_details),
        )
        .route(
            "/checkout/order/{order_id}/pay",
            put(routes::checkout::pay_order),
        )
        .route(
            "/checkout/session",
            put(routes::checkout::login).delete(routes::checkout::logout),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Registers help text for the checkout metrics with the installed recorder.
pub fn describe_metrics() {
    metrics::describe_counter!("checkout_orders_placed_total", "Orders accepted by the backend");
    metrics::describe_counter!(
        "checkout_orders_failed_total",
        "Order submissions that failed, by kind"
    );
    metrics::describe_counter!(
        "checkout_submissions_ignored_total",
        "Place-order requests ignored while a submission was in flight"
    );
    metrics::describe_counter!(
        "checkout_validation_failures_total",
        "Requests rejected by a checkout guard"
    );
    metrics::describe_counter!(
        "checkout_storage_write_failures_total",
        "State changes that could not be written to storage"
    );
    metrics::describe_counter!("checkout_payments_total", "Order payments the backend recorded");
    metrics::describe_counter!(
        "checkout_payments_failed_total",
        "Order payments that failed, by kind"
    );
    metrics::describe_histogram!(
        "checkout_submission_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent waiting for the order backend"
    );
}

/// Creates the application state over the given storage and order backend.
///
/// The session is hydrated from `store` and mirrored back to it.
pub fn create_state(
    store: Arc<dyn KeyValueStore>,
    backend: Arc<dyn OrderBackend>,
    policy: PricingPolicy,
) -> Arc<AppState> {
    let controller = CheckoutController::hydrated(LocalPersistence::new(store), backend, policy);
    Arc::new(AppState { controller })
}

/// Creates the application state from configuration: file storage when
/// `storage_dir` is set, memory otherwise, and the HTTP order backend.
pub fn create_state_from_config(config: &Config) -> Result<Arc<AppState>, StartupError> {
    let store: Arc<dyn KeyValueStore> = match &config.storage_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using file storage");
            Arc::new(FileStorage::open(dir)?)
        }
        None => {
            tracing::info!("using in-memory storage");
            Arc::new(InMemoryStorage::new())
        }
    };

    let backend = HttpOrderBackend::new(&config.api_url, config.request_timeout)?;
    tracing::info!(orders_url = %backend.orders_url(), "order backend configured");

    Ok(create_state(
        store,
        Arc::new(backend),
        PricingPolicy::default(),
    ))
}
