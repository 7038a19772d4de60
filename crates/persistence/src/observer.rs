//! State observers attached to the checkout store.

use std::sync::Arc;

use domain::{CheckoutState, Store, SubscriptionId};

/// Reacts to every new checkout state.
///
/// Observers carry the side effects reducers must not have, such as writing
/// state back to storage.
pub trait StateObserver: Send + Sync {
    /// Returns the name of this observer.
    fn name(&self) -> &'static str;

    /// Handles a new state.
    fn observe(&self, state: &CheckoutState) -> storage::Result<()>;
}

/// Subscribes `observer` to `store`.
///
/// Observer failures are logged and counted; they never reach the dispatcher.
pub fn attach<O>(store: &Store<CheckoutState>, observer: Arc<O>) -> SubscriptionId
where
    O: StateObserver + 'static,
{
    tracing::debug!(observer = observer.name(), "attaching state observer");

    store.subscribe(move |state: &CheckoutState| {
        if let Err(e) = observer.observe(state) {
            tracing::warn!(observer = observer.name(), error = %e, "state observer failed");
            metrics::counter!("checkout_storage_write_failures_total").increment(1);
        }
    })
}
