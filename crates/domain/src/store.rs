//! Observable state container.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::reducer::{Action, Slice};

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Holds the current state and applies dispatched actions to it.
///
/// Every dispatch runs the slice reducer and then notifies each listener with
/// the new state. Dispatches are serialized, so listeners observe states in
/// dispatch order. Listeners run outside the state lock and may read the
/// store, but must not dispatch from inside the callback.
pub struct Store<S: Slice> {
    state: RwLock<Arc<S>>,
    listeners: RwLock<Vec<(SubscriptionId, Listener<S>)>>,
    next_id: AtomicU64,
    dispatch_lock: Mutex<()>,
}

impl<S: Slice> Store<S> {
    /// Creates a store seeded with `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            state: RwLock::new(Arc::new(initial)),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            dispatch_lock: Mutex::new(()),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn get_state(&self) -> Arc<S> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `action` and notifies listeners.
    pub fn dispatch(&self, action: S::Action) {
        let _serial = self
            .dispatch_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let next = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = Arc::new(state.reduce(&action));
            *state = next.clone();
            next
        };

        tracing::trace!(action = action.action_type(), "dispatched");

        let listeners: Vec<Listener<S>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(&next);
        }
    }

    /// Registers a listener called after every dispatch.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<S: Slice> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Slice + fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.get_state())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
