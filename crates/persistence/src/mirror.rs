//! Writes checkout state back to storage.

use std::sync::{Mutex, PoisonError};

use domain::{CartItem, CheckoutState, ShippingAddress, UserInfo};
use storage::{KeyValueStore, LocalPersistence};

use crate::keys;
use crate::observer::StateObserver;

/// The fields mirrored to storage, as last written.
#[derive(Debug, Clone, Default, PartialEq)]
struct Mirrored {
    cart_items: Vec<CartItem>,
    shipping_address: ShippingAddress,
    user_info: Option<UserInfo>,
}

impl Mirrored {
    fn of(state: &CheckoutState) -> Self {
        Self {
            cart_items: state.cart.cart_items.clone(),
            shipping_address: state.cart.shipping_address.clone(),
            user_info: state.user_login.user_info.clone(),
        }
    }
}

/// Mirrors cart items, shipping address and user info to storage.
///
/// A key is written only when its value changed since the last successful
/// write; a failed write is retried on the next state. Logging out removes the
/// user key. The payment method is not mirrored here: the checkout controller
/// saves it on payment submission and clears it after a successful order.
pub struct StorageMirror<S: KeyValueStore> {
    persistence: LocalPersistence<S>,
    last: Mutex<Mirrored>,
}

impl<S: KeyValueStore> StorageMirror<S> {
    /// Creates a mirror that treats `initial` as already persisted.
    pub fn new(persistence: LocalPersistence<S>, initial: &CheckoutState) -> Self {
        Self {
            persistence,
            last: Mutex::new(Mirrored::of(initial)),
        }
    }

    /// Writes every changed field. Returns the number of keys touched.
    pub fn sync(&self, state: &CheckoutState) -> storage::Result<usize> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let mut touched = 0;

        if last.cart_items != state.cart.cart_items {
            self.persistence
                .save(keys::CART_ITEMS, &state.cart.cart_items)?;
            last.cart_items = state.cart.cart_items.clone();
            touched += 1;
        }

        if last.shipping_address != state.cart.shipping_address {
            self.persistence
                .save(keys::SHIPPING_ADDRESS, &state.cart.shipping_address)?;
            last.shipping_address = state.cart.shipping_address.clone();
            touched += 1;
        }

        if last.user_info != state.user_login.user_info {
            match &state.user_login.user_info {
                Some(user_info) => self.persistence.save(keys::USER_INFO, user_info)?,
                None => self.persistence.remove(keys::USER_INFO)?,
            }
            last.user_info = state.user_login.user_info.clone();
            touched += 1;
        }

        if touched > 0 {
            tracing::trace!(keys = touched, "mirrored checkout state");
        }

        Ok(touched)
    }
}

impl<S: KeyValueStore> StateObserver for StorageMirror<S> {
    fn name(&self) -> &'static str {
        "StorageMirror"
    }

    fn observe(&self, state: &CheckoutState) -> storage::Result<()> {
        self.sync(state).map(|_| ())
    }
}
