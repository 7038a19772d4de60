//! Seeding checkout state from storage at startup.

use domain::{
    CartItem, CartState, CheckoutState, PaymentMethod, ShippingAddress, UserInfo, UserLoginState,
};
use storage::{KeyValueStore, LocalPersistence};

use crate::keys;

/// Builds the initial checkout state from persisted values.
///
/// Absent or malformed values fall back to an empty cart, an empty address,
/// no payment method, and no user. Stored lines that fail validation are
/// dropped. Order creation always starts idle.
#[tracing::instrument(skip(persistence))]
pub fn load_initial_state<S: KeyValueStore>(persistence: &LocalPersistence<S>) -> CheckoutState {
    let cart_items = valid_lines(persistence.load(keys::CART_ITEMS));
    let shipping_address: ShippingAddress = persistence.load(keys::SHIPPING_ADDRESS);
    let payment_method = load_payment_method(persistence);
    let user_info: Option<UserInfo> = persistence.load_opt(keys::USER_INFO);

    tracing::debug!(
        items = cart_items.len(),
        has_address = shipping_address.is_present(),
        payment_method = ?payment_method,
        signed_in = user_info.is_some(),
        "loaded checkout state"
    );

    CheckoutState {
        cart: CartState {
            cart_items,
            shipping_address,
            payment_method,
        },
        user_login: UserLoginState { user_info },
        ..CheckoutState::default()
    }
}

/// Drops stored lines that would fail checkout validation.
fn valid_lines(items: Vec<CartItem>) -> Vec<CartItem> {
    items
        .into_iter()
        .filter(|item| match item.validate() {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(product_id = %item.product_id, %error, "dropping stored cart line");
                false
            }
        })
        .collect()
}

/// Reads the stored payment method.
///
/// Accepts a JSON string (`"PayPal"`) or bare text (`PayPal`), in any case.
pub fn load_payment_method<S: KeyValueStore>(
    persistence: &LocalPersistence<S>,
) -> Option<PaymentMethod> {
    persistence.load_with(keys::PAYMENT_METHOD, |raw| {
        match serde_json::from_str::<String>(raw) {
            Ok(name) => name.parse().ok(),
            Err(_) => raw.parse().ok(),
        }
    })
}
