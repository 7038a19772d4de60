//! Storage keys shared with the storefront.

/// JSON array of cart lines.
pub const CART_ITEMS: &str = "cartItems";

/// JSON object with the shipping form fields.
pub const SHIPPING_ADDRESS: &str = "shippingAddress";

/// JSON string naming the selected payment method.
pub const PAYMENT_METHOD: &str = "paymentMethod";

/// JSON object for the signed-in user, including the bearer token.
pub const USER_INFO: &str = "userInfo";

/// Every key the checkout reads or writes.
pub const ALL: [&str; 4] = [CART_ITEMS, SHIPPING_ADDRESS, PAYMENT_METHOD, USER_INFO];
