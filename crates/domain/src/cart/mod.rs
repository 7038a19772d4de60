//! Cart, order draft, and checkout state.

mod actions;
mod draft;
mod order;
mod pricing;
mod state;
mod value_objects;

pub use actions::CheckoutAction;
pub use draft::{OrderConfirmation, OrderDraft};
pub use order::{OrderDetails, PaymentResult};
pub use pricing::{PriceBreakdown, PricingPolicy};
pub use state::{
    CartState, CheckoutState, OrderCreateState, OrderDetailsState, OrderPayState, UserLoginState,
};
pub use value_objects::{CartItem, Money, PaymentMethod, ShippingAddress, UserInfo};
