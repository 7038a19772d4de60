//! Identifier types shared by every crate in the checkout workspace.

mod ids;

pub use ids::{OrderId, ProductId, SessionId};
