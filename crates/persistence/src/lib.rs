//! Bridges checkout state and local storage.
//!
//! - [`keys`] names the storage keys shared with the storefront
//! - [`load_initial_state`] seeds a store from storage at startup
//! - [`StorageMirror`] writes state changes back, attached to a store through
//!   the [`StateObserver`] trait

pub mod hydrate;
pub mod keys;
pub mod mirror;
pub mod observer;

pub use hydrate::{load_initial_state, load_payment_method};
pub use mirror::StorageMirror;
pub use observer::{StateObserver, attach};
