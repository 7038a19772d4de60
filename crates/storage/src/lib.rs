//! Local key-value storage for checkout state.
//!
//! - [`KeyValueStore`] is the raw string store, with an in-memory and a
//!   directory-backed implementation
//! - [`LocalPersistence`] layers typed JSON access on top and never fails a
//!   read: absent or malformed values fall back to a default

pub mod adapter;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use adapter::LocalPersistence;
pub use error::{Result, StorageError};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use store::{KeyValueStore, validate_key};
