//! Order backend trait with in-memory and HTTP implementations.

pub mod http;
pub mod orders;

pub use http::HttpOrderBackend;
pub use orders::{InMemoryOrderBackend, OrderBackend, RecordedCall};
