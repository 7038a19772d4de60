use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{KeyValueStore, Result};

/// Typed JSON access to a [`KeyValueStore`].
///
/// Reads never fail: an absent key, an unreadable backend or a value that does
/// not parse as `T` all yield the fallback, and the fault is logged.
#[derive(Debug, Clone)]
pub struct LocalPersistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LocalPersistence<S> {
    /// Wraps a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads `key` as `T`, falling back to `T::default()`.
    pub fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.load_opt(key).unwrap_or_default()
    }

    /// Loads `key` as `T`, or `None` when absent or malformed.
    pub fn load_opt<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.load_with(key, |raw| serde_json::from_str(raw).ok())
    }

    /// Loads `key` with a custom parser over the raw stored text.
    ///
    /// The parser returns `None` to reject the value.
    pub fn load_with<T, F>(&self, key: &str, parse: F) -> Option<T>
    where
        F: FnOnce(&str) -> Option<T>,
    {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value, using default");
                return None;
            }
        };

        let parsed = parse(&raw);
        if parsed.is_none() {
            tracing::warn!(key, "stored value is malformed, using default");
        }
        parsed
    }

    /// Serializes `value` as JSON and stores it under `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    /// Removes `key`.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key)
    }

    /// Returns true if a value is stored under `key`. Read faults count as absent.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key).unwrap_or(false)
    }
}
