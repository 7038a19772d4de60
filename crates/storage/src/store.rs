use std::sync::Arc;

use crate::{Result, StorageError};

/// Core trait for local key-value storage.
///
/// Values are opaque strings; callers decide the encoding (JSON for every
/// checkout key). Operations are synchronous so a state-container listener can
/// mirror changes without an executor. Implementations must be thread-safe.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Lists the stored keys in ascending order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Returns true if a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

/// Validates a key before it reaches a backend.
///
/// Keys double as file names for [`crate::FileStorage`], so they are limited to
/// ASCII alphanumerics, `-` and `_`.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty",
        });
    }

    if key.len() > 128 {
        return Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason: "key must be at most 128 bytes",
        });
    }

    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason: "key may only contain ASCII letters, digits, '-' and '_'",
        });
    }

    Ok(())
}
