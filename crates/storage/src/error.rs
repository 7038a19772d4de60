use thiserror::Error;

/// Errors that can occur when interacting with local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key contains characters the backends cannot store.
    #[error("Invalid storage key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// A filesystem error occurred while reading or writing a key.
    #[error("I/O error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The storage directory could not be prepared.
    #[error("Storage directory {path} unavailable: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
