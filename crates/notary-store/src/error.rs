/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Keys are limited to ASCII letters, digits, `_` and `-`.
    #[error("invalid key {0:?}")]
    InvalidKey(String),

    /// Serialization or deserialization failure.
    #[error("serialization error for key {key}: {reason}")]
    Serialization { key: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
