use crate::error::{StoreError, StoreResult};

/// String-keyed, string-valued persistent store.
///
/// All implementations must satisfy these invariants:
/// - `put` replaces any previous value for the key in full.
/// - `get` after a successful `put` returns exactly the value written.
/// - Keys are validated with [`validate_key`] before any access.
/// - All I/O errors are propagated, never silently ignored.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write (create or replace) the value stored under `key`.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Check whether `key` exists.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Reject keys that could escape a directory or collide after encoding.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
