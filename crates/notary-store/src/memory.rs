use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::{validate_key, KeyValueStore};

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Values live behind a `RwLock` and are
/// cloned on read.
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently stored. A poisoned lock still reports the
    /// entries it holds.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of all keys.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.remove(key).is_some())
    }
}

impl std::fmt::Debug for InMemoryKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyValueStore")
            .field("key_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let store = InMemoryKeyValueStore::new();
        store.put("connection", "{}").unwrap();
        assert_eq!(store.get("connection").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_missing_is_none() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.get("timestamps").unwrap().is_none());
        assert!(!store.contains("timestamps").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn put_replaces_whole_value() {
        let store = InMemoryKeyValueStore::new();
        store.put("timestamps", "[1,2,3]").unwrap();
        store.put("timestamps", "[]").unwrap();
        assert_eq!(store.get("timestamps").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn remove_reports_existence() {
        let store = InMemoryKeyValueStore::new();
        store.put("connection", "x").unwrap();
        assert!(store.remove("connection").unwrap());
        assert!(!store.remove("connection").unwrap());
        assert!(store.get("connection").unwrap().is_none());
    }

    #[test]
    fn invalid_key_rejected() {
        let store = InMemoryKeyValueStore::new();
        assert!(matches!(
            store.put("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryKeyValueStore::new();
        store.put("timestamps", "[]").unwrap();
        store.put("connection", "{}").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["connection", "timestamps"]);
    }

    #[test]
    fn poisoned_lock_keeps_count_but_fails_access() {
        let store = InMemoryKeyValueStore::new();
        store.put("connection", "{}").unwrap();
        std::thread::scope(|s| {
            let writer = s.spawn(|| {
                let _guard = store.entries.write().unwrap();
                panic!("writer died holding the lock");
            });
            assert!(writer.join().is_err());
        });

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(matches!(
            store.get("connection"),
            Err(StoreError::LockPoisoned)
        ));
    }

    #[test]
    fn debug_shows_count() {
        let store = InMemoryKeyValueStore::new();
        store.put("a", "1").unwrap();
        assert!(format!("{store:?}").contains("key_count: 1"));
    }
}
