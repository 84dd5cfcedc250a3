//! Typed JSON access on top of a [`KeyValueStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Read and decode the JSON value stored under `key`.
///
/// Returns `Ok(None)` if the key is absent, and
/// [`StoreError::Serialization`] if the stored text does not decode as `T`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match store.get(key)? {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Serialization {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let text = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
        key: key.to_owned(),
        reason: e.to_string(),
    })?;
    store.put(key, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKeyValueStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        principal: String,
        timestamp: i64,
    }

    #[test]
    fn roundtrip() {
        let store = InMemoryKeyValueStore::new();
        let entry = Entry {
            principal: "p1".into(),
            timestamp: 42,
        };
        write_json(&store, "connection", &entry).unwrap();
        let back: Option<Entry> = read_json(&store, "connection").unwrap();
        assert_eq!(back, Some(entry));
    }

    #[test]
    fn absent_key_is_none() {
        let store = InMemoryKeyValueStore::new();
        let back: Option<Entry> = read_json(&store, "connection").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn malformed_value_is_serialization_error() {
        let store = InMemoryKeyValueStore::new();
        store.put("connection", "{not json").unwrap();
        let err = read_json::<Entry>(&store, "connection").unwrap_err();
        assert!(matches!(err, StoreError::Serialization { ref key, .. } if key == "connection"));
    }
}
