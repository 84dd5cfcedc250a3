use std::sync::Arc;

use notary_store::{read_json, write_json, KeyValueStore, StoreError};
use notary_types::Principal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::CONNECTION_KEY;

/// Connection state of the simulated identity.
///
/// `connected` is derived from the presence of a principal, so the two can
/// never disagree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    principal: Option<Principal>,
}

impl SessionState {
    pub fn connected(&self) -> bool {
        self.principal.is_some()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

/// Persisted form of an active connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub principal: Principal,
    /// Connection time in milliseconds since the UNIX epoch.
    pub timestamp: i64,
}

/// Owns the connect/disconnect lifecycle and its persisted entry.
///
/// Storage failures never block a transition: they are logged and the
/// session carries on in memory.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    state: SessionState,
}

impl SessionManager {
    /// A disconnected session. Call [`restore`](Self::restore) to pick up a
    /// persisted connection.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.connected()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.state.principal()
    }

    /// Connect with a freshly generated mock principal.
    pub fn connect(&mut self) -> Principal {
        self.connect_as(Principal::mock())
    }

    /// Connect as the given principal and persist the connection.
    pub fn connect_as(&mut self, principal: Principal) -> Principal {
        if let Some(previous) = &self.state.principal {
            debug!(previous = %previous.short_id(), "replacing active principal");
        }
        let entry = ConnectionEntry {
            principal: principal.clone(),
            timestamp: self.clock.now().timestamp_millis(),
        };
        if let Err(e) = write_json(self.store.as_ref(), CONNECTION_KEY, &entry) {
            warn!(error = %e, "failed to persist connection; continuing in memory");
        }
        info!(principal = %principal.short_id(), "connected");
        self.state.principal = Some(principal.clone());
        principal
    }

    /// Drop the active principal and its persisted entry.
    ///
    /// Returns the principal that was connected, if any.
    pub fn disconnect(&mut self) -> Option<Principal> {
        let previous = self.state.principal.take();
        if let Err(e) = self.store.remove(CONNECTION_KEY) {
            warn!(error = %e, "failed to remove persisted connection");
        }
        if let Some(p) = &previous {
            info!(principal = %p.short_id(), "disconnected");
        }
        previous
    }

    /// Re-enter the connected state from a persisted entry, if one exists.
    ///
    /// The stored principal is trusted as-is. A malformed entry is logged and
    /// ignored, leaving the session disconnected.
    pub fn restore(&mut self) -> Option<&Principal> {
        match read_json::<ConnectionEntry>(self.store.as_ref(), CONNECTION_KEY) {
            Ok(Some(entry)) => {
                debug!(principal = %entry.principal.short_id(), since = entry.timestamp, "session restored");
                self.state.principal = Some(entry.principal);
            }
            Ok(None) => {}
            Err(StoreError::Serialization { reason, .. }) => {
                warn!(reason = %reason, "ignoring malformed persisted connection");
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted connection");
            }
        }
        self.state.principal()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use notary_store::{InMemoryKeyValueStore, StoreResult};

    fn setup() -> (Arc<InMemoryKeyValueStore>, SessionManager) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let session = SessionManager::new(store.clone(), clock);
        (store, session)
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn put(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn remove(&self, _key: &str) -> StoreResult<bool> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn starts_disconnected() {
        let (_, session) = setup();
        assert!(!session.is_connected());
        assert!(session.principal().is_none());
        assert_eq!(session.state(), &SessionState::default());
    }

    #[test]
    fn connect_sets_principal_and_persists() {
        let (store, mut session) = setup();
        let p = session.connect();
        assert!(session.is_connected());
        assert_eq!(session.principal(), Some(&p));

        let entry: ConnectionEntry = read_json(store.as_ref(), CONNECTION_KEY).unwrap().unwrap();
        assert_eq!(entry.principal, p);
        assert_eq!(entry.timestamp, 1_714_564_800_000);
    }

    #[test]
    fn persisted_entry_uses_wire_field_names() {
        let (store, mut session) = setup();
        session.connect_as(Principal::new("p1").unwrap());
        let raw = store.get(CONNECTION_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["principal"], "p1");
        assert_eq!(value["timestamp"], 1_714_564_800_000i64);
    }

    #[test]
    fn connect_then_disconnect_restores_initial_state() {
        let (store, mut session) = setup();
        let p = session.connect();
        assert_eq!(session.disconnect(), Some(p));
        assert_eq!(session.state(), &SessionState::default());
        assert!(store.get(CONNECTION_KEY).unwrap().is_none());
    }

    #[test]
    fn disconnect_when_idle_is_harmless() {
        let (_, mut session) = setup();
        assert_eq!(session.disconnect(), None);
        assert!(!session.is_connected());
    }

    #[test]
    fn restore_picks_up_persisted_connection() {
        let (store, mut session) = setup();
        let p = session.connect();

        let clock = Arc::new(FixedClock::new(Utc::now()));
        let mut fresh = SessionManager::new(store.clone(), clock);
        assert!(!fresh.is_connected());
        assert_eq!(fresh.restore(), Some(&p));
        assert!(fresh.is_connected());
    }

    #[test]
    fn restore_without_entry_stays_disconnected() {
        let (_, mut session) = setup();
        assert!(session.restore().is_none());
        assert!(!session.is_connected());
    }

    #[test]
    fn restore_ignores_malformed_entry() {
        let (store, mut session) = setup();
        store.put(CONNECTION_KEY, "{\"principal\":").unwrap();
        assert!(session.restore().is_none());
        store.put(CONNECTION_KEY, r#"{"principal":"","timestamp":1}"#).unwrap();
        assert!(session.restore().is_none());
    }

    #[test]
    fn storage_failures_do_not_block_transitions() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let mut session = SessionManager::new(Arc::new(BrokenStore), clock);
        assert!(session.restore().is_none());
        let p = session.connect();
        assert_eq!(session.principal(), Some(&p));
        assert_eq!(session.disconnect(), Some(p));
        assert!(!session.is_connected());
    }
}
