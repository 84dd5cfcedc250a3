use std::sync::Arc;

use notary_store::{read_json, write_json, KeyValueStore, StoreError};
use notary_types::{iso_timestamp, DigestHex, Principal, RecordId, TimestampRecord, ValidationError};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::LedgerResult;
use crate::TIMESTAMPS_KEY;

/// Lowest simulated ledger height handed out (inclusive).
pub const LEDGER_HEIGHT_MIN: u64 = 500_000;
/// Upper bound of simulated ledger heights (exclusive).
pub const LEDGER_HEIGHT_MAX: u64 = 1_500_000;

/// Append-only registry of notarization records.
///
/// Records keep insertion order and are never modified or removed. The full
/// sequence is written to the store under [`TIMESTAMPS_KEY`] after every
/// registration and read back wholesale on [`load_from_storage`].
///
/// Registering the same digest twice yields two independent records; lookups
/// by digest return the earliest.
///
/// [`load_from_storage`]: TimestampRegistry::load_from_storage
pub struct TimestampRegistry {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    registry_id: String,
    records: Vec<TimestampRecord>,
    persisted: bool,
}

impl TimestampRegistry {
    /// An empty registry that has not read the store yet.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        registry_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            registry_id: registry_id.into(),
            records: Vec::new(),
            persisted: true,
        }
    }

    /// Create a registry and load any persisted records.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        registry_id: impl Into<String>,
    ) -> Self {
        let mut registry = Self::new(store, clock, registry_id);
        registry.load_from_storage();
        registry
    }

    /// Register a digest on behalf of `identity`.
    ///
    /// The digest must already be in canonical lowercase form and the
    /// identity must be non-empty. The new record is appended and the whole
    /// registry persisted; a storage failure is logged and leaves the record
    /// in memory only (see [`is_persisted`](Self::is_persisted)).
    pub fn register(
        &mut self,
        digest: &str,
        identity: &str,
        filename: &str,
        filesize_bytes: u64,
    ) -> LedgerResult<TimestampRecord> {
        let principal = Principal::new(identity)?;
        let digest = DigestHex::parse(digest)?;
        if filename.trim().is_empty() {
            return Err(ValidationError::MissingFilename.into());
        }

        let now = self.clock.now();
        let record = TimestampRecord {
            id: RecordId::generate(now),
            digest,
            principal,
            filename: filename.to_owned(),
            filesize_bytes,
            created_at: iso_timestamp(now),
            ledger_height: rand::thread_rng().gen_range(LEDGER_HEIGHT_MIN..LEDGER_HEIGHT_MAX),
            registry_id: self.registry_id.clone(),
        };

        self.records.push(record.clone());
        info!(
            id = %record.id,
            digest = %record.digest.short_hex(),
            height = record.ledger_height,
            "timestamp registered"
        );

        if let Err(e) = self.persist_to_storage() {
            warn!(error = %e, "failed to persist registry; record kept in memory");
        }
        Ok(record)
    }

    /// First record, in insertion order, whose digest equals `digest`.
    ///
    /// Comparison is exact and case-sensitive. Normalize user input with
    /// [`notary_types::validate_digest`] first.
    pub fn find_by_digest(&self, digest: &str) -> Option<&TimestampRecord> {
        self.records.iter().find(|r| r.digest.as_str() == digest)
    }

    /// Every record for `digest`, in insertion order.
    pub fn find_all_by_digest(&self, digest: &str) -> Vec<&TimestampRecord> {
        self.records
            .iter()
            .filter(|r| r.digest.as_str() == digest)
            .collect()
    }

    /// Record with exactly this id.
    pub fn find_by_id(&self, id: &str) -> Option<&TimestampRecord> {
        self.records.iter().find(|r| r.id.as_str() == id)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[TimestampRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifier stamped on every record this registry creates.
    pub fn registry_id(&self) -> &str {
        &self.registry_id
    }

    /// `false` if the last persist attempt failed.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Write the full record sequence to the store.
    pub fn persist_to_storage(&mut self) -> LedgerResult<()> {
        let result = write_json(self.store.as_ref(), TIMESTAMPS_KEY, &self.records);
        self.persisted = result.is_ok();
        result?;
        debug!(records = self.records.len(), "registry persisted");
        Ok(())
    }

    /// Replace the in-memory sequence with the persisted one.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty registry;
    /// the cause is logged. Returns the number of records loaded.
    pub fn load_from_storage(&mut self) -> usize {
        self.records = match read_json::<Vec<TimestampRecord>>(self.store.as_ref(), TIMESTAMPS_KEY)
        {
            Ok(Some(records)) => records,
            Ok(None) => Vec::new(),
            Err(StoreError::Serialization { reason, .. }) => {
                warn!(reason = %reason, "persisted registry is malformed; starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted registry; starting empty");
                Vec::new()
            }
        };
        debug!(records = self.records.len(), "registry loaded");
        self.records.len()
    }
}

impl std::fmt::Debug for TimestampRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampRegistry")
            .field("registry_id", &self.registry_id)
            .field("records", &self.records.len())
            .field("persisted", &self.persisted)
            .finish()
    }
}
