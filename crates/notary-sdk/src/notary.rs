use std::path::Path;
use std::sync::Arc;

use notary_crypto::DigestComputer;
use notary_ledger::{
    Clock, NetworkDelay, NoDelay, SessionManager, SimulatedCall, SystemClock, TimestampRegistry,
};
use notary_store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
use notary_types::{validate_digest, DigestHex, Principal, TimestampRecord};
use tracing::{debug, info};

use crate::config::NotaryConfig;
use crate::error::{SdkError, SdkResult};

/// The file currently staged for notarization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub filename: String,
    pub filesize_bytes: u64,
    pub digest: DigestHex,
}

/// Digital notary application state.
///
/// Owns the session, the registry and the current file selection. Front ends
/// hold one `Notary` and call into it; nothing lives in globals.
pub struct Notary {
    config: NotaryConfig,
    session: SessionManager,
    registry: TimestampRegistry,
    digests: DigestComputer,
    delay: Arc<dyn NetworkDelay>,
    selection: Option<SelectedFile>,
}

impl Notary {
    /// Open the notary persisted under `config.data_dir`, with real time and
    /// the configured simulated delays.
    pub fn open(config: NotaryConfig) -> SdkResult<Self> {
        let store = Arc::new(FileKeyValueStore::open(&config.data_dir)?);
        let delay = Arc::new(config.delay());
        Ok(Self::with_parts(config, store, Arc::new(SystemClock), delay))
    }

    /// A throwaway notary backed by memory, without delays.
    pub fn in_memory() -> Self {
        Self::with_parts(
            NotaryConfig::default(),
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(SystemClock),
            Arc::new(NoDelay),
        )
    }

    /// Assemble a notary from explicit parts, restoring any persisted session
    /// and registry from `store`.
    pub fn with_parts(
        config: NotaryConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        delay: Arc<dyn NetworkDelay>,
    ) -> Self {
        let mut session = SessionManager::new(store.clone(), clock.clone());
        session.restore();
        let registry = TimestampRegistry::open(store, clock, config.registry_id.clone());
        debug!(
            connected = session.is_connected(),
            records = registry.len(),
            "notary opened"
        );
        Self {
            config,
            session,
            registry,
            digests: DigestComputer::new(),
            delay,
            selection: None,
        }
    }

    pub fn config(&self) -> &NotaryConfig {
        &self.config
    }

    // ---- Session ----

    /// Sign in with a new mock principal after the simulated sign-in delay.
    pub async fn connect(&mut self) -> Principal {
        self.delay.wait(SimulatedCall::Connect).await;
        self.session.connect()
    }

    pub fn disconnect(&mut self) -> Option<Principal> {
        self.session.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.session.principal()
    }

    // ---- File selection ----

    /// Stage in-memory content for notarization.
    pub fn select_file(&mut self, filename: &str, data: &[u8]) -> &SelectedFile {
        let selected = SelectedFile {
            filename: filename.to_owned(),
            filesize_bytes: data.len() as u64,
            digest: self.digests.digest(data),
        };
        self.stage(selected)
    }

    /// Stage a file from disk. The selection is left untouched on failure.
    pub fn select_path(&mut self, path: &Path) -> SdkResult<&SelectedFile> {
        let (digest, filesize_bytes) = self.digests.digest_file(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.stage(SelectedFile {
            filename,
            filesize_bytes,
            digest,
        }))
    }

    fn stage(&mut self, selected: SelectedFile) -> &SelectedFile {
        debug!(file = %selected.filename, digest = %selected.digest.short_hex(), "file selected");
        self.selection.insert(selected)
    }

    pub fn selection(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) -> Option<SelectedFile> {
        self.selection.take()
    }

    /// Registration needs both an active session and a selected file.
    pub fn can_register(&self) -> bool {
        self.session.is_connected() && self.selection.is_some()
    }

    // ---- Registry ----

    /// Register the selected file under the active principal.
    ///
    /// Preconditions are checked before the simulated ledger call, so a
    /// rejected request never waits.
    pub async fn stamp(&mut self) -> SdkResult<TimestampRecord> {
        let principal = self
            .session
            .principal()
            .cloned()
            .ok_or(SdkError::NotConnected)?;
        let selected = self.selection.clone().ok_or(SdkError::NoFileSelected)?;

        self.delay.wait(SimulatedCall::Register).await;
        let record = self.registry.register(
            selected.digest.as_str(),
            principal.as_str(),
            &selected.filename,
            selected.filesize_bytes,
        )?;
        info!(id = %record.id, file = %record.filename, "file notarized");
        Ok(record)
    }

    /// Look up the earliest record for a user-supplied digest.
    ///
    /// The input is trimmed and case-folded; malformed input is rejected
    /// before the simulated ledger call.
    pub async fn verify(&self, input: &str) -> SdkResult<Option<TimestampRecord>> {
        let digest = validate_digest(input)?;
        self.verify_digest(&digest).await
    }

    /// Digest a file and look up the earliest record for it.
    pub async fn verify_path(&self, path: &Path) -> SdkResult<Option<TimestampRecord>> {
        let (digest, _) = self.digests.digest_file(path)?;
        self.verify_digest(&digest).await
    }

    async fn verify_digest(&self, digest: &DigestHex) -> SdkResult<Option<TimestampRecord>> {
        self.delay.wait(SimulatedCall::Verify).await;
        let found = self.registry.find_by_digest(digest.as_str()).cloned();
        debug!(digest = %digest.short_hex(), found = found.is_some(), "verification");
        Ok(found)
    }

    /// Every record registered for a digest, oldest first.
    pub fn history(&self, input: &str) -> SdkResult<Vec<TimestampRecord>> {
        let digest = validate_digest(input)?;
        Ok(self
            .registry
            .find_all_by_digest(digest.as_str())
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn record(&self, id: &str) -> Option<&TimestampRecord> {
        self.registry.find_by_id(id)
    }

    pub fn records(&self) -> &[TimestampRecord] {
        self.registry.records()
    }

    /// Record a certificate for `id` would cover.
    ///
    /// Certificate documents are not produced; callers get the record back
    /// and decide how to report that.
    pub fn certificate(&self, id: &str) -> SdkResult<&TimestampRecord> {
        self.registry
            .find_by_id(id)
            .ok_or_else(|| SdkError::RecordNotFound(id.to_owned()))
    }

    /// `false` if the registry could not be written on the last attempt.
    pub fn is_persisted(&self) -> bool {
        self.registry.is_persisted()
    }
}

impl std::fmt::Debug for Notary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notary")
            .field("session", &self.session)
            .field("registry", &self.registry)
            .field("selection", &self.selection)
            .finish()
    }
}
