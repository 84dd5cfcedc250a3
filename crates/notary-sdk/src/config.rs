use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notary_ledger::{FixedDelay, DEFAULT_REGISTRY_ID};
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Configuration for a [`Notary`](crate::Notary).
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotaryConfig {
    /// Directory holding the persisted key-value state.
    pub data_dir: PathBuf,
    /// Identifier stamped on every record as the ledger container.
    pub registry_id: String,
    /// Label of the simulated network, shown in status output.
    pub network: String,
    /// Simulated sign-in latency.
    pub connect_delay_ms: u64,
    /// Simulated registration latency.
    pub register_delay_ms: u64,
    /// Simulated verification latency.
    pub verify_delay_ms: u64,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".notary"),
            registry_id: DEFAULT_REGISTRY_ID.into(),
            network: "local".into(),
            connect_delay_ms: 2000,
            register_delay_ms: 3000,
            verify_delay_ms: 2000,
        }
    }
}

impl NotaryConfig {
    /// File name looked up inside the data directory.
    pub const FILE_NAME: &'static str = "notary.toml";

    /// Load a TOML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SdkError::Config(format!("{}: {e}", path.display()))),
        }
    }

    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Same configuration with every simulated delay removed.
    pub fn instant(self) -> Self {
        Self {
            connect_delay_ms: 0,
            register_delay_ms: 0,
            verify_delay_ms: 0,
            ..self
        }
    }

    /// Delay policy described by this configuration.
    pub fn delay(&self) -> FixedDelay {
        FixedDelay {
            connect: Duration::from_millis(self.connect_delay_ms),
            register: Duration::from_millis(self.register_delay_ms),
            verify: Duration::from_millis(self.verify_delay_ms),
        }
    }
}
