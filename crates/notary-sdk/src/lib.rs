//! High-level API for the digital notary.
//!
//! [`Notary`] is the single application state: it owns the session, the
//! timestamp registry and the currently selected file, and every operation
//! goes through it. This is the main entry point for front ends.

pub mod config;
pub mod error;
pub mod notary;

pub use config::NotaryConfig;
pub use error::{SdkError, SdkResult};
pub use notary::{Notary, SelectedFile};

// Re-export key types
pub use notary_ledger::{Clock, FixedDelay, NetworkDelay, NoDelay, SimulatedCall, SystemClock};
pub use notary_types::{
    format_file_size, format_timestamp, validate_digest, DigestHex, Principal, RecordId,
    TimestampRecord,
};
