//! Simulated notarization ledger.
//!
//! This crate holds the two stateful pieces of the notary:
//! - [`SessionManager`] — connect/disconnect lifecycle of a mock principal
//! - [`TimestampRegistry`] — append-only list of [`TimestampRecord`]s,
//!   mirrored to a [`KeyValueStore`] after every registration
//!
//! plus the seams that keep them testable: an injectable [`Clock`] for
//! record timestamps and an injectable [`NetworkDelay`] standing in for
//! ledger round-trips.
//!
//! Nothing here talks to a real network. Ledger heights and principals are
//! random.
//!
//! [`TimestampRecord`]: notary_types::TimestampRecord
//! [`KeyValueStore`]: notary_store::KeyValueStore

pub mod clock;
pub mod delay;
pub mod error;
pub mod registry;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use delay::{FixedDelay, NetworkDelay, NoDelay, SimulatedCall};
pub use error::{LedgerError, LedgerResult};
pub use registry::{TimestampRegistry, LEDGER_HEIGHT_MAX, LEDGER_HEIGHT_MIN};
pub use session::{ConnectionEntry, SessionManager, SessionState};

/// Store key holding the active connection.
pub const CONNECTION_KEY: &str = "connection";
/// Store key holding the serialized registry.
pub const TIMESTAMPS_KEY: &str = "timestamps";
/// Identifier of the simulated ledger container.
pub const DEFAULT_REGISTRY_ID: &str = "rdmx6-jaaaa-aaaah-qdrqq-cai";
