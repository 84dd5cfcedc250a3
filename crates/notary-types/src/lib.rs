//! Foundation types for the digital notary.
//!
//! This crate provides the identity, digest and record types used throughout
//! the notary. Every other notary crate depends on `notary-types`.
//!
//! # Key Types
//!
//! - [`DigestHex`] — Validated lowercase SHA-256 digest (64 hex characters)
//! - [`Principal`] — Mock identity token for a connected session
//! - [`RecordId`] — `TS-<time>-<random>` registration identifier
//! - [`TimestampRecord`] — Immutable notarization record
//!
//! Display helpers ([`format_file_size`], [`format_timestamp`]) live in
//! [`format`].

pub mod digest;
pub mod error;
pub mod format;
pub mod principal;
pub mod record;

pub use digest::{validate_digest, DigestHex};
pub use error::ValidationError;
pub use format::{format_file_size, format_timestamp, format_timestamp_in, iso_timestamp};
pub use principal::Principal;
pub use record::{RecordId, TimestampRecord};
