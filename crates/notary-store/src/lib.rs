//! Key-value persistence for the digital notary.
//!
//! The notary keeps its whole state in a handful of string values under
//! fixed keys, the way a browser keeps application state in local storage.
//! This crate provides that store.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`InMemoryKeyValueStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileKeyValueStore`] -- one JSON document per key in a data directory
//!
//! # Design Rules
//!
//! 1. Values are opaque strings; typed access goes through [`read_json`] and
//!    [`write_json`].
//! 2. A write replaces the whole value. There are no partial updates.
//! 3. File writes land in a temporary file first and are renamed into place.
//! 4. All I/O errors are propagated to the caller.

pub mod error;
pub mod file;
pub mod json;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileKeyValueStore;
pub use json::{read_json, write_json};
pub use memory::InMemoryKeyValueStore;
pub use traits::{validate_key, KeyValueStore};
