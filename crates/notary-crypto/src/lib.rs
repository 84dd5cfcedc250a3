//! Document digests for the digital notary.
//!
//! Wraps the `sha2` implementation of SHA-256; no custom cryptography.

pub mod digest;

pub use digest::{compute_digest, DigestComputer, DigestError};
