use thiserror::Error;

/// Errors produced when validating caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("digest is empty")]
    EmptyDigest,

    #[error("SHA-256 digest must be {expected} characters, got {actual}")]
    DigestLength { expected: usize, actual: usize },

    #[error("invalid digest character {found:?} at position {position}")]
    DigestCharacter { position: usize, found: char },

    #[error("an active identity is required")]
    MissingIdentity,

    #[error("filename must not be empty")]
    MissingFilename,
}
