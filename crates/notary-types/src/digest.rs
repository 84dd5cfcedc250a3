use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lowercase hex rendering of a SHA-256 digest.
///
/// A `DigestHex` always holds exactly 64 characters from `[0-9a-f]`.
/// Constructing one from text goes through [`DigestHex::parse`], which is
/// strict, or [`validate_digest`], which accepts user input and normalizes it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigestHex(String);

impl DigestHex {
    /// Length of a rendered SHA-256 digest.
    pub const LEN: usize = 64;

    /// Render a raw 32-byte hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hex::encode(hash))
    }

    /// Parse an already-canonical digest. Uppercase input is rejected.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::EmptyDigest);
        }
        let actual = s.chars().count();
        if actual != Self::LEN {
            return Err(ValidationError::DigestLength {
                expected: Self::LEN,
                actual,
            });
        }
        if let Some((position, found)) = s
            .chars()
            .enumerate()
            .find(|(_, c)| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(ValidationError::DigestCharacter { position, found });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 hex characters.
    pub fn short_hex(&self) -> &str {
        &self.0[..8]
    }

    /// Decode back to the raw 32-byte hash.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        // Length and charset were checked on construction.
        hex::decode_to_slice(&self.0, &mut out).unwrap_or_default();
        out
    }
}

/// Validate a digest typed or pasted by a user.
///
/// Surrounding whitespace is trimmed and hex letters are folded to lowercase
/// before the strict format check, so `"ABC…"` and `"abc…"` name the same
/// digest.
pub fn validate_digest(input: &str) -> Result<DigestHex, ValidationError> {
    let trimmed = input.trim();
    DigestHex::parse(&trimmed.to_ascii_lowercase())
}

impl TryFrom<String> for DigestHex {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DigestHex> for String {
    fn from(value: DigestHex) -> Self {
        value.0
    }
}

impl AsRef<str> for DigestHex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DigestHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestHex({})", self.short_hex())
    }
}

impl fmt::Display for DigestHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
