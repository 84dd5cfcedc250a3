use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identity token of a connected session.
///
/// Principals here are display tokens only. [`Principal::mock`] produces a
/// random string shaped like a ledger principal; it is not derived from any
/// key material and proves nothing about who holds it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Characters a mock principal draws from.
    pub const ALPHABET: &'static [u8] = b"abcdefghijklmnopqrstuvwxyz234567";
    /// Total length of a mock principal, separators included.
    pub const MOCK_LEN: usize = 63;
    /// A separator replaces every character at a position divisible by this.
    pub const GROUP: usize = 5;

    /// Wrap an existing identity string. Blank input is rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::MissingIdentity);
        }
        Ok(Self(value))
    }

    /// Generate a mock principal with the thread-local RNG.
    pub fn mock() -> Self {
        Self::mock_with(&mut rand::thread_rng())
    }

    /// Generate a mock principal from the given RNG.
    ///
    /// Positions 5, 10, …, 60 hold `-`; every other position holds a
    /// character from [`Principal::ALPHABET`].
    pub fn mock_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let s = (0..Self::MOCK_LEN)
            .map(|i| {
                if i > 0 && i % Self::GROUP == 0 {
                    '-'
                } else {
                    Self::ALPHABET[rng.gen_range(0..Self::ALPHABET.len())] as char
                }
            })
            .collect();
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for narrow displays (first two groups).
    pub fn short_id(&self) -> String {
        match self.0.char_indices().nth(11) {
            Some((idx, _)) => format!("{}…", &self.0[..idx]),
            None => self.0.clone(),
        }
    }
}

impl TryFrom<String> for Principal {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.short_id())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
