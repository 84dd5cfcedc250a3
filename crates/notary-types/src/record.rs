use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::digest::DigestHex;
use crate::principal::Principal;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Identifier of a registration, `TS-<base36 millis>-<base36 random>`.
///
/// Uniqueness rests on the millisecond clock plus six random base-36
/// characters; nothing checks for collisions.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Length of the random suffix.
    pub const SUFFIX_LEN: usize = 6;

    /// Generate an id for the given creation time.
    pub fn generate(at: DateTime<Utc>) -> Self {
        Self::generate_with(at, &mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(at: DateTime<Utc>, rng: &mut R) -> Self {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        let suffix: String = (0..Self::SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("TS-{}-{}", to_base36(millis), suffix))
    }

    /// Wrap an id read back from storage or typed by a user.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    // Every byte comes from BASE36, which is ASCII.
    String::from_utf8(digits).unwrap_or_default()
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single notarization: who registered which digest, when, and where.
///
/// Records are created only by the registry and never change afterwards.
/// Field names on the wire follow the persisted `timestamps` layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRecord {
    pub id: RecordId,
    #[serde(rename = "hash")]
    pub digest: DigestHex,
    pub principal: Principal,
    pub filename: String,
    #[serde(rename = "filesize")]
    pub filesize_bytes: u64,
    /// ISO-8601 creation time, UTC with millisecond precision.
    #[serde(rename = "timestamp")]
    pub created_at: String,
    #[serde(rename = "blockHeight")]
    pub ledger_height: u64,
    #[serde(rename = "canisterId")]
    pub registry_id: String,
}

impl TimestampRecord {
    /// Parse `created_at` back into a UTC time.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
