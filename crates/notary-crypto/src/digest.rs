use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use notary_types::DigestHex;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Read buffer size used when streaming content.
const CHUNK_SIZE: usize = 64 * 1024;

/// Errors from digest computation.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// The content could not be read to the end.
    #[error("failed to read content: {0}")]
    Io(#[from] io::Error),
}

/// SHA-256 digest computer.
///
/// Digests are pure functions of the input bytes: identical content always
/// yields the same [`DigestHex`]. Streaming variants never return a digest
/// for partially read content.
#[derive(Clone, Copy, Debug, Default)]
pub struct DigestComputer;

impl DigestComputer {
    pub const fn new() -> Self {
        Self
    }

    /// Digest an in-memory byte slice.
    pub fn digest(&self, data: &[u8]) -> DigestHex {
        DigestHex::from_hash(Sha256::digest(data).into())
    }

    /// Digest everything a reader yields. Returns the digest and byte count.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> Result<(DigestHex, u64), DigestError> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            hasher.update(&buf[..n]);
            total += n as u64;
        }
        Ok((DigestHex::from_hash(hasher.finalize().into()), total))
    }

    /// Digest a file on disk. Returns the digest and file size in bytes.
    pub fn digest_file(&self, path: &Path) -> Result<(DigestHex, u64), DigestError> {
        let file = File::open(path)?;
        let (digest, size) = self.digest_reader(file)?;
        debug!(path = %path.display(), size, digest = %digest.short_hex(), "file digested");
        Ok((digest, size))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &DigestHex) -> bool {
        self.digest(data) == *expected
    }
}

/// Digest a byte slice with SHA-256.
pub fn compute_digest(data: &[u8]) -> DigestHex {
    DigestComputer::new().digest(data)
}
