// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document integrity — SHA-256 hashing of buffers and streamed files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use provmark_core::error::{ProvmarkError, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

/// Read size for streamed hashing. Not observable in the digest.
const CHUNK_SIZE: usize = 4096;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Hash everything `reader` yields, in fixed-size chunks.
///
/// Produces the same digest as [`hash_bytes`] over the same bytes.
pub fn hash_reader(mut reader: impl Read) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hash the file at `path` as it currently exists on disk.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn hash_file(path: impl AsRef<Path>) -> Result<String> {
    let file = File::open(path.as_ref())?;
    let digest = hash_reader(file)?;
    debug!(%digest, "file hashed");
    Ok(digest)
}

/// Verify the file at `path` against `expected_hex`, streaming its content.
///
/// Returns `Err(ProvmarkError::IntegrityMismatch)` with the expected and
/// actual values when the digests differ; read failures pass through as
/// `ProvmarkError::Io`.
pub fn verify_file(path: impl AsRef<Path>, expected_hex: &str) -> Result<()> {
    let actual = hash_file(path)?;
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(ProvmarkError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}
