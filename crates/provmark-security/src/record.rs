// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document records — one immutable entry per protected file.

use std::path::Path;

use provmark_core::error::{ProvmarkError, Result};
use provmark_core::types::{FileStat, Provenance, SIGNATURE_PENDING, Timestamp};
use serde::{Deserialize, Serialize};

/// Integrity and filesystem facts about one protected file.
///
/// Fields are private: a record is built once by [`build_record`] and only
/// read afterwards. Every field serializes, including unset optionals (as
/// `null`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    original_file: String,
    protected_file: String,
    original_hash: String,
    protected_hash: String,
    timestamp: Timestamp,
    file_size: u64,
    file_extension: String,
    original_permissions: Option<u32>,
    original_modified_time: Option<String>,
    digital_signature_placeholder: String,
}

impl DocumentRecord {
    pub fn original_file(&self) -> &str {
        &self.original_file
    }

    pub fn protected_file(&self) -> &str {
        &self.protected_file
    }

    pub fn original_hash(&self) -> &str {
        &self.original_hash
    }

    pub fn protected_hash(&self) -> &str {
        &self.protected_hash
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn original_permissions(&self) -> Option<u32> {
        self.original_permissions
    }

    pub fn original_modified_time(&self) -> Option<&str> {
        self.original_modified_time.as_deref()
    }

    pub fn signature_placeholder(&self) -> &str {
        &self.digital_signature_placeholder
    }
}

/// Everything [`build_record`] needs. Stat values are supplied by the caller.
#[derive(Debug, Clone)]
pub struct RecordParts<'a> {
    pub provenance: Provenance,
    /// Path written to `protected_file`.
    pub protected_file: String,
    pub protected_hash: &'a str,
    pub timestamp: Timestamp,
    /// Lowercase extension with leading dot.
    pub extension: String,
    pub stat: FileStat,
}

impl<'a> RecordParts<'a> {
    /// Convenience for the common case of a protected file on disk.
    pub fn for_protected_path(
        provenance: Provenance,
        protected_path: &Path,
        protected_hash: &'a str,
        timestamp: Timestamp,
        extension: impl Into<String>,
        stat: FileStat,
    ) -> Self {
        Self {
            provenance,
            protected_file: protected_path.display().to_string(),
            protected_hash,
            timestamp,
            extension: extension.into(),
            stat,
        }
    }
}

/// Build an immutable record.
///
/// Fails with [`ProvmarkError::MissingHash`] when the protected hash, or the
/// original hash of tracked provenance, is empty.
pub fn build_record(parts: RecordParts<'_>) -> Result<DocumentRecord> {
    if parts.protected_hash.trim().is_empty() {
        return Err(ProvmarkError::MissingHash("protected hash"));
    }
    if let Provenance::Tracked { hash, .. } = &parts.provenance
        && hash.trim().is_empty()
    {
        return Err(ProvmarkError::MissingHash("original hash"));
    }

    Ok(DocumentRecord {
        original_file: parts.provenance.original_path().to_owned(),
        protected_file: parts.protected_file,
        original_hash: parts.provenance.original_hash().to_owned(),
        protected_hash: parts.protected_hash.to_owned(),
        timestamp: parts.timestamp,
        file_size: parts.stat.size,
        file_extension: parts.extension.to_ascii_lowercase(),
        original_permissions: parts.stat.mode,
        original_modified_time: parts.stat.modified_rfc3339(),
        digital_signature_placeholder: SIGNATURE_PENDING.to_owned(),
    })
}
