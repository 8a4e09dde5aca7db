// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manifest — the JSON index of every protected file in an output directory.
//
// A manifest is always built whole: from the records of one run, or by
// rescanning the directory (regeneration). It is never patched in place, and
// it is written through a temporary file so readers never see a partial one.
//
// Layout:
//   {
//     "manifest_version": "1.0.0",
//     "generator": "provmark",
//     "generator_version": "0.3.0",
//     "cage_code": "...", "company": "...", "duns_number": "...", "trademark": "...",
//     "generated_at": "2025-01-02T03:04:05Z",
//     "documents": [ { ...DocumentRecord... } ]
//   }

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use provmark_core::ProtectConfig;
use provmark_core::error::{ProvmarkError, Result};
use provmark_core::format::normalize_extension;
use provmark_core::scan::{ScanOptions, scan_directory};
use provmark_core::types::{
    FileStat, MANIFEST_FILE_NAME, PDF_UNAVAILABLE_SUFFIX, Provenance, Timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::integrity::{hash_file, verify_file};
use crate::record::{DocumentRecord, RecordParts, build_record};

/// Versioned collection of document records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_version: String,
    pub generator: String,
    pub generator_version: String,
    /// Organization identifiers, flattened into the manifest root.
    #[serde(flatten)]
    pub organization: BTreeMap<String, String>,
    pub generated_at: Timestamp,
    /// Records in processing order.
    pub documents: Vec<DocumentRecord>,
}

impl Manifest {
    /// Build a fresh manifest around `documents`, keeping their order.
    pub fn assemble(
        config: &ProtectConfig,
        generated_at: Timestamp,
        documents: Vec<DocumentRecord>,
    ) -> Self {
        Self {
            manifest_version: config.manifest_version.clone(),
            generator: config.generator.clone(),
            generator_version: config.generator_version.clone(),
            organization: config.organization.identifiers(),
            generated_at,
            documents,
        }
    }

    /// Pretty JSON (two-space indent) with a trailing newline.
    ///
    /// Identical inputs give identical bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Path of the manifest inside `dir`.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE_NAME)
}

/// Write `manifest` to `<dir>/manifest.json`, replacing any existing file.
///
/// The bytes go to a temporary file in `dir` first and are then renamed
/// into place.
#[instrument(skip_all, fields(dir = %dir.display(), documents = manifest.len()))]
pub fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = manifest_path(dir);
    let bytes = manifest.to_json()?;

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(&bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(&target).map_err(|err| ProvmarkError::Io(err.error))?;

    info!(path = %target.display(), "Manifest written");
    Ok(target)
}

/// Load `<dir>/manifest.json`.
pub fn read_manifest(dir: &Path) -> Result<Manifest> {
    let path = manifest_path(dir);
    if !path.is_file() {
        return Err(ProvmarkError::NotFound(path));
    }
    Manifest::from_json(&std::fs::read(&path)?)
}

/// Rebuild a manifest purely from the protected files found in `dir`.
///
/// Every supported text file and PDF whose name does not contain
/// "manifest" becomes an untracked record hashed from disk. A file that
/// cannot be read is logged and left out. The result is not written; see
/// [`write_manifest`].
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn regenerate(dir: &Path, config: &ProtectConfig, generated_at: Timestamp) -> Result<Manifest> {
    let scan = scan_directory(
        dir,
        ScanOptions {
            include_pdf: true,
            skip_manifests: true,
        },
    )?;

    info!(candidates = scan.supported.len(), "Regenerating manifest");

    let mut documents = Vec::with_capacity(scan.supported.len());
    for path in &scan.supported {
        match untracked_record(path, generated_at) {
            Ok(record) => {
                debug!(file = %path.display(), "Added");
                documents.push(record);
            }
            Err(err) => warn!(file = %path.display(), %err, "Left out of manifest"),
        }
    }

    Ok(Manifest::assemble(config, generated_at, documents))
}

fn untracked_record(path: &Path, timestamp: Timestamp) -> Result<DocumentRecord> {
    let digest = hash_file(path)?;
    let stat = FileStat::read(path)?;
    build_record(RecordParts::for_protected_path(
        Provenance::Untracked,
        path,
        &digest,
        timestamp,
        normalize_extension(path).unwrap_or_default(),
        stat,
    ))
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Outcome of checking one manifest entry against disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// Protected file exists and its hash matches.
    Intact,
    /// Protected file exists but its content changed.
    Modified { actual: String },
    /// Protected file is gone.
    Missing,
    /// Protected file exists but could not be read.
    Unreadable { reason: String },
    /// Entry has no protected file to check (degraded PDF record).
    Skipped,
}

/// Per-entry results of [`verify_manifest`], in manifest order.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub entries: Vec<(String, EntryStatus)>,
}

impl VerifyReport {
    fn count(&self, pred: impl Fn(&EntryStatus) -> bool) -> usize {
        self.entries.iter().filter(|(_, status)| pred(status)).count()
    }

    pub fn intact(&self) -> usize {
        self.count(|s| *s == EntryStatus::Intact)
    }

    pub fn modified(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Modified { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|s| *s == EntryStatus::Missing)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| *s == EntryStatus::Skipped)
    }

    pub fn unreadable(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Unreadable { .. }))
    }

    /// True when every checked entry is intact.
    pub fn is_clean(&self) -> bool {
        self.modified() == 0 && self.missing() == 0 && self.unreadable() == 0
    }
}

/// Re-hash every protected file listed in `<dir>/manifest.json`.
///
/// Only an unreadable manifest fails the call; each entry gets its own
/// status.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn verify_manifest(dir: &Path) -> Result<VerifyReport> {
    let manifest = read_manifest(dir)?;
    let mut report = VerifyReport::default();

    for doc in &manifest.documents {
        let listed = doc.protected_file();
        let status = if listed.ends_with(PDF_UNAVAILABLE_SUFFIX) {
            EntryStatus::Skipped
        } else {
            check_entry(&resolve_listed_path(dir, listed), doc.protected_hash())
        };
        report.entries.push((listed.to_owned(), status));
    }

    info!(
        intact = report.intact(),
        modified = report.modified(),
        missing = report.missing(),
        unreadable = report.unreadable(),
        skipped = report.skipped(),
        "Manifest verified"
    );
    Ok(report)
}

fn check_entry(path: &Path, expected: &str) -> EntryStatus {
    match verify_file(path, expected) {
        Ok(()) => EntryStatus::Intact,
        Err(ProvmarkError::IntegrityMismatch { actual, .. }) => {
            warn!(file = %path.display(), expected, %actual, "Hash mismatch");
            EntryStatus::Modified { actual }
        }
        Err(ProvmarkError::Io(err)) if err.kind() == ErrorKind::NotFound => EntryStatus::Missing,
        Err(err) => {
            warn!(file = %path.display(), %err, "Protected file unreadable");
            EntryStatus::Unreadable {
                reason: err.to_string(),
            }
        }
    }
}

/// Manifest paths are recorded as given on the command line, so a relative
/// one depends on where the run happened. The file name inside `dir` wins;
/// the recorded path is only a fallback.
fn resolve_listed_path(dir: &Path, listed: &str) -> PathBuf {
    let as_given = PathBuf::from(listed);
    if let Some(name) = as_given.file_name() {
        let local = dir.join(name);
        if local.exists() {
            return local;
        }
    }
    as_given
}
