// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for provmark.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProvmarkError, Result};

/// File name of the manifest written at the root of an output directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Recorded in place of the original path when a record was rebuilt from
/// disk without provenance.
pub const UNTRACKED_ORIGINAL: &str = "(original not tracked)";

/// Recorded in place of the original hash for untracked records.
pub const HASH_NOT_AVAILABLE: &str = "(not available)";

/// Signature field value until real signing exists.
pub const SIGNATURE_PENDING: &str = "SIGNATURE_PENDING";

/// Appended to the original path when a PDF could not be watermarked.
pub const PDF_UNAVAILABLE_SUFFIX: &str = " (watermarking unavailable)";

/// Directory used when the caller gives no output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "protected";

const MANIFEST_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const FILENAME_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A UTC instant with second precision.
///
/// Renders as `2025-01-02T03:04:05Z` in headers and manifests, and as
/// `2025-01-02_03-04-05` inside output file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current wall-clock time, truncated to the second.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Truncate `instant` to whole seconds.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.with_nanosecond(0).unwrap_or(instant))
    }

    /// Parse the manifest rendering (`YYYY-MM-DDTHH:MM:SSZ`).
    pub fn parse(raw: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(raw, MANIFEST_TIME_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|err| ProvmarkError::Configuration(format!("bad timestamp {raw:?}: {err}")))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// File-name-safe rendering: `:` → `-`, `T` → `_`, no trailing `Z`.
    pub fn filename_fragment(&self) -> String {
        self.0.format(FILENAME_TIME_FORMAT).to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(MANIFEST_TIME_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Source of timestamps for protection runs.
///
/// Production code uses [`SystemClock`]; tests pin time with [`FixedClock`]
/// so output names and hashes are reproducible.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Filesystem facts
// ---------------------------------------------------------------------------

/// Stat values a caller captured for a file.
///
/// Record building consumes this instead of touching the filesystem itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
    /// Size in bytes.
    pub size: u64,
    /// Permission bits (`0o7777` mask). `None` on platforms without them.
    pub mode: Option<u32>,
    /// Last modification time, truncated to the second.
    pub modified: Option<Timestamp>,
}

impl FileStat {
    /// Capture size, permission bits and modification time from `metadata`.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            mode: permission_bits(metadata),
            modified: metadata
                .modified()
                .ok()
                .map(|time| Timestamp::from_datetime(DateTime::<Utc>::from(time))),
        }
    }

    /// Stat `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let metadata = std::fs::metadata(path.as_ref())?;
        Ok(Self::from_metadata(&metadata))
    }

    /// RFC 3339 rendering of the modification time.
    pub fn modified_rfc3339(&self) -> Option<String> {
        self.modified
            .map(|ts| ts.as_datetime().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &Metadata) -> Option<u32> {
    None
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Where a protected file came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Produced by this tool from a known original.
    Tracked { path: String, hash: String },
    /// Found on disk during regeneration; the original is unknown.
    Untracked,
}

impl Provenance {
    pub fn tracked(path: &Path, hash: impl Into<String>) -> Self {
        Self::Tracked {
            path: path.display().to_string(),
            hash: hash.into(),
        }
    }

    /// Original path, or [`UNTRACKED_ORIGINAL`].
    pub fn original_path(&self) -> &str {
        match self {
            Self::Tracked { path, .. } => path,
            Self::Untracked => UNTRACKED_ORIGINAL,
        }
    }

    /// Original hash, or [`HASH_NOT_AVAILABLE`].
    pub fn original_hash(&self) -> &str {
        match self {
            Self::Tracked { hash, .. } => hash,
            Self::Untracked => HASH_NOT_AVAILABLE,
        }
    }
}

/// Output directory used when none is given: `<input parent>/protected`.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_OUTPUT_DIR)
}
