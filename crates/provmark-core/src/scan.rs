// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory enumeration in declared extension order.
//
// The listing is taken once, up front, so processing order never depends on
// the order in which work completes or on directory iteration order.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ProvmarkError, Result};
use crate::format::{self, PDF_EXTENSION};

/// What to include in a scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Include `.pdf` files after all text formats.
    pub include_pdf: bool,
    /// Leave out files whose name contains "manifest" (any case).
    pub skip_manifests: bool,
}

/// Result of enumerating one directory (non-recursive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryScan {
    /// Supported files: grouped by declared extension order, sorted by name
    /// within each group.
    pub supported: Vec<PathBuf>,
    /// Regular files whose extension is not supported, sorted by name.
    pub unsupported: Vec<PathBuf>,
    /// PDFs left out because `include_pdf` was off, sorted by name.
    pub excluded_pdfs: Vec<PathBuf>,
}

/// Enumerate regular files directly inside `dir`.
///
/// Symlinks count as the file they point at. Hidden files (leading `.`) are
/// left out of every list.
pub fn scan_directory(dir: &Path, options: ScanOptions) -> Result<DirectoryScan> {
    if !dir.is_dir() {
        return Err(ProvmarkError::NotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if is_hidden(&path) {
            debug!(file = %path.display(), "Hidden file ignored");
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut scan = DirectoryScan::default();
    let mut order: Vec<&'static str> = format::text_extensions().collect();
    if options.include_pdf {
        order.push(PDF_EXTENSION);
    }
    let mut groups: Vec<Vec<PathBuf>> = vec![Vec::new(); order.len()];

    for path in files {
        if options.skip_manifests && is_manifest_name(&path) {
            continue;
        }
        let ext = format::normalize_extension(&path).unwrap_or_default();
        match order.iter().position(|known| *known == ext) {
            Some(slot) => groups[slot].push(path),
            None if ext == PDF_EXTENSION => scan.excluded_pdfs.push(path),
            None => scan.unsupported.push(path),
        }
    }

    scan.supported = groups.into_iter().flatten().collect();
    Ok(scan)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

fn is_manifest_name(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().contains("manifest"))
        .unwrap_or(false)
}
