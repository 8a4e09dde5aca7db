// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Invocation-level operations. Each one validates its input before touching
// the filesystem and finishes by writing (or reading) the manifest.

use std::path::Path;

use provmark_core::error::{ProvmarkError, Result};
use provmark_core::format::{is_pdf_extension, normalize_extension};
use provmark_security::manifest::{
    Manifest, VerifyReport, regenerate, verify_manifest, write_manifest,
};
use tracing::{info, instrument};

use crate::batch::{BatchOutcome, process_directory};
use crate::context::ProtectContext;
use crate::pipeline::{protect_pdf, protect_text_file};

/// Protect one file and write a single-entry manifest into `output_dir`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn protect_single(path: &Path, output_dir: &Path, ctx: &ProtectContext) -> Result<Manifest> {
    if !path.exists() {
        return Err(ProvmarkError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(ProvmarkError::Configuration(format!(
            "{} is a directory; use batch mode",
            path.display()
        )));
    }

    let is_pdf = normalize_extension(path).is_some_and(|ext| is_pdf_extension(&ext));
    let record = if is_pdf {
        protect_pdf(path, output_dir, ctx)?
    } else {
        protect_text_file(path, output_dir, ctx)?
    };

    let manifest = Manifest::assemble(ctx.config(), ctx.now(), vec![record]);
    let written = write_manifest(output_dir, &manifest)?;
    info!(manifest = %written.display(), "Manifest written");
    Ok(manifest)
}

/// Protect a directory. The manifest is written only when at least one
/// record was produced.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn protect_batch(
    dir: &Path,
    output_dir: &Path,
    include_pdf: bool,
    ctx: &ProtectContext,
) -> Result<(BatchOutcome, Option<Manifest>)> {
    let outcome = process_directory(dir, output_dir, include_pdf, ctx)?;
    if outcome.records.is_empty() {
        info!("Nothing protected, no manifest written");
        return Ok((outcome, None));
    }

    let manifest = Manifest::assemble(ctx.config(), ctx.now(), outcome.records.clone());
    let written = write_manifest(output_dir, &manifest)?;
    info!(manifest = %written.display(), documents = manifest.len(), "Manifest written");
    Ok((outcome, Some(manifest)))
}

/// Rebuild `<dir>/manifest.json` from the protected files in `dir`.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn regenerate_manifest(dir: &Path, ctx: &ProtectContext) -> Result<Manifest> {
    let manifest = regenerate(dir, ctx.config(), ctx.now())?;
    let written = write_manifest(dir, &manifest)?;
    info!(manifest = %written.display(), documents = manifest.len(), "Manifest regenerated");
    Ok(manifest)
}

/// Check every file listed in `<dir>/manifest.json` against its recorded hash.
pub fn verify_output(dir: &Path) -> Result<VerifyReport> {
    if !dir.is_dir() {
        return Err(ProvmarkError::NotFound(dir.to_path_buf()));
    }
    verify_manifest(dir)
}
