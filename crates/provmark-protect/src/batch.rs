// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestration over one directory.
//
// A file's failure is logged and counted, never propagated: the batch always
// runs to the end of its listing.

use std::path::Path;

use provmark_core::error::{ProvmarkError, Result};
use provmark_core::format::{is_pdf_extension, normalize_extension};
use provmark_core::scan::{ScanOptions, scan_directory};
use provmark_security::record::DocumentRecord;
use tracing::{debug, error, info, instrument};

use crate::context::ProtectContext;
use crate::pipeline::{protect_pdf, protect_text_file};

/// Records and counts from one [`process_directory`] run.
///
/// `processed` always equals `records.len()`.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub records: Vec<DocumentRecord>,
    pub processed: usize,
    pub skipped: usize,
}

/// Protect every supported file directly inside `input_dir`.
///
/// Files are handled in declared extension order, then by name. Files with
/// unsupported extensions count as skipped. PDFs are only handled with
/// `include_pdf`; otherwise they are left alone without counting.
#[instrument(skip_all, fields(input = %input_dir.display(), output = %output_dir.display()))]
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    include_pdf: bool,
    ctx: &ProtectContext,
) -> Result<BatchOutcome> {
    if !input_dir.is_dir() {
        return Err(ProvmarkError::Configuration(format!(
            "batch input is not a directory: {}",
            input_dir.display()
        )));
    }

    let scan = scan_directory(
        input_dir,
        ScanOptions {
            include_pdf,
            skip_manifests: false,
        },
    )?;
    info!(files = scan.supported.len(), "Starting batch");

    let mut outcome = BatchOutcome::default();

    for path in &scan.excluded_pdfs {
        debug!(file = %path.display(), "PDF ignored (PDF processing not requested)");
    }
    for path in &scan.unsupported {
        let ext = normalize_extension(path).unwrap_or_else(|| "(no extension)".to_owned());
        let err = ProvmarkError::UnsupportedFormat(ext);
        error!(file = %path.display(), %err, "Skipped");
        outcome.skipped += 1;
    }

    for path in &scan.supported {
        let is_pdf = normalize_extension(path).is_some_and(|ext| is_pdf_extension(&ext));
        let result = if is_pdf {
            protect_pdf(path, output_dir, ctx)
        } else {
            protect_text_file(path, output_dir, ctx)
        };
        match result {
            Ok(record) => {
                outcome.records.push(record);
                outcome.processed += 1;
            }
            Err(err) => {
                error!(file = %path.display(), %err, "Skipped");
                outcome.skipped += 1;
            }
        }
    }

    info!(
        processed = outcome.processed,
        skipped = outcome.skipped,
        "Batch complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_input_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "x").unwrap();
        let err = process_directory(&file, dir.path(), false, &ProtectContext::default()).unwrap_err();
        assert!(matches!(err, ProvmarkError::Configuration(_)));
    }

    #[test]
    fn one_bad_file_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.txt"), [0xffu8, 0xfe]).unwrap();
        fs::write(input.join("b.txt"), "fine").unwrap();
        fs::write(input.join("c.yaml"), "k: v\n").unwrap();

        let outcome =
            process_directory(&input, &dir.path().join("out"), false, &ProtectContext::default())
                .unwrap();
        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.records.len(), outcome.processed);
        assert!(outcome.records[0].original_file().ends_with("b.txt"));
        assert!(outcome.records[1].original_file().ends_with("c.yaml"));
    }

    #[test]
    fn pdfs_without_the_flag_are_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("doc.pdf"), b"%PDF").unwrap();

        let outcome =
            process_directory(&input, &dir.path().join("out"), false, &ProtectContext::default())
                .unwrap();
        assert_eq!((outcome.processed, outcome.skipped), (0, 0));
    }

    #[test]
    fn hidden_files_are_neither_processed_nor_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join(".gitkeep"), "").unwrap();
        fs::write(input.join(".DS_Store"), [0u8; 4]).unwrap();
        fs::write(input.join("readme.md"), "# Readme\n").unwrap();

        let outcome =
            process_directory(&input, &dir.path().join("out"), false, &ProtectContext::default())
                .unwrap();
        assert_eq!((outcome.processed, outcome.skipped), (1, 0));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_input_is_protected() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let input = dir.path().join("in");
        fs::create_dir(&real).unwrap();
        fs::create_dir(&input).unwrap();
        fs::write(real.join("notes.md"), "# Notes\n").unwrap();
        std::os::unix::fs::symlink("../real/notes.md", input.join("notes.md")).unwrap();

        let outcome =
            process_directory(&input, &dir.path().join("out"), false, &ProtectContext::default())
                .unwrap();
        assert_eq!((outcome.processed, outcome.skipped), (1, 0));
        let written = fs::read_to_string(outcome.records[0].protected_file()).unwrap();
        assert!(written.contains("\n\n# Notes\n\n\n"));
    }
}
