// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-file pipeline: read, hash, wrap or watermark, write, re-hash, record.
//
// Both hashes are taken over exact bytes: the original as read, the protected
// copy streamed back from disk after the write, so the manifest describes what
// actually landed on disk.

use std::fs;
use std::path::{Path, PathBuf};

use provmark_core::error::{ProvmarkError, Result};
use provmark_core::format::{PDF_EXTENSION, describe_path};
use provmark_core::types::{FileStat, PDF_UNAVAILABLE_SUFFIX, Provenance, Timestamp};
use provmark_document::template::{PdfStamp, footer, header};
use provmark_document::wrap::wrap;
use provmark_security::integrity::{hash_bytes, hash_file};
use provmark_security::record::{DocumentRecord, RecordParts, build_record};
use tracing::{debug, info, instrument, warn};

use crate::context::ProtectContext;

/// Protect one supported text file into `output_dir`.
#[instrument(skip_all, fields(path = %input.display()))]
pub fn protect_text_file(
    input: &Path,
    output_dir: &Path,
    ctx: &ProtectContext,
) -> Result<DocumentRecord> {
    if !input.is_file() {
        return Err(ProvmarkError::NotFound(input.to_path_buf()));
    }
    let descriptor = describe_path(input)?;

    let bytes = fs::read(input)?;
    let original_hash = hash_bytes(&bytes);
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| ProvmarkError::InvalidText(input.to_path_buf()))?;
    debug!(%original_hash, "Original hashed");

    let now = ctx.now();
    let org = &ctx.config().organization;
    let protected = wrap(
        text,
        descriptor,
        &header(org, &display_name(input), &original_hash, now),
        &footer(org),
    );

    fs::create_dir_all(output_dir)?;
    let output = output_path(input, output_dir, now);
    fs::write(&output, protected.as_bytes())?;
    copy_permissions(input, &output);

    let recorded = hash_file(&output).and_then(|protected_hash| {
        build_record(RecordParts::for_protected_path(
            Provenance::tracked(input, original_hash),
            &output,
            &protected_hash,
            now,
            descriptor.extension,
            FileStat::read(input)?,
        ))
    });
    let record = discard_on_error(&output, recorded)?;
    info!(output = %output.display(), "Protected");
    Ok(record)
}

/// Watermark one PDF into `output_dir`.
///
/// When the PDF capability is unavailable nothing is written and a degraded
/// record is returned: the protected path is the input path plus
/// [`PDF_UNAVAILABLE_SUFFIX`] and the protected hash equals the original.
#[instrument(skip_all, fields(path = %input.display()))]
pub fn protect_pdf(input: &Path, output_dir: &Path, ctx: &ProtectContext) -> Result<DocumentRecord> {
    if !input.is_file() {
        return Err(ProvmarkError::NotFound(input.to_path_buf()));
    }

    let bytes = fs::read(input)?;
    let original_hash = hash_bytes(&bytes);
    let stat = FileStat::read(input)?;
    let now = ctx.now();
    let pdf = ctx.pdf();

    if !pdf.available() {
        warn!(capability = pdf.name(), "PDF watermarking unavailable, recording original only");
        return build_record(RecordParts {
            provenance: Provenance::tracked(input, original_hash.clone()),
            protected_file: format!("{}{PDF_UNAVAILABLE_SUFFIX}", input.display()),
            protected_hash: &original_hash,
            timestamp: now,
            extension: PDF_EXTENSION.to_owned(),
            stat,
        });
    }

    let stamp = PdfStamp::new(
        &ctx.config().organization,
        &ctx.generator_label(),
        &display_name(input),
        &original_hash,
        now,
    );
    let watermarked = pdf.watermark(&bytes, &stamp)?;

    fs::create_dir_all(output_dir)?;
    let output = output_path(input, output_dir, now);
    fs::write(&output, &watermarked)?;
    copy_permissions(input, &output);

    let recorded = hash_file(&output).and_then(|protected_hash| {
        build_record(RecordParts::for_protected_path(
            Provenance::tracked(input, original_hash),
            &output,
            &protected_hash,
            now,
            PDF_EXTENSION,
            stat,
        ))
    });
    let record = discard_on_error(&output, recorded)?;
    info!(output = %output.display(), capability = pdf.name(), "PDF protected");
    Ok(record)
}

/// `{output_dir}/{stem}_protected_{YYYY-MM-DD_HH-MM-SS}{.ext}`, keeping the
/// input's extension as written.
pub fn output_path(input: &Path, output_dir: &Path, at: Timestamp) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    output_dir.join(format!("{stem}_protected_{}{ext}", at.filename_fragment()))
}

/// A written output without a record would be an unlisted file; remove it.
fn discard_on_error<T>(output: &Path, result: Result<T>) -> Result<T> {
    if result.is_err()
        && let Err(err) = fs::remove_file(output)
    {
        warn!(output = %output.display(), %err, "Unrecorded output not removed");
    }
    result
}

/// Best effort: a copy that keeps default permissions is still a valid output.
fn copy_permissions(from: &Path, to: &Path) {
    let result = fs::metadata(from).and_then(|meta| fs::set_permissions(to, meta.permissions()));
    if let Err(err) = result {
        debug!(from = %from.display(), to = %to.display(), %err, "Permissions not copied");
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use provmark_core::types::FixedClock;
    use provmark_document::pdf::UnavailablePdf;

    fn at() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 6, 7, 8, 9, 10).unwrap())
    }

    fn ctx() -> ProtectContext {
        ProtectContext::default().with_clock(FixedClock(at()))
    }

    #[test]
    fn output_name_keeps_stem_and_extension() {
        let path = output_path(Path::new("/in/report.Final.MD"), Path::new("/out"), at());
        assert_eq!(
            path,
            PathBuf::from("/out/report.Final_protected_2025-06-07_08-09-10.MD")
        );
    }

    #[test]
    fn text_file_is_wrapped_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# Notes\n").unwrap();
        let out_dir = dir.path().join("out");

        let record = protect_text_file(&input, &out_dir, &ctx()).unwrap();
        let written = fs::read_to_string(record.protected_file()).unwrap();
        assert!(written.contains("\n\n# Notes\n\n\n"));
        assert_eq!(record.original_hash(), hash_bytes(b"# Notes\n"));
        assert_eq!(record.protected_hash(), hash_bytes(written.as_bytes()));
        assert_eq!(record.file_size(), 8);
        assert_eq!(record.file_extension(), ".md");
    }

    #[test]
    fn unsupported_extension_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tool.exe");
        fs::write(&input, [0u8, 1, 2]).unwrap();
        let err = protect_text_file(&input, dir.path(), &ctx()).unwrap_err();
        assert!(matches!(err, ProvmarkError::UnsupportedFormat(_)));
    }

    #[test]
    fn invalid_utf8_is_rejected_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.txt");
        fs::write(&input, [0xffu8, 0xfe, 0x00]).unwrap();
        let out_dir = dir.path().join("out");
        let err = protect_text_file(&input, &out_dir, &ctx()).unwrap_err();
        assert!(matches!(err, ProvmarkError::InvalidText(_)));
        assert!(!out_dir.exists());
    }

    #[test]
    fn missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = protect_text_file(&dir.path().join("nope.py"), dir.path(), &ctx()).unwrap_err();
        assert!(matches!(err, ProvmarkError::NotFound(_)));
    }

    #[test]
    fn degraded_pdf_record_points_at_original() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        fs::write(&input, b"%PDF-1.4 not really").unwrap();
        let out_dir = dir.path().join("out");
        let ctx = ctx().with_pdf(Box::new(UnavailablePdf));

        let record = protect_pdf(&input, &out_dir, &ctx).unwrap();
        assert_eq!(
            record.protected_file(),
            format!("{}{PDF_UNAVAILABLE_SUFFIX}", input.display())
        );
        assert_eq!(record.protected_hash(), record.original_hash());
        assert!(!out_dir.exists());
    }

    #[test]
    fn failed_recording_removes_the_written_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("a_protected.md");
        fs::write(&output, "wrapped").unwrap();

        let failed: Result<()> = Err(ProvmarkError::MissingHash("protected_hash"));
        assert!(discard_on_error(&output, failed).is_err());
        assert!(!output.exists());

        fs::write(&output, "wrapped").unwrap();
        assert_eq!(discard_on_error(&output, Ok(7)).unwrap(), 7);
        assert!(output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn permissions_follow_the_original() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run.sh");
        fs::write(&input, "#!/bin/sh\necho hi\n").unwrap();
        fs::set_permissions(&input, fs::Permissions::from_mode(0o750)).unwrap();

        let record = protect_text_file(&input, dir.path(), &ctx()).unwrap();
        let mode = fs::metadata(record.protected_file()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
        assert_eq!(record.original_permissions(), Some(0o750));
    }
}
