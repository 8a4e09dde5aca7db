// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format registry — maps a file extension to its comment grammar and the
// strategy used to inject the provenance header and footer.
//
// Adding a format is a new table row; the wrapper never branches on
// extension strings.

use std::path::Path;

use crate::error::{ProvmarkError, Result};

/// Extension handled by the PDF pipeline rather than the text wrapper.
pub const PDF_EXTENSION: &str = ".pdf";

/// How header and footer text is embedded for a format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapStrategy {
    /// Text placed verbatim between the opening and closing delimiters
    /// (`<!-- -->` markup comments).
    Enclosed,
    /// Delimited block whose every inner line carries `line_prefix`
    /// (`/** ... */` with ` * ` lines).
    PrefixedBlock { line_prefix: &'static str },
    /// Every line carries `prefix`. When `framed`, a bare marker line is
    /// emitted before and after each block.
    LineComment { prefix: &'static str, framed: bool },
    /// Bare text blocks separated by blank lines.
    Plain,
}

/// Static wrapping rules for one extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Lowercase extension including the leading dot.
    pub extension: &'static str,
    /// Keep a leading `#!` line as the very first line of the output.
    pub preserve_shebang: bool,
    pub strategy: WrapStrategy,
    /// Opening comment delimiter; empty for line and plain strategies.
    pub open: &'static str,
    /// Closing comment delimiter; empty for line and plain strategies.
    pub close: &'static str,
}

const fn plain(extension: &'static str) -> FormatDescriptor {
    FormatDescriptor {
        extension,
        preserve_shebang: false,
        strategy: WrapStrategy::Plain,
        open: "",
        close: "",
    }
}

const fn star_block(extension: &'static str, open: &'static str) -> FormatDescriptor {
    FormatDescriptor {
        extension,
        preserve_shebang: false,
        strategy: WrapStrategy::PrefixedBlock { line_prefix: " * " },
        open,
        close: " */",
    }
}

const fn hash_lines(extension: &'static str, framed: bool, shebang: bool) -> FormatDescriptor {
    FormatDescriptor {
        extension,
        preserve_shebang: shebang,
        strategy: WrapStrategy::LineComment { prefix: "# ", framed },
        open: "",
        close: "",
    }
}

/// Supported text formats in their declared processing order.
///
/// Batch enumeration walks this table top to bottom, which keeps manifest
/// ordering reproducible.
static TEXT_FORMATS: [FormatDescriptor; 11] = [
    plain(".md"),
    plain(".txt"),
    // Comments, not a docstring: a module docstring and `__future__` imports
    // must stay the first statements.
    hash_lines(".py", true, true),
    star_block(".ts", "/**"),
    hash_lines(".sh", true, true),
    // JSON has no comment syntax; the block comment matches JSONC readers.
    star_block(".json", "/**"),
    star_block(".js", "/**"),
    FormatDescriptor {
        extension: ".html",
        preserve_shebang: false,
        strategy: WrapStrategy::Enclosed,
        open: "<!--",
        close: "-->",
    },
    star_block(".css", "/*"),
    hash_lines(".yaml", false, false),
    hash_lines(".yml", false, false),
];

/// All supported text descriptors in declared order.
pub fn text_formats() -> &'static [FormatDescriptor] {
    &TEXT_FORMATS
}

/// Supported text extensions in declared order.
pub fn text_extensions() -> impl Iterator<Item = &'static str> {
    TEXT_FORMATS.iter().map(|d| d.extension)
}

/// Lowercase extension of `path` with its leading dot, if any.
pub fn normalize_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

/// Whether `ext` (any case, with or without dot) names a PDF.
pub fn is_pdf_extension(ext: &str) -> bool {
    canonical(ext) == PDF_EXTENSION
}

/// Describe how to wrap files with extension `ext`.
///
/// Fails with [`ProvmarkError::UnsupportedFormat`] for anything outside the
/// supported text set. Callers check this before reading the file.
pub fn describe(ext: &str) -> Result<&'static FormatDescriptor> {
    lookup(ext).ok_or_else(|| ProvmarkError::UnsupportedFormat(display_ext(ext)))
}

/// Describe the file at `path` by its extension.
pub fn describe_path(path: &Path) -> Result<&'static FormatDescriptor> {
    match normalize_extension(path) {
        Some(ext) => describe(&ext),
        None => Err(ProvmarkError::UnsupportedFormat("(no extension)".into())),
    }
}

fn lookup(ext: &str) -> Option<&'static FormatDescriptor> {
    let wanted = canonical(ext);
    TEXT_FORMATS.iter().find(|d| d.extension == wanted)
}

fn canonical(ext: &str) -> String {
    let lower = ext.to_ascii_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

fn display_ext(ext: &str) -> String {
    if ext.is_empty() {
        "(no extension)".into()
    } else {
        canonical(ext)
    }
}
