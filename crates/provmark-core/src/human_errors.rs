// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to a plain sentence with a suggestion, plus
// the scope of the failure: a single file, or the whole invocation.

use crate::error::ProvmarkError;

/// How far a failure reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the file being processed fails; a batch carries on.
    PerFile,
    /// The whole operation stops before any file I/O.
    Invocation,
    /// Reduced output is produced instead of failing.
    Degraded,
}

impl Scope {
    /// Short note telling the user what the failure left behind.
    pub fn describe(self) -> &'static str {
        match self {
            Self::PerFile => "only this file was affected",
            Self::Invocation => "nothing was protected",
            Self::Degraded => "output was written with reduced protection",
        }
    }
}

/// A human-readable error with a suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain sentence shown first.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub scope: Scope,
}

/// Convert a `ProvmarkError` into a `HumanError`.
pub fn humanize_error(err: &ProvmarkError) -> HumanError {
    match err {
        ProvmarkError::NotFound(path) => HumanError {
            message: format!("Nothing exists at {}.", path.display()),
            suggestion: "Check the path for typos, or run from the directory that contains it."
                .into(),
            scope: Scope::Invocation,
        },

        ProvmarkError::UnsupportedFormat(ext) => HumanError {
            message: format!("Files of type {ext} can't be protected."),
            suggestion: "Supported types are .md .txt .py .ts .sh .json .js .html .css .yaml .yml, plus .pdf.".into(),
            scope: Scope::PerFile,
        },

        ProvmarkError::InvalidText(path) => HumanError {
            message: format!("{} is not UTF-8 text.", path.display()),
            suggestion: "Convert the file to UTF-8, or leave it out of the batch.".into(),
            scope: Scope::PerFile,
        },

        ProvmarkError::Configuration(detail) => HumanError {
            message: "The request can't be carried out as given.".into(),
            suggestion: format!("Adjust the arguments or config file. ({detail})"),
            scope: Scope::Invocation,
        },

        ProvmarkError::MissingHash(field) => HumanError {
            message: format!("Internal error: the {field} was not computed."),
            suggestion: "Please report this with the command you ran.".into(),
            scope: Scope::Invocation,
        },

        ProvmarkError::CapabilityUnavailable(name) => HumanError {
            message: format!("{name} is not available in this build."),
            suggestion: "PDFs are recorded in the manifest without a watermark. Rebuild with the `pdf` feature to stamp them.".into(),
            scope: Scope::Degraded,
        },

        ProvmarkError::PdfError(_) => HumanError {
            message: "This PDF could not be read or stamped.".into(),
            suggestion: "The file may be damaged or encrypted. Try re-saving it from a PDF viewer.".into(),
            scope: Scope::PerFile,
        },

        ProvmarkError::IntegrityMismatch { .. } => HumanError {
            message: "A protected file no longer matches its recorded hash.".into(),
            suggestion: "The file changed after it was protected. Re-run protection or regenerate the manifest.".into(),
            scope: Scope::PerFile,
        },

        ProvmarkError::Io(io) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check permissions and free disk space. ({io})"),
            scope: Scope::PerFile,
        },

        ProvmarkError::Serialization(_) => HumanError {
            message: "The manifest could not be read or written as JSON.".into(),
            suggestion: "If manifest.json was edited by hand, regenerate it with --manifest."
                .into(),
            scope: Scope::Invocation,
        },
    }
}
