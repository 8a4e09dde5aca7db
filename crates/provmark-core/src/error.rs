// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for provmark.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all provmark operations.
#[derive(Debug, Error)]
pub enum ProvmarkError {
    // -- Input errors --
    #[error("file or directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("not valid UTF-8 text: {}", .0.display())]
    InvalidText(PathBuf),

    // -- Invocation errors --
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("required hash is missing: {0}")]
    MissingHash(&'static str),

    // -- Optional capabilities --
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Integrity --
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ProvmarkError>;
