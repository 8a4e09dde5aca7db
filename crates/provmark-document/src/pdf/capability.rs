// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability trait for PDF watermarking.

use provmark_core::error::Result;

use crate::template::PdfStamp;

/// Stamps a provenance overlay onto every page of a PDF.
pub trait PdfCapability {
    /// Human-readable implementation name, used in logs.
    fn name(&self) -> &str;

    /// Whether [`PdfCapability::watermark`] can succeed in this build.
    fn available(&self) -> bool;

    /// Return a new PDF: `input` with `stamp` drawn over each page and its
    /// document information dictionary updated.
    fn watermark(&self, input: &[u8], stamp: &PdfStamp) -> Result<Vec<u8>>;
}
