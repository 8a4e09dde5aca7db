// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// provmark-document — Turns provenance data into protected content.
//
// Provides the header/footer templates, the comment-syntax content wrapper for
// text formats, and the PDF watermarking capability (lopdf overlay behind the
// "pdf" feature, unavailable stub otherwise).

pub mod pdf;
pub mod template;
pub mod wrap;

pub use pdf::{pdf_capability, PdfCapability, UnavailablePdf};
pub use template::PdfStamp;
pub use wrap::{render_block, unwrap, wrap};

#[cfg(feature = "pdf")]
pub use pdf::LopdfOverlay;
