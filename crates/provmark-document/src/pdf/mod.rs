// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the watermarking capability and its implementations.
//
// Callers depend only on `PdfCapability`. Builds without the `pdf` feature
// get the unavailable stub, and the protection pipeline degrades to a
// metadata-only record instead of failing.

pub mod capability;
pub mod stub;

#[cfg(feature = "pdf")]
pub mod overlay;

pub use capability::PdfCapability;
pub use stub::UnavailablePdf;

#[cfg(feature = "pdf")]
pub use overlay::LopdfOverlay;

/// Returns the best PDF capability compiled into this build.
pub fn pdf_capability() -> Box<dyn PdfCapability> {
    #[cfg(feature = "pdf")]
    {
        // lopdf: pure-Rust parse, overlay append, and re-serialise.
        Box::new(overlay::LopdfOverlay::new())
    }
    #[cfg(not(feature = "pdf"))]
    {
        Box::new(stub::UnavailablePdf)
    }
}
