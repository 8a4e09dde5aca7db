// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub capability for builds without PDF support.
//
// `watermark` always returns `CapabilityUnavailable`; callers are expected to
// check `available()` first and take the degraded path.

use provmark_core::error::{ProvmarkError, Result};

use crate::pdf::capability::PdfCapability;
use crate::template::PdfStamp;

/// No-op capability used when PDF support is not compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePdf;

impl PdfCapability for UnavailablePdf {
    fn name(&self) -> &str {
        "PDF watermarking (unavailable)"
    }

    fn available(&self) -> bool {
        false
    }

    fn watermark(&self, _input: &[u8], _stamp: &PdfStamp) -> Result<Vec<u8>> {
        tracing::warn!("PdfCapability::watermark called on unavailable stub");
        Err(ProvmarkError::CapabilityUnavailable(
            "PDF watermarking".to_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provmark_core::config::OrganizationInfo;
    use provmark_core::types::Timestamp;

    #[test]
    fn stub_reports_unavailable() {
        let stub = UnavailablePdf;
        assert!(!stub.available());

        let stamp = PdfStamp::new(&OrganizationInfo::default(), "t", "a.pdf", "00", Timestamp::now());
        let err = stub.watermark(b"%PDF-1.4", &stamp).unwrap_err();
        assert!(matches!(err, ProvmarkError::CapabilityUnavailable(_)));
    }
}
