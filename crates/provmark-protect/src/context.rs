// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Everything a protection run needs besides the files themselves.

use provmark_core::ProtectConfig;
use provmark_core::types::{Clock, SystemClock, Timestamp};
use provmark_document::pdf::{PdfCapability, pdf_capability};

/// Immutable configuration plus the injected PDF capability and clock.
///
/// Built once per invocation and passed by reference to every operation.
pub struct ProtectContext {
    config: ProtectConfig,
    pdf: Box<dyn PdfCapability>,
    clock: Box<dyn Clock>,
}

impl ProtectContext {
    /// System clock and the best PDF capability compiled into this build.
    pub fn new(config: ProtectConfig) -> Self {
        Self {
            config,
            pdf: pdf_capability(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_pdf(mut self, pdf: Box<dyn PdfCapability>) -> Self {
        self.pdf = pdf;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &ProtectConfig {
        &self.config
    }

    pub fn pdf(&self) -> &dyn PdfCapability {
        self.pdf.as_ref()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// "name version", as stamped into PDF metadata.
    pub fn generator_label(&self) -> String {
        format!("{} {}", self.config.generator, self.config.generator_version)
    }
}

impl Default for ProtectContext {
    fn default() -> Self {
        Self::new(ProtectConfig::default())
    }
}

impl std::fmt::Debug for ProtectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectContext")
            .field("config", &self.config)
            .field("pdf", &self.pdf.name())
            .finish_non_exhaustive()
    }
}
