// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// provmark — Core types, configuration, format registry and error definitions
// shared across all crates.

pub mod config;
pub mod error;
pub mod format;
pub mod human_errors;
pub mod scan;
pub mod types;

pub use config::{OrganizationInfo, ProtectConfig};
pub use error::ProvmarkError;
pub use format::{FormatDescriptor, WrapStrategy};
pub use types::*;
