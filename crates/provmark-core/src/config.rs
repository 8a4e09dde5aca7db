// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Protection configuration — organization identity and generator metadata.
//
// The configuration is built once at startup and passed by reference into the
// boilerplate templates and the manifest assembler. Nothing reads it from
// process-wide state.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProvmarkError, Result};

/// Generator name recorded in every manifest.
pub const GENERATOR_NAME: &str = "provmark";

/// Manifest schema version. Bump only when the JSON layout changes.
pub const MANIFEST_VERSION: &str = "1.0.0";

/// Organization identity embedded in headers, footers, PDF overlays and the
/// manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationInfo {
    pub name: String,
    pub cage_code: String,
    pub duns_number: String,
    pub trademark: String,
    pub copyright_year: String,
    pub website: String,
    pub email: String,
}

impl OrganizationInfo {
    /// Opaque identifiers copied into the manifest root.
    ///
    /// A `BTreeMap` keeps serialized key order stable.
    pub fn identifiers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("company".to_owned(), self.name.clone()),
            ("cage_code".to_owned(), self.cage_code.clone()),
            ("duns_number".to_owned(), self.duns_number.clone()),
            ("trademark".to_owned(), self.trademark.clone()),
        ])
    }
}

impl Default for OrganizationInfo {
    fn default() -> Self {
        Self {
            name: "Example Organization, LLC".into(),
            cage_code: "00000".into(),
            duns_number: "000000000".into(),
            trademark: "provmark™".into(),
            copyright_year: "2026".into(),
            website: "https://example.org".into(),
            email: "legal@example.org".into(),
        }
    }
}

/// Settings threaded through every protection operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectConfig {
    /// Schema version written to `manifest_version`.
    pub manifest_version: String,
    /// Tool name written to `generator`.
    pub generator: String,
    /// Tool version written to `generator_version`.
    pub generator_version: String,
    /// Organization identity.
    pub organization: OrganizationInfo,
}

impl Default for ProtectConfig {
    fn default() -> Self {
        Self {
            manifest_version: MANIFEST_VERSION.into(),
            generator: GENERATOR_NAME.into(),
            generator_version: env!("CARGO_PKG_VERSION").into(),
            organization: OrganizationInfo::default(),
        }
    }
}

impl ProtectConfig {
    /// Load a configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults, so a file may override only
    /// the organization block.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ProvmarkError::Configuration(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| {
            ProvmarkError::Configuration(format!("invalid config {}: {err}", path.display()))
        })
    }
}
