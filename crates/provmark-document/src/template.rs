// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Provenance boilerplate — the header and footer text injected into every
// protected text file, and the overlay lines stamped onto PDFs.

use provmark_core::config::OrganizationInfo;
use provmark_core::types::Timestamp;

const RULE: &str = "══════════════════════════════════════════════════════════════════════════════════";

/// Header block: organization banner, identifiers, file name, original hash
/// and generation time. No leading or trailing blank lines.
pub fn header(org: &OrganizationInfo, filename: &str, original_hash: &str, generated: Timestamp) -> String {
    let lines = [
        format!("╔{RULE}╗"),
        format!("║  {} — PROPRIETARY & CONFIDENTIAL", org.name.to_uppercase()),
        format!(
            "║  CAGE: {} | DUNS: {} | {}",
            org.cage_code, org.duns_number, org.trademark
        ),
        format!("╠{RULE}╣"),
        format!("║  Document: {filename}"),
        format!("║  Document Hash: {original_hash}"),
        format!("║  Generated: {generated}"),
        format!("╚{RULE}╝"),
    ];
    lines.join("\n")
}

/// Footer block: copyright, trade-secret notice and contact details.
pub fn footer(org: &OrganizationInfo) -> String {
    let lines = [
        format!("╔{RULE}╗"),
        format!("║  © {} {}. All Rights Reserved.", org.copyright_year, org.name),
        "║  This document contains trade secrets and proprietary information protected".to_owned(),
        "║  under 18 U.S.C. § 1836 (Defend Trade Secrets Act of 2016).".to_owned(),
        "║  Unauthorized reproduction or distribution is prohibited.".to_owned(),
        format!("╠{RULE}╣"),
        format!("║  {} is a registered trademark of {}", org.trademark, org.name),
        format!("║  Website: {} | Email: {}", org.website, org.email),
        format!("╚{RULE}╝"),
    ];
    lines.join("\n")
}

/// Text lines stamped onto each PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfStamp {
    /// Drawn near the top edge, first line highest.
    pub header_lines: Vec<String>,
    /// Drawn near the bottom edge, first line highest.
    pub footer_lines: Vec<String>,
    /// Large diagonal text across the page centre.
    pub diagonal: String,
    /// Document information dictionary entries, e.g. `("Title", "...")`.
    pub metadata: Vec<(String, String)>,
}

impl PdfStamp {
    /// Build the overlay for a PDF named `filename` with `original_hash`.
    pub fn new(
        org: &OrganizationInfo,
        generator: &str,
        filename: &str,
        original_hash: &str,
        generated: Timestamp,
    ) -> Self {
        let short_hash: String = original_hash.chars().take(32).collect();
        Self {
            header_lines: vec![
                format!("{} — CAGE: {}", org.name.to_uppercase(), org.cage_code),
                format!("{} — {generated}", org.trademark),
            ],
            footer_lines: vec![
                format!("© {} {} — CONFIDENTIAL", org.copyright_year, org.name),
                format!("Hash: {short_hash}..."),
            ],
            diagonal: "PROPRIETARY".to_owned(),
            metadata: vec![
                ("Title".into(), format!("Protected Document - {filename}")),
                ("Author".into(), org.name.clone()),
                ("Subject".into(), "IP Protected Document".into()),
                ("Creator".into(), generator.to_owned()),
                ("Producer".into(), org.trademark.clone()),
                (
                    "Keywords".into(),
                    format!("CAGE:{}, Hash:{original_hash}", org.cage_code),
                ),
            ],
        }
    }
}
