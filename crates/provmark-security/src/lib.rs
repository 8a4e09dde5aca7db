// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// provmark-security — integrity primitives for protected documents.
//
// SHA-256 hashing over buffers and streamed files, immutable document
// records, and the manifest that indexes an output directory (assembly,
// atomic writing, regeneration from disk, and verification).

pub mod integrity;
pub mod manifest;
pub mod record;

pub use integrity::{hash_bytes, hash_file, hash_reader, verify_file};
pub use manifest::{Manifest, VerifyReport, read_manifest, regenerate, verify_manifest, write_manifest};
pub use record::{DocumentRecord, RecordParts, build_record};
