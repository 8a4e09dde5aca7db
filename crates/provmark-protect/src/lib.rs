// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// provmark-protect — Produces protected copies and their manifest.
//
// `pipeline` protects one file, `batch` drives a directory through it, and
// `ops` are the whole-invocation entry points the CLI calls.

pub mod batch;
pub mod context;
pub mod ops;
pub mod pipeline;

pub use batch::{BatchOutcome, process_directory};
pub use context::ProtectContext;
pub use ops::{protect_batch, protect_single, regenerate_manifest, verify_output};
pub use pipeline::{output_path, protect_pdf, protect_text_file};
