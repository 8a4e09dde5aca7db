// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the provmark-document crate: wrapping a
// mid-sized source file in each comment style.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use provmark_core::config::OrganizationInfo;
use provmark_core::format::describe;
use provmark_core::types::Timestamp;
use provmark_document::template::{footer, header};
use provmark_document::wrap;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Wrap ~2,000 lines of text for one format of each wrap strategy.
fn bench_wrap(c: &mut Criterion) {
    let org = OrganizationInfo::default();
    let head = header(&org, "bench.txt", &"0".repeat(64), Timestamp::now());
    let foot = footer(&org);
    let body = "let value = compute(input, 42); // trailing comment\n".repeat(2_000);

    for ext in [".md", ".py", ".ts", ".sh"] {
        let Ok(descriptor) = describe(ext) else { continue };
        c.bench_function(&format!("wrap {ext} (2000 lines)"), |b| {
            b.iter(|| black_box(wrap(black_box(&body), descriptor, &head, &foot)));
        });
    }
}

criterion_group!(benches, bench_wrap);
criterion_main!(benches);
