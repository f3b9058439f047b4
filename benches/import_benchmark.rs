//! Benchmarks for parsing and importing SPDX documents.
//!
//! Run with: cargo bench --bench import_benchmark

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sbom_importer::config::ImportConfig;
use sbom_importer::model::{AttachmentContent, SpdxDocumentIndex, User};
use sbom_importer::parsers::{SpdxFileType, parse_spdx_str};
use sbom_importer::{InMemorySink, SpdxBomImporter};
use std::fmt::Write;
use std::hint::black_box;

const HEADER: &str = "SPDXVersion: SPDX-2.2\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\nDocumentName: bench\nDocumentNamespace: http://example.org/bench\nCreator: Tool: bench\nCreated: 2024-01-01T00:00:00Z\nRelationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-p0\n";

fn package(out: &mut String, i: usize) {
    let _ = write!(
        out,
        "\nPackageName: pkg-{i}\nSPDXID: SPDXRef-p{i}\nPackageVersion: 1.{}.{}\nPackageDownloadLocation: NOASSERTION\nPackageLicenseDeclared: MIT\n",
        i % 10,
        i % 100
    );
}

/// Root package containing `count` leaves.
fn wide_document(count: usize) -> String {
    let mut out = HEADER.to_string();
    for i in 0..=count {
        package(&mut out, i);
    }
    for i in 1..=count {
        let _ = writeln!(out, "Relationship: SPDXRef-p0 CONTAINS SPDXRef-p{i}");
    }
    out
}

/// Chain of `depth` packages, each containing the next.
fn deep_document(depth: usize) -> String {
    let mut out = HEADER.to_string();
    for i in 0..=depth {
        package(&mut out, i);
    }
    for i in 0..depth {
        let _ = writeln!(out, "Relationship: SPDXRef-p{i} CONTAINS SPDXRef-p{}", i + 1);
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_tag_value");
    for size in [100, 1_000] {
        let content = wide_document(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| {
                let doc = parse_spdx_str(black_box(content), SpdxFileType::TagValue);
                black_box(doc)
            });
        });
    }
    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let content = wide_document(1_000);
    let doc = parse_spdx_str(&content, SpdxFileType::TagValue).expect("bench document parses");

    c.bench_function("index_1000_packages", |b| {
        b.iter(|| {
            let index = SpdxDocumentIndex::build(black_box(&doc));
            black_box(index.described_packages())
        });
    });
}

fn bench_import(c: &mut Criterion) {
    let user = User::new("bench@example.org", "Perf");
    let content_ref = AttachmentContent::new("bench", "bench.spdx");

    let mut group = c.benchmark_group("import_release");
    group.sample_size(20);
    for (label, content) in [
        ("wide_500", wide_document(500)),
        ("deep_200", deep_document(200)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &content, |b, content| {
            b.iter(|| {
                let importer =
                    SpdxBomImporter::new(InMemorySink::new(), ImportConfig::default());
                black_box(importer.import_as_release(
                    content.as_bytes(),
                    &content_ref,
                    &user,
                ))
            });
        });
    }
    group.finish();
}

fn bench_reimport(c: &mut Criterion) {
    let user = User::new("bench@example.org", "Perf");
    let content_ref = AttachmentContent::new("bench", "bench.spdx");
    let content = wide_document(500);
    let importer = SpdxBomImporter::new(InMemorySink::new(), ImportConfig::default());
    let _ = importer.import_as_release(content.as_bytes(), &content_ref, &user);

    c.bench_function("reimport_wide_500", |b| {
        b.iter(|| black_box(importer.import_as_release(content.as_bytes(), &content_ref, &user)));
    });
}

criterion_group!(benches, bench_parse, bench_index, bench_import, bench_reimport);
criterion_main!(benches);
