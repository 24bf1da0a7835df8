//! Benchmarks for streaming extraction and the diff engine.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use oci_sbom_diff::{DiffEngine, ExtractorConfig, MemoryChunkSource, PackageStream};
use std::hint::black_box;

/// Generate a synthetic SPDX document with `count` OCI packages.
fn synthetic_sbom(count: usize, digest_seed: u64) -> String {
    let packages: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"name": "image-{i}", "SPDXID": "SPDXRef-Package-{i}", "downloadLocation": "NOASSERTION", "licenseConcluded": "MIT", "externalRefs": [{{"referenceCategory": "PACKAGE-MANAGER", "referenceType": "purl", "referenceLocator": "pkg:oci/image-{i}@sha256:{:016x}?arch=amd64"}}]}}"#,
                digest_seed.wrapping_mul(i as u64 + 1)
            )
        })
        .collect();
    format!(
        r#"{{"spdxVersion": "SPDX-2.3", "name": "bench", "packages": [{}]}}"#,
        packages.join(",")
    )
}

fn bench_extract(c: &mut Criterion) {
    let doc = synthetic_sbom(1000, 0xdead_beef);
    let mut group = c.benchmark_group("extract_1000_packages");

    for &chunk_size in &[64 * 1024, 4 * 1024, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let source =
                        MemoryChunkSource::new(doc.as_str()).with_chunk_size(chunk_size);
                    let count = PackageStream::new(source, ExtractorConfig::default())
                        .filter_map(Result::ok)
                        .count();
                    black_box(count)
                });
            },
        );
    }
    group.finish();
}

fn bench_diff(c: &mut Criterion) {
    let base = synthetic_sbom(1000, 0xdead_beef);
    let new = synthetic_sbom(1000, 0xfeed_face);

    c.bench_function("diff_1000_vs_1000", |b| {
        b.iter(|| {
            let result = DiffEngine::new()
                .diff(
                    MemoryChunkSource::new(base.as_str()),
                    MemoryChunkSource::new(new.as_str()),
                )
                .expect("bench diff succeeds");
            black_box(result.summary)
        });
    });
}

criterion_group!(benches, bench_extract, bench_diff);
criterion_main!(benches);
