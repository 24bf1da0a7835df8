#![no_main]
use libfuzzer_sys::fuzz_target;
use oci_sbom_diff::{ExtractorConfig, MemoryChunkSource, PackageStream};

/// Fuzz the streaming extractor directly.
///
/// Runs the raw input and an envelope-wrapped variant so the scanner's
/// element phase is reached even when the input lacks a packages key.
/// Small chunk sizes exercise every boundary-straddling path.
fuzz_target!(|data: &[u8]| {
    for chunk_size in [1usize, 7, 4096] {
        let source = MemoryChunkSource::new(data.to_vec()).with_chunk_size(chunk_size);
        for record in PackageStream::new(source, ExtractorConfig::default()).take(50_000) {
            let _ = record;
        }
    }

    if data.len() < 10_000 {
        let mut wrapped = Vec::from(&br#"{"spdxVersion":"SPDX-2.3","packages":["#[..]);
        wrapped.extend_from_slice(data);
        wrapped.extend_from_slice(b"]}");
        let source = MemoryChunkSource::new(wrapped).with_chunk_size(3);
        for record in PackageStream::new(source, ExtractorConfig::default()).take(50_000) {
            let _ = record;
        }
    }
});
