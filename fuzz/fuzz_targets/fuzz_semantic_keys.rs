#![no_main]
use libfuzzer_sys::fuzz_target;
use oci_sbom_diff::diff::keys::{artifact_key, semantic_key};
use oci_sbom_diff::{ExternalRef, Package};

/// Fuzz key derivation totality over arbitrary purl locators.
fuzz_target!(|data: &[u8]| {
    if let Ok(locator) = std::str::from_utf8(data) {
        let pkg = Package {
            name: "fuzz".to_string(),
            spdx_id: None,
            version_info: None,
            download_location: String::new(),
            license_concluded: None,
            license_declared: None,
            copyright_text: None,
            checksums: Vec::new(),
            external_refs: vec![ExternalRef::purl(locator)],
        };
        let _ = artifact_key(&pkg);
        let _ = semantic_key(&pkg);
    }
});
