//! Human-readable change labels for modified package groups.

use super::keys::purl_digest;
use crate::model::Package;

/// Label emitted when neither digest nor license differences are visible
/// on the representative pair. This can legitimately occur: the group was
/// flagged because its artifact-key *sets* differ, while the two records
/// actually compared may match on both fields.
pub const FALLBACK_LABEL: &str = "Metadata";

/// Describe what changed between the representative records of a modified
/// group: `"Digest/Version"`, `"License"`, both joined with `" & "`, or
/// [`FALLBACK_LABEL`].
#[must_use]
pub fn change_summary(old: &Package, new: &Package) -> String {
    let mut changes = Vec::new();

    if purl_digest(old) != purl_digest(new) {
        changes.push("Digest/Version");
    }
    if old.license_concluded != new.license_concluded {
        changes.push("License");
    }

    if changes.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        changes.join(" & ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExternalRef;

    fn package(purl: &str, license: Option<&str>) -> Package {
        Package {
            name: "app".to_string(),
            spdx_id: None,
            version_info: None,
            download_location: String::new(),
            license_concluded: license.map(str::to_string),
            license_declared: None,
            copyright_text: None,
            checksums: Vec::new(),
            external_refs: vec![ExternalRef::purl(purl)],
        }
    }

    #[test]
    fn test_digest_change() {
        let old = package("pkg:oci/app@sha256:aaa?arch=amd64", Some("MIT"));
        let new = package("pkg:oci/app@sha256:bbb?arch=amd64", Some("MIT"));
        assert_eq!(change_summary(&old, &new), "Digest/Version");
    }

    #[test]
    fn test_license_change() {
        let old = package("pkg:oci/app@sha256:aaa", Some("MIT"));
        let new = package("pkg:oci/app@sha256:aaa", Some("Apache-2.0"));
        assert_eq!(change_summary(&old, &new), "License");
    }

    #[test]
    fn test_license_appearing_counts_as_change() {
        let old = package("pkg:oci/app@sha256:aaa", None);
        let new = package("pkg:oci/app@sha256:aaa", Some("MIT"));
        assert_eq!(change_summary(&old, &new), "License");
    }

    #[test]
    fn test_both_changes_joined() {
        let old = package("pkg:oci/app@sha256:aaa", Some("MIT"));
        let new = package("pkg:oci/app@sha256:bbb", Some("Apache-2.0"));
        assert_eq!(change_summary(&old, &new), "Digest/Version & License");
    }

    #[test]
    fn test_fallback_when_representatives_match() {
        let old = package("pkg:oci/app@sha256:aaa", Some("MIT"));
        let new = package("pkg:oci/app@sha256:aaa", Some("MIT"));
        assert_eq!(change_summary(&old, &new), FALLBACK_LABEL);
    }
}
