//! SPDX package record and external reference structures.

use serde::{Deserialize, Serialize};

/// The `referenceType` value identifying a package URL external reference.
pub const PURL_REFERENCE_TYPE: &str = "purl";

/// A single package record from an SPDX document's `packages` array.
///
/// Field names follow the SPDX JSON shape. Only `name` is required to
/// decode; everything else degrades gracefully so that sparse or partially
/// malformed records can still be extracted (best-effort policy).
///
/// A `Package` is an immutable value once extracted — diff identity is
/// derived from it (see [`crate::diff::keys`]), never stored in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,

    #[serde(
        rename = "SPDXID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub spdx_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,

    #[serde(default)]
    pub download_location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_declared: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checksums: Vec<Checksum>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_refs: Vec<ExternalRef>,
}

impl Package {
    /// The package URL locator of this record, if any.
    ///
    /// Returns the `referenceLocator` of the first external reference with
    /// `referenceType == "purl"`, preserving the original reference order.
    #[must_use]
    pub fn purl(&self) -> Option<&str> {
        self.external_refs
            .iter()
            .find(|r| r.reference_type == PURL_REFERENCE_TYPE)
            .map(|r| r.reference_locator.as_str())
    }
}

/// An external reference attached to a package (purl, CPE, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRef {
    #[serde(default)]
    pub reference_category: String,
    #[serde(default)]
    pub reference_type: String,
    #[serde(default)]
    pub reference_locator: String,
}

impl ExternalRef {
    /// Construct a purl reference (the only type the diff consumes).
    #[must_use]
    pub fn purl(locator: impl Into<String>) -> Self {
        Self {
            reference_category: "PACKAGE-MANAGER".to_string(),
            reference_type: PURL_REFERENCE_TYPE.to_string(),
            reference_locator: locator.into(),
        }
    }
}

/// A package checksum entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checksum {
    pub algorithm: String,
    pub checksum_value: String,
}
