//! Typed SPDX document for the single-file view mode.
//!
//! This is the ordinary, non-streaming decode target: an already-bounded
//! file is deserialized wholesale into [`SpdxDocument`]. The streaming
//! extractor never touches these types.

use super::Package;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete SPDX document as found in the input JSON.
///
/// All fields default so that partial documents still decode; the view
/// command reports what is present rather than validating conformance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    #[serde(default)]
    pub spdx_version: String,

    #[serde(rename = "SPDXID", default)]
    pub spdx_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub data_license: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_info: Option<CreationInfo>,

    #[serde(default)]
    pub packages: Vec<Package>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl SpdxDocument {
    /// Number of package records in the document.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Number of relationship records in the document.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }
}

/// SPDX `creationInfo` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<String>,
}

impl CreationInfo {
    /// Parse the `created` timestamp, if present and well-formed.
    ///
    /// SPDX mandates RFC 3339 but real documents stray; a malformed value
    /// is reported as absent rather than failing the decode.
    #[must_use]
    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}

/// SPDX relationship record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default)]
    pub spdx_element_id: String,
    #[serde(default)]
    pub relationship_type: String,
    #[serde(default)]
    pub related_spdx_element: String,
}
