//! Data model for SPDX package records and documents.
//!
//! [`Package`] is the record type yielded by the streaming extractor and
//! carried through the diff; [`SpdxDocument`] is the typed whole-document
//! form used by the single-file view mode.

mod document;
mod package;

pub use document::{CreationInfo, Relationship, SpdxDocument};
pub use package::{Checksum, ExternalRef, Package, PURL_REFERENCE_TYPE};
