//! SBOM input parsing: streaming extraction and whole-document decode.
//!
//! The streaming side ([`PackageStream`]) pulls byte chunks from a
//! [`ChunkSource`] and yields package records one at a time; the document
//! side ([`parse_document`]) is the ordinary bounded decode used by the
//! view command.

mod document;
pub mod streaming;
pub mod traits;

pub use document::{parse_document, parse_document_str, DocumentStats};
pub use streaming::{
    ExtractProgress, ExtractorConfig, PackageStream, ProgressCallback, RecordFilter,
    DEFAULT_ARRAY_KEY, PROGRESS_INTERVAL,
};
pub use traits::{
    ChunkSource, ExtractError, FileChunkSource, MemoryChunkSource, DEFAULT_CHUNK_SIZE,
};
