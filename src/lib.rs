//! **Streaming OCI container-image diff for large SPDX SBOM documents.**
//!
//! `oci-sbom-diff` compares two SPDX JSON SBOMs — a base and a new
//! snapshot — and reports which OCI container images were added, removed,
//! or modified. Input files can be large enough that parsing both
//! documents into memory at once is undesirable, so the core extracts
//! package records with a single forward streaming pass per file instead
//! of materializing a document tree.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: [`PackageStream`] scans a [`ChunkSource`] for the
//!   top-level `packages` array and lazily yields each element that passes
//!   the configured filter. [`parsers::parse_document`] is the separate,
//!   ordinary whole-document decode used by the single-file view mode.
//! - **[`diff`]**: [`diff::keys`] derives each record's artifact key (its
//!   physical identity) and semantic key (the coarser identity grouping
//!   multi-arch variants of one image); [`DiffEngine`] groups both
//!   documents by semantic key and classifies every group as added,
//!   removed, modified, or unchanged.
//! - **[`worker`]**: runs a diff on a dedicated thread, reporting progress
//!   and exactly one terminal result over a channel.
//! - **[`reports`]**: JSON and terminal-summary renderings of the result.
//!
//! ## Getting Started: Diffing Two SBOMs
//!
//! ```no_run
//! use oci_sbom_diff::{DiffEngine, FileChunkSource};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = DiffEngine::new();
//!     let diff = engine.diff(
//!         FileChunkSource::open(Path::new("base.spdx.json"))?,
//!         FileChunkSource::open(Path::new("new.spdx.json"))?,
//!     )?;
//!
//!     println!("Images added:    {}", diff.summary.added);
//!     println!("Images removed:  {}", diff.summary.removed);
//!     for pair in &diff.modified {
//!         println!("~ {} ({})", pair.old.name, pair.change_summary);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Background Diffing with Progress
//!
//! ```no_run
//! use oci_sbom_diff::worker::{spawn_diff, DiffRequest, WorkerMessage};
//!
//! let task = spawn_diff(DiffRequest {
//!     base_file: "base.spdx.json".into(),
//!     new_file: "new.spdx.json".into(),
//! });
//!
//! for message in task.iter() {
//!     match message {
//!         WorkerMessage::Progress(text) => eprintln!("{text}"),
//!         WorkerMessage::Success(result) => println!("{:?}", result.summary),
//!         WorkerMessage::Error(text) => eprintln!("failed: {text}"),
//!     }
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod diff;
pub mod error;
pub mod model;
pub mod parsers;
pub mod reports;
pub mod worker;

// Re-export main types for convenience
pub use diff::{
    change_summary, DiffEngine, DiffMetrics, DiffResult, DiffSummary, ModifiedPair,
    SemanticGroups, OCI_PURL_PREFIX,
};
pub use error::{OciDiffError, Result};
pub use model::{ExternalRef, Package, SpdxDocument};
pub use parsers::{
    parse_document, parse_document_str, ChunkSource, ExtractError, ExtractorConfig,
    FileChunkSource, MemoryChunkSource, PackageStream,
};
pub use reports::{ReportFormat, ReportGenerator};
pub use worker::{spawn_diff, DiffRequest, DiffTask, WorkerMessage};
