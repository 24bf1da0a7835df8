//! Unified error types for oci-sbom-diff.
//!
//! Fatal conditions (missing packages array, source IO failure, unreadable
//! document) surface through [`OciDiffError`]; everything recoverable is
//! absorbed at the point it occurs.

use crate::parsers::ExtractError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for oci-sbom-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OciDiffError {
    /// IO errors with path context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Errors during streaming package extraction
    #[error("Failed to extract packages: {0}")]
    Extract(#[from] ExtractError),

    /// Errors during whole-document parsing (viewer mode)
    #[error("Invalid SBOM document: {0}")]
    Document(String),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl OciDiffError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    /// Create a document error from a decode failure
    pub fn document(context: impl Into<String>) -> Self {
        Self::Document(context.into())
    }
}

/// Convenient Result type for oci-sbom-diff operations
pub type Result<T> = std::result::Result<T, OciDiffError>;
