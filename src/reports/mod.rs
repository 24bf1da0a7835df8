//! Report generators for CLI output.
//!
//! Presentation here is deliberately thin: a JSON dump of the result
//! structures and a compact terminal summary. Anything richer lives with
//! the callers consuming the wire shape.

mod json;
mod summary;

pub use json::JsonReporter;
pub use summary::SummaryReporter;

use crate::diff::DiffResult;
use crate::model::SpdxDocument;
use crate::parsers::DocumentStats;
use thiserror::Error;

/// Errors during report generation.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact terminal summary
    Summary,
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Render a diff result.
    fn generate_diff_report(
        &self,
        result: &DiffResult,
        base_name: &str,
        new_name: &str,
    ) -> Result<String, ReportError>;

    /// Render a single parsed document (view mode).
    fn generate_document_report(
        &self,
        document: &SpdxDocument,
        stats: &DocumentStats,
    ) -> Result<String, ReportError>;
}

/// Build the reporter for a format.
#[must_use]
pub fn reporter_for(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Summary => {
            let reporter = SummaryReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
    }
}
