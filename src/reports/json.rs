//! JSON report generator.

use super::{ReportError, ReportGenerator};
use crate::diff::DiffResult;
use crate::model::SpdxDocument;
use crate::parsers::DocumentStats;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.map_err(|e| ReportError::JsonSerializationError(e.to_string()))
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Envelope for view-mode output: the document plus its parse metrics.
#[derive(Serialize)]
struct DocumentReport<'a> {
    data: &'a SpdxDocument,
    metrics: &'a DocumentStats,
}

impl ReportGenerator for JsonReporter {
    fn generate_diff_report(
        &self,
        result: &DiffResult,
        _base_name: &str,
        _new_name: &str,
    ) -> Result<String, ReportError> {
        self.render(result)
    }

    fn generate_document_report(
        &self,
        document: &SpdxDocument,
        stats: &DocumentStats,
    ) -> Result<String, ReportError> {
        self.render(&DocumentReport {
            data: document,
            metrics: stats,
        })
    }
}
