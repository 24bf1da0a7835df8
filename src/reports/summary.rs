//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportError, ReportGenerator};
use crate::diff::{DiffResult, ModifiedPair};
use crate::model::{Package, SpdxDocument};
use crate::parsers::DocumentStats;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Identify a package in a report line: purl when present, else name@version.
fn package_label(pkg: &Package) -> String {
    pkg.purl().map_or_else(
        || {
            format!(
                "{}@{}",
                pkg.name,
                pkg.version_info.as_deref().unwrap_or("?")
            )
        },
        str::to_string,
    )
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_diff_report(
        &self,
        result: &DiffResult,
        base_name: &str,
        new_name: &str,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        lines.push(self.color("OCI Package Diff", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {} → {}",
            self.color("Files:", "cyan"),
            base_name,
            new_name
        ));
        lines.push(format!(
            "{}  {} → {} images",
            self.color("Size:", "cyan"),
            result.summary.total_base,
            result.summary.total_new
        ));
        lines.push(String::new());

        if !result.has_changes() {
            lines.push("No changes detected".to_string());
        } else {
            lines.push(self.color("Changes:", "bold"));
            for pkg in &result.added {
                lines.push(format!(
                    "  {} {}",
                    self.color("+", "green"),
                    package_label(pkg)
                ));
            }
            for pkg in &result.removed {
                lines.push(format!(
                    "  {} {}",
                    self.color("-", "red"),
                    package_label(pkg)
                ));
            }
            for ModifiedPair {
                old,
                new,
                change_summary,
            } in &result.modified
            {
                lines.push(format!(
                    "  {} {} → {} ({})",
                    self.color("~", "yellow"),
                    package_label(old),
                    package_label(new),
                    change_summary
                ));
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "{}  +{} -{} ~{} ={}  in {:.1}ms",
            self.color("Totals:", "cyan"),
            result.summary.added,
            result.summary.removed,
            result.summary.modified,
            result.summary.unchanged,
            result.metrics.parse_and_diff_time
        ));

        Ok(lines.join("\n"))
    }

    fn generate_document_report(
        &self,
        document: &SpdxDocument,
        stats: &DocumentStats,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        let title = if document.name.is_empty() {
            "SBOM Document"
        } else {
            document.name.as_str()
        };
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if !document.spdx_version.is_empty() {
            lines.push(format!(
                "{}  {}",
                self.color("Version:", "cyan"),
                document.spdx_version
            ));
        }
        if let Some(created) = document
            .creation_info
            .as_ref()
            .and_then(crate::model::CreationInfo::created_time)
        {
            lines.push(format!(
                "{}  {}",
                self.color("Created:", "cyan"),
                created.to_rfc3339()
            ));
        }
        lines.push(format!(
            "{}  {} packages, {} relationships",
            self.color("Records:", "cyan"),
            document.package_count(),
            document.relationship_count()
        ));
        lines.push(format!(
            "{}  {:.2} MB parsed in {:.1}ms",
            self.color("Input:", "cyan"),
            stats.file_size,
            stats.parse_time
        ));

        Ok(lines.join("\n"))
    }
}
