//! Command handlers for the oci-sbom-diff CLI.

pub mod diff;
pub mod view;

pub use diff::run_diff;
pub use view::run_view;

use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// No changes detected (or `--fail-on-change` not set)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected and `--fail-on-change` was set
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Options for the `diff` command.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub base: PathBuf,
    pub new: PathBuf,
    pub format: ReportFormat,
    pub output_file: Option<PathBuf>,
    pub fail_on_change: bool,
    pub quiet: bool,
    pub colored: bool,
}

/// Options for the `view` command.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub file: PathBuf,
    pub format: ReportFormat,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub colored: bool,
}

/// Write a report to the target file, or stdout when none is given.
pub(crate) fn write_output(content: &str, target: Option<&Path>) -> anyhow::Result<()> {
    match target {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Short display label for an input path.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
