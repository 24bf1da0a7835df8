//! View command handler.
//!
//! Parses a single SBOM wholesale (no streaming) and renders the typed
//! document with its parse metrics.

use super::{exit_codes, write_output, ViewOptions};
use crate::parsers::parse_document;
use crate::reports::reporter_for;
use anyhow::Result;

/// Run the view command, returning the desired exit code.
pub fn run_view(options: &ViewOptions) -> Result<i32> {
    let (document, stats) = parse_document(&options.file)?;

    if !options.quiet {
        tracing::info!(
            "Parsed {} packages ({:.2} MB in {:.1}ms)",
            document.package_count(),
            stats.file_size,
            stats.parse_time
        );
    }

    let colored = options.colored && options.output_file.is_none();
    let reporter = reporter_for(options.format, colored);
    let report = reporter.generate_document_report(&document, &stats)?;
    write_output(&report, options.output_file.as_deref())?;

    Ok(exit_codes::SUCCESS)
}
