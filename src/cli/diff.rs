//! Diff command handler.
//!
//! Drives the worker task, relays its progress to the log, and renders
//! the terminal result.

use super::{exit_codes, file_label, write_output, DiffOptions};
use crate::reports::reporter_for;
use crate::worker::{spawn_diff, DiffRequest, WorkerMessage};
use anyhow::{anyhow, Result};

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_diff(options: &DiffOptions) -> Result<i32> {
    let task = spawn_diff(DiffRequest {
        base_file: options.base.clone(),
        new_file: options.new.clone(),
    });

    let mut terminal = None;
    for message in task.iter() {
        match message {
            WorkerMessage::Progress(text) => {
                if !options.quiet {
                    tracing::info!("{text}");
                }
            }
            other => {
                terminal = Some(other);
                break;
            }
        }
    }

    let result = match terminal {
        Some(WorkerMessage::Success(result)) => *result,
        Some(WorkerMessage::Error(text)) => return Err(anyhow!(text)),
        _ => return Err(anyhow!("diff worker exited without a terminal message")),
    };

    if !options.quiet {
        tracing::info!(
            "Compared {} base and {} new image groups in {:.1}ms",
            result.summary.total_base,
            result.summary.total_new,
            result.metrics.parse_and_diff_time
        );
    }

    // Color only applies to terminal output, never to files.
    let colored = options.colored && options.output_file.is_none();
    let reporter = reporter_for(options.format, colored);
    let report = reporter.generate_diff_report(
        &result,
        &file_label(&options.base),
        &file_label(&options.new),
    )?;
    write_output(&report, options.output_file.as_deref())?;

    if options.fail_on_change && result.has_changes() {
        return Ok(exit_codes::CHANGES_DETECTED);
    }
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportFormat;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn sbom_file(purl: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"packages": [{{"name": "app", "externalRefs": [{{"referenceCategory": "PACKAGE-MANAGER", "referenceType": "purl", "referenceLocator": "{purl}"}}]}}]}}"#
        )
        .expect("write fixture");
        file
    }

    fn options(base: &NamedTempFile, new: &NamedTempFile, fail_on_change: bool) -> DiffOptions {
        DiffOptions {
            base: base.path().to_path_buf(),
            new: new.path().to_path_buf(),
            format: ReportFormat::Json,
            output_file: None,
            fail_on_change,
            quiet: true,
            colored: false,
        }
    }

    #[test]
    fn test_unchanged_inputs_exit_success() {
        let base = sbom_file("pkg:oci/app@sha256:aaa");
        let new = sbom_file("pkg:oci/app@sha256:aaa");
        let code = run_diff(&options(&base, &new, true)).expect("diff runs");
        assert_eq!(code, exit_codes::SUCCESS);
    }

    #[test]
    fn test_fail_on_change_exit_code() {
        let base = sbom_file("pkg:oci/app@sha256:aaa");
        let new = sbom_file("pkg:oci/app@sha256:bbb");
        let code = run_diff(&options(&base, &new, true)).expect("diff runs");
        assert_eq!(code, exit_codes::CHANGES_DETECTED);

        let code = run_diff(&options(&base, &new, false)).expect("diff runs");
        assert_eq!(code, exit_codes::SUCCESS);
    }

    #[test]
    fn test_report_written_to_file() {
        let base = sbom_file("pkg:oci/app@sha256:aaa");
        let new = sbom_file("pkg:oci/app@sha256:bbb");
        let out = NamedTempFile::new().expect("temp file");

        let mut opts = options(&base, &new, false);
        opts.output_file = Some(out.path().to_path_buf());
        run_diff(&opts).expect("diff runs");

        let written = std::fs::read_to_string(out.path()).expect("report exists");
        let value: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
        assert_eq!(value["summary"]["modified"], 1);
    }

    #[test]
    fn test_worker_error_surfaces() {
        let new = sbom_file("pkg:oci/app@sha256:aaa");
        let mut opts = options(&new, &new, false);
        opts.base = std::path::PathBuf::from("/missing/base.json");
        assert!(run_diff(&opts).is_err());
    }
}
