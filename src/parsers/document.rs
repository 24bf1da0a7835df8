//! Whole-document SPDX parse for the single-file view mode.
//!
//! This is a plain, non-streaming decode of an already-bounded file into a
//! typed [`SpdxDocument`], with the parse-time and file-size metrics the
//! view surface reports. Large-file diffing never goes through here.

use crate::error::{OciDiffError, Result};
use crate::model::SpdxDocument;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Metrics for a whole-document parse.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    /// Elapsed wall-clock milliseconds for the decode.
    pub parse_time: f64,
    /// Input size in megabytes.
    pub file_size: f64,
}

/// Parse a complete SPDX JSON document from a file.
///
/// Reads through a buffered reader rather than materializing the file as
/// a string first.
pub fn parse_document(path: &Path) -> Result<(SpdxDocument, DocumentStats)> {
    let file = File::open(path).map_err(|e| OciDiffError::io(path, e))?;
    let file_size = file
        .metadata()
        .map(|m| m.len() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0);

    let started = Instant::now();
    let document: SpdxDocument = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| OciDiffError::document(format!("{}: {e}", path.display())))?;
    let parse_time = started.elapsed().as_secs_f64() * 1000.0;

    Ok((
        document,
        DocumentStats {
            parse_time,
            file_size,
        },
    ))
}

/// Parse a complete SPDX JSON document from string content.
pub fn parse_document_str(content: &str) -> Result<SpdxDocument> {
    serde_json::from_str(content).map_err(|e| OciDiffError::document(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_parse_document_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"spdxVersion":"SPDX-2.3","name":"doc","packages":[{{"name":"a"}},{{"name":"b"}}]}}"#
        )
        .expect("write fixture");

        let (doc, stats) = parse_document(file.path()).expect("parse");
        assert_eq!(doc.package_count(), 2);
        assert!(stats.file_size > 0.0);
        assert!(stats.parse_time >= 0.0);
    }

    #[test]
    fn test_parse_document_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json at all").expect("write fixture");

        let err = parse_document(file.path()).expect_err("should fail");
        assert!(matches!(err, OciDiffError::Document(_)));
    }

    #[test]
    fn test_parse_document_str() {
        let doc = parse_document_str(r#"{"name":"inline","packages":[]}"#).expect("parse");
        assert_eq!(doc.name, "inline");
    }
}
