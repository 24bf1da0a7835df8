//! Streaming package extractor for large SBOM files.
//!
//! Locates the top-level `packages` array inside a JSON document supplied
//! as arbitrary byte chunks and yields each well-formed element as a
//! [`Package`], without buffering the whole file or the whole array.
//!
//! The scan is an explicit state machine (locating-array / between-elements
//! / in-element / done) driven by a pull-based [`Iterator`]. Malformed
//! elements are skipped silently; only a missing array or a source IO
//! failure is fatal.
//!
//! # Usage
//!
//! ```no_run
//! use oci_sbom_diff::parsers::{ExtractorConfig, FileChunkSource, PackageStream};
//! use std::path::Path;
//!
//! let source = FileChunkSource::open(Path::new("large-sbom.spdx.json")).unwrap();
//! let config = ExtractorConfig::default()
//!     .with_filter(|pkg| pkg.purl().is_some_and(|p| p.starts_with("pkg:oci/")));
//!
//! for record in PackageStream::new(source, config) {
//!     match record {
//!         Ok(pkg) => println!("{}", pkg.name),
//!         Err(e) => eprintln!("fatal: {e}"),
//!     }
//! }
//! ```

use super::traits::{ChunkSource, ExtractError};
use crate::model::Package;
use std::sync::Arc;

/// The top-level key whose array value holds the package records.
pub const DEFAULT_ARRAY_KEY: &str = "packages";

/// Emit a progress notification after every this many accepted records.
pub const PROGRESS_INTERVAL: usize = 5000;

/// Progress snapshot passed to the configured callback.
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    /// Records accepted by the filter so far (monotonic per source).
    pub records_accepted: usize,
    /// Label of the source being scanned.
    pub source_name: String,
}

/// Predicate deciding which parsed elements are yielded.
pub type RecordFilter = Arc<dyn Fn(&Package) -> bool + Send + Sync>;

/// Progress callback type.
pub type ProgressCallback = Arc<dyn Fn(&ExtractProgress) + Send + Sync>;

/// Configuration for the streaming extractor.
#[derive(Clone)]
pub struct ExtractorConfig {
    /// Key of the array to locate (default: `"packages"`).
    pub array_key: String,
    /// Accept-filter applied to every decoded element.
    filter: Option<RecordFilter>,
    /// Progress callback (optional).
    progress_callback: Option<ProgressCallback>,
    /// Accepted-record interval between progress notifications.
    pub progress_interval: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            array_key: DEFAULT_ARRAY_KEY.to_string(),
            filter: None,
            progress_callback: None,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl ExtractorConfig {
    /// Set the array key to locate.
    #[must_use]
    pub fn with_array_key(mut self, key: impl Into<String>) -> Self {
        self.array_key = key.into();
        self
    }

    /// Set the accept-filter predicate.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Package) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Set a pre-built shared filter.
    #[must_use]
    pub fn with_shared_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ExtractProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Set a pre-built shared progress callback.
    #[must_use]
    pub fn with_shared_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Set the progress notification interval (minimum 1).
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }
}

impl std::fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("array_key", &self.array_key)
            .field("has_filter", &self.filter.is_some())
            .field("has_progress_callback", &self.progress_callback.is_some())
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

/// Scanner state. Transitions strictly forward; `Done` is terminal.
enum ScanState {
    /// Accumulating text until the quoted key and its `[` are found.
    LocatingArray {
        /// Buffer length at the last failed key search, so refills only
        /// rescan the window a straddling needle could occupy.
        searched_to: usize,
    },
    /// Inside the array, looking for the next `{` or the closing `]`.
    BetweenElements,
    /// Consuming one element; the element starts at buffer offset 0.
    InElement(ElementScan),
    /// Array closed or source exhausted.
    Done,
}

/// Incremental scan position within the current element, kept across
/// refills so element prefixes are never rescanned.
#[derive(Clone, Copy)]
struct ElementScan {
    pos: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl ElementScan {
    /// State just past an opening `{` at buffer offset 0.
    const fn start() -> Self {
        Self {
            pos: 1,
            depth: 1,
            in_string: false,
            escaped: false,
        }
    }
}

/// Lazy, finite, non-restartable stream of package records.
///
/// Consuming it fully exhausts the underlying source (or stops at the
/// located array's closing `]`, whichever comes first).
pub struct PackageStream<S: ChunkSource> {
    source: S,
    config: ExtractorConfig,
    needle: Vec<u8>,
    buffer: Vec<u8>,
    state: ScanState,
    accepted: usize,
    skipped: usize,
    source_done: bool,
}

impl<S: ChunkSource> PackageStream<S> {
    /// Create a stream over `source` with the given configuration.
    #[must_use]
    pub fn new(source: S, config: ExtractorConfig) -> Self {
        let needle = format!("\"{}\"", config.array_key).into_bytes();
        Self {
            source,
            config,
            needle,
            buffer: Vec::new(),
            state: ScanState::LocatingArray { searched_to: 0 },
            accepted: 0,
            skipped: 0,
            source_done: false,
        }
    }

    /// Records accepted by the filter so far.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Malformed elements skipped so far (never surfaced as errors).
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Pull one chunk into the buffer. `Ok(false)` means end of input.
    fn refill(&mut self) -> Result<bool, ExtractError> {
        if self.source_done {
            return Ok(false);
        }
        match self.source.next_chunk()? {
            Some(chunk) => {
                self.buffer.extend_from_slice(chunk);
                Ok(true)
            }
            None => {
                self.source_done = true;
                Ok(false)
            }
        }
    }

    fn report_progress(&self) {
        if let Some(ref callback) = self.config.progress_callback {
            callback(&ExtractProgress {
                records_accepted: self.accepted,
                source_name: self.source.name().to_string(),
            });
        }
    }

    fn missing_array_error(&self) -> ExtractError {
        ExtractError::MissingArray {
            key: self.config.array_key.clone(),
            source_name: self.source.name().to_string(),
        }
    }

    fn advance(&mut self) -> Option<Result<Package, ExtractError>> {
        loop {
            match std::mem::replace(&mut self.state, ScanState::Done) {
                ScanState::Done => return None,

                ScanState::LocatingArray { searched_to } => {
                    // A needle can straddle the previous buffer end.
                    let from = searched_to.saturating_sub(self.needle.len().saturating_sub(1));
                    if let Some(key_pos) = find_subslice(&self.buffer, &self.needle, from) {
                        let after_key = key_pos + self.needle.len();
                        if let Some(bracket) =
                            self.buffer[after_key..].iter().position(|&b| b == b'[')
                        {
                            self.buffer.drain(..=after_key + bracket);
                            self.state = ScanState::BetweenElements;
                            continue;
                        }
                        // Key found but its `[` not pulled yet; keep the key
                        // position so the next pass re-finds it immediately.
                        self.state = ScanState::LocatingArray {
                            searched_to: key_pos,
                        };
                    } else {
                        self.state = ScanState::LocatingArray {
                            searched_to: self.buffer.len(),
                        };
                    }
                    match self.refill() {
                        Ok(true) => {}
                        Ok(false) => {
                            self.state = ScanState::Done;
                            return Some(Err(self.missing_array_error()));
                        }
                        Err(e) => {
                            self.state = ScanState::Done;
                            return Some(Err(e));
                        }
                    }
                }

                ScanState::BetweenElements => {
                    let marker = self
                        .buffer
                        .iter()
                        .position(|&b| b == b'{' || b == b']');
                    match marker {
                        Some(i) if self.buffer[i] == b'{' => {
                            self.buffer.drain(..i);
                            self.state = ScanState::InElement(ElementScan::start());
                        }
                        Some(_) => {
                            // Closing `]` of the located array: the stream
                            // ends here regardless of trailing document text.
                            return None;
                        }
                        None => {
                            self.buffer.clear();
                            self.state = ScanState::BetweenElements;
                            match self.refill() {
                                Ok(true) => {}
                                Ok(false) => {
                                    self.state = ScanState::Done;
                                    return None;
                                }
                                Err(e) => {
                                    self.state = ScanState::Done;
                                    return Some(Err(e));
                                }
                            }
                        }
                    }
                }

                ScanState::InElement(mut scan) => {
                    let mut end = None;
                    while scan.pos < self.buffer.len() {
                        let b = self.buffer[scan.pos];
                        if scan.in_string {
                            if scan.escaped {
                                scan.escaped = false;
                            } else if b == b'\\' {
                                scan.escaped = true;
                            } else if b == b'"' {
                                scan.in_string = false;
                            }
                        } else {
                            match b {
                                b'"' => scan.in_string = true,
                                b'{' => scan.depth += 1,
                                b'}' => {
                                    scan.depth -= 1;
                                    if scan.depth == 0 {
                                        end = Some(scan.pos);
                                    }
                                }
                                _ => {}
                            }
                        }
                        scan.pos += 1;
                        if end.is_some() {
                            break;
                        }
                    }

                    let Some(end) = end else {
                        self.state = ScanState::InElement(scan);
                        match self.refill() {
                            Ok(true) => continue,
                            Ok(false) => {
                                // Truncated trailing element: dropped, like
                                // any other malformed candidate.
                                self.state = ScanState::Done;
                                return None;
                            }
                            Err(e) => {
                                self.state = ScanState::Done;
                                return Some(Err(e));
                            }
                        }
                    };

                    let decoded = serde_json::from_slice::<Package>(&self.buffer[..=end]);
                    self.buffer.drain(..=end);
                    self.state = ScanState::BetweenElements;
                    match decoded {
                        Ok(pkg) => {
                            let accept =
                                self.config.filter.as_ref().map_or(true, |f| f(&pkg));
                            if accept {
                                self.accepted += 1;
                                if self.accepted % self.config.progress_interval == 0 {
                                    self.report_progress();
                                }
                                return Some(Ok(pkg));
                            }
                        }
                        Err(err) => {
                            self.skipped += 1;
                            tracing::debug!(error = %err, "skipping malformed package element");
                        }
                    }
                }
            }
        }
    }
}

impl<S: ChunkSource> Iterator for PackageStream<S> {
    type Item = Result<Package, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

/// Find `needle` in `haystack` starting at `from`.
fn find_subslice(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::MemoryChunkSource;
    use std::sync::Mutex;

    const SIMPLE_DOC: &str = r#"{
        "spdxVersion": "SPDX-2.3",
        "name": "fixture",
        "packages": [
            {"name": "one", "versionInfo": "1.0"},
            {"name": "two", "versionInfo": "2.0"},
            {"name": "three", "versionInfo": "3.0"}
        ],
        "relationships": [{"spdxElementId": "a", "relationshipType": "DESCRIBES", "relatedSpdxElement": "b"}]
    }"#;

    fn collect(doc: &str, chunk_size: usize, config: ExtractorConfig) -> Vec<Package> {
        let source = MemoryChunkSource::new(doc).with_chunk_size(chunk_size);
        PackageStream::new(source, config)
            .collect::<Result<Vec<_>, _>>()
            .expect("extraction should succeed")
    }

    #[test]
    fn test_yields_all_elements_in_order() {
        let pkgs = collect(SIMPLE_DOC, 4096, ExtractorConfig::default());
        let names: Vec<_> = pkgs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_one_byte_chunks_yield_identical_sequence() {
        let whole = collect(SIMPLE_DOC, usize::MAX, ExtractorConfig::default());
        let fragmented = collect(SIMPLE_DOC, 1, ExtractorConfig::default());
        assert_eq!(whole, fragmented);
    }

    #[test]
    fn test_filter_is_applied_preserving_order() {
        let config = ExtractorConfig::default().with_filter(|p: &Package| p.name != "two");
        let pkgs = collect(SIMPLE_DOC, 7, config);
        let names: Vec<_> = pkgs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["one", "three"]);
    }

    #[test]
    fn test_array_found_after_padding_fields() {
        let doc = format!(
            r#"{{"comment": "{}", "files": [{{"fileName": "f"}}], "packages": [{{"name": "pad"}}]}}"#,
            "x".repeat(200_000)
        );
        let pkgs = collect(&doc, 8192, ExtractorConfig::default());
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].name, "pad");
    }

    #[test]
    fn test_objects_after_array_close_are_not_yielded() {
        let doc = r#"{"packages": [{"name": "inside"}], "other": [{"name": "outside"}]}"#;
        let pkgs = collect(doc, 3, ExtractorConfig::default());
        let names: Vec<_> = pkgs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["inside"]);
    }

    #[test]
    fn test_nested_objects_stay_within_one_element() {
        let doc = r#"{"packages": [
            {"name": "nested", "annotations": {"inner": {"deep": true}}},
            {"name": "after"}
        ]}"#;
        let pkgs = collect(doc, 5, ExtractorConfig::default());
        let names: Vec<_> = pkgs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["nested", "after"]);
    }

    #[test]
    fn test_braces_inside_string_values_do_not_corrupt_boundaries() {
        let doc = r#"{"packages": [
            {"name": "curly", "copyrightText": "Copyright {c} 2024 \"Quoted{\" Corp"},
            {"name": "plain"}
        ]}"#;
        let pkgs = collect(doc, 1, ExtractorConfig::default());
        let names: Vec<_> = pkgs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["curly", "plain"]);
    }

    #[test]
    fn test_malformed_element_is_skipped_silently() {
        // Second element lacks the required `name`; third is fine.
        let doc = r#"{"packages": [
            {"name": "good"},
            {"versionInfo": "no-name"},
            {"name": "also-good"}
        ]}"#;
        let source = MemoryChunkSource::new(doc);
        let mut stream = PackageStream::new(source, ExtractorConfig::default());
        let names: Vec<_> = stream
            .by_ref()
            .map(|r| r.expect("no fatal errors").name)
            .collect();
        assert_eq!(names, vec!["good", "also-good"]);
        assert_eq!(stream.skipped(), 1);
    }

    #[test]
    fn test_missing_array_is_fatal() {
        let source = MemoryChunkSource::new(r#"{"name": "no packages here"}"#);
        let mut stream = PackageStream::new(source, ExtractorConfig::default());
        let err = stream
            .next()
            .expect("one item")
            .expect_err("should be the missing-array error");
        assert!(matches!(err, ExtractError::MissingArray { .. }));
        assert!(stream.next().is_none(), "stream ends after a fatal error");
    }

    #[test]
    fn test_empty_source_is_missing_array() {
        let source = MemoryChunkSource::new(Vec::new());
        let mut stream = PackageStream::new(source, ExtractorConfig::default());
        let err = stream.next().expect("one item").expect_err("fatal");
        assert!(matches!(err, ExtractError::MissingArray { .. }));
    }

    #[test]
    fn test_key_straddling_chunk_boundary() {
        // 1-byte chunks force the quoted key itself across boundaries.
        let doc = r#"{"filler": 1, "packages": [{"name": "straddle"}]}"#;
        let pkgs = collect(doc, 1, ExtractorConfig::default());
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].name, "straddle");
    }

    #[test]
    fn test_progress_fires_every_interval() {
        let doc = {
            let elements: Vec<String> = (0..7)
                .map(|i| format!(r#"{{"name": "p{i}"}}"#))
                .collect();
            format!(r#"{{"packages": [{}]}}"#, elements.join(","))
        };
        let counts: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&counts);
        let config = ExtractorConfig::default()
            .with_progress_interval(3)
            .with_progress_callback(move |p: &ExtractProgress| {
                seen.lock().expect("lock").push(p.records_accepted);
            });
        let pkgs = collect(&doc, 16, config);
        assert_eq!(pkgs.len(), 7);
        assert_eq!(*counts.lock().expect("lock"), vec![3, 6]);
    }

    #[test]
    fn test_find_subslice_windows() {
        assert_eq!(find_subslice(b"abcabc", b"abc", 0), Some(0));
        assert_eq!(find_subslice(b"abcabc", b"abc", 1), Some(3));
        assert_eq!(find_subslice(b"abcabc", b"xyz", 0), None);
        assert_eq!(find_subslice(b"ab", b"abc", 0), None);
    }
}
