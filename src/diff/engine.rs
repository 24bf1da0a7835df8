//! Streaming semantic diff engine for OCI package records.
//!
//! Runs one streaming extraction per document (base first, then new —
//! never concurrently, so peak memory is one group map plus one scan
//! buffer), groups records by semantic key, and classifies every key in
//! the union of both maps.

use super::keys::{artifact_key, semantic_key};
use super::result::{DiffResult, DiffSummary, ModifiedPair};
use super::summary::change_summary;
use crate::error::Result;
use crate::model::Package;
use crate::parsers::{
    ChunkSource, ExtractorConfig, PackageStream, ProgressCallback, DEFAULT_ARRAY_KEY,
    PROGRESS_INTERVAL,
};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::time::Instant;

/// Purl prefix selecting the OCI container-image ecosystem.
pub const OCI_PURL_PREFIX: &str = "pkg:oci/";

/// One document's package records grouped by semantic key.
///
/// Insertion order is significant: the first record pushed into a group is
/// its representative, and classification walks base keys before new-only
/// keys.
pub type SemanticGroups = IndexMap<String, Vec<Package>>;

/// Semantic diff engine for comparing two SBOM package streams.
pub struct DiffEngine {
    array_key: String,
    purl_prefix: String,
    progress_interval: usize,
    progress_callback: Option<ProgressCallback>,
}

impl DiffEngine {
    /// Create a new diff engine with default settings (OCI ecosystem,
    /// `packages` array).
    #[must_use]
    pub fn new() -> Self {
        Self {
            array_key: DEFAULT_ARRAY_KEY.to_string(),
            purl_prefix: OCI_PURL_PREFIX.to_string(),
            progress_interval: PROGRESS_INTERVAL,
            progress_callback: None,
        }
    }

    /// Set the purl prefix used as the ecosystem filter.
    #[must_use]
    pub fn with_purl_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.purl_prefix = prefix.into();
        self
    }

    /// Set the array key to locate in each document.
    #[must_use]
    pub fn with_array_key(mut self, key: impl Into<String>) -> Self {
        self.array_key = key.into();
        self
    }

    /// Set the per-document progress callback.
    #[must_use]
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&crate::parsers::ExtractProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(std::sync::Arc::new(callback));
        self
    }

    /// Set the accepted-record interval between progress notifications.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Compare two package sources and return the classified diff.
    ///
    /// The base source is fully drained into its group map before the new
    /// source is opened. A fatal extraction error on either input aborts
    /// the whole diff; there is no partial result.
    pub fn diff<A: ChunkSource, B: ChunkSource>(&self, base: A, new: B) -> Result<DiffResult> {
        let started = Instant::now();
        let base_groups = self.collect_groups(base)?;
        let new_groups = self.collect_groups(new)?;
        let mut result = self.diff_groups(&base_groups, &new_groups);
        result.metrics.parse_and_diff_time = started.elapsed().as_secs_f64() * 1000.0;
        Ok(result)
    }

    /// Drain one source into a semantic group map, applying the ecosystem
    /// filter during extraction.
    pub fn collect_groups<S: ChunkSource>(&self, source: S) -> Result<SemanticGroups> {
        let prefix = self.purl_prefix.clone();
        let mut config = ExtractorConfig::default()
            .with_array_key(self.array_key.clone())
            .with_progress_interval(self.progress_interval)
            .with_filter(move |pkg: &Package| {
                pkg.purl().is_some_and(|p| p.starts_with(prefix.as_str()))
            });
        if let Some(callback) = &self.progress_callback {
            config = config.with_shared_progress_callback(std::sync::Arc::clone(callback));
        }

        let mut groups = SemanticGroups::new();
        for record in PackageStream::new(source, config) {
            let pkg = record?;
            groups.entry(semantic_key(&pkg)).or_default().push(pkg);
        }
        Ok(groups)
    }

    /// Classify every semantic key present in either map.
    ///
    /// Does not fill in timing metrics; [`DiffEngine::diff`] and callers
    /// driving the two passes themselves own the clock.
    pub fn diff_groups(&self, base: &SemanticGroups, new: &SemanticGroups) -> DiffResult {
        let mut result = DiffResult::default();

        for (key, base_pkgs) in base {
            let Some(old_rep) = base_pkgs.first() else {
                continue;
            };
            match new.get(key) {
                None => result.removed.push(old_rep.clone()),
                Some(new_pkgs) => {
                    let base_keys: HashSet<String> =
                        base_pkgs.iter().map(artifact_key).collect();
                    let new_keys: HashSet<String> =
                        new_pkgs.iter().map(artifact_key).collect();
                    if base_keys != new_keys {
                        let Some(new_rep) = new_pkgs.first() else {
                            continue;
                        };
                        result.modified.push(ModifiedPair {
                            change_summary: change_summary(old_rep, new_rep),
                            old: old_rep.clone(),
                            new: new_rep.clone(),
                        });
                    }
                    // Equal artifact-key sets: unchanged, counted via the
                    // summary identity rather than materialized.
                }
            }
        }

        for (key, new_pkgs) in new {
            if !base.contains_key(key) {
                if let Some(new_rep) = new_pkgs.first() {
                    result.added.push(new_rep.clone());
                }
            }
        }

        result.summary = DiffSummary::from_counts(
            base.len(),
            new.len(),
            result.added.len(),
            result.removed.len(),
            result.modified.len(),
        );
        result
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
