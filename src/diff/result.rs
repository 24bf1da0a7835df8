//! Diff result structures.
//!
//! The result is fully materialized (no streaming output) and serializes
//! to the camelCase wire shape consumed by callers:
//! `{added, removed, modified, summary, metrics}`.

use crate::model::Package;
use serde::{Deserialize, Serialize};

/// Complete result of one diff invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct DiffResult {
    /// Semantic groups present only in the new document (one representative each).
    pub added: Vec<Package>,
    /// Semantic groups present only in the base document (one representative each).
    pub removed: Vec<Package>,
    /// Semantic groups present in both whose artifact-key sets differ.
    pub modified: Vec<ModifiedPair>,
    /// Counts over distinct semantic keys.
    pub summary: DiffSummary,
    /// Timing for the whole operation.
    pub metrics: DiffMetrics,
}

impl DiffResult {
    /// Check if there are any changes.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    /// Total number of changed semantic groups.
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Representative pair for a modified semantic group.
///
/// One pair is reported per modified group regardless of how many
/// artifacts changed inside it: the first record of each side's group, in
/// extraction order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedPair {
    pub old: Package,
    pub new: Package,
    pub change_summary: String,
}

/// Summary counts over distinct semantic keys (not raw records).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub total_base: usize,
    pub total_new: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    /// Build a summary from classification counts.
    ///
    /// `unchanged` is the count identity `totalBase - modified - removed`,
    /// enforced here by construction rather than verified independently.
    #[must_use]
    pub fn from_counts(
        total_base: usize,
        total_new: usize,
        added: usize,
        removed: usize,
        modified: usize,
    ) -> Self {
        Self {
            total_base,
            total_new,
            added,
            removed,
            modified,
            unchanged: total_base.saturating_sub(modified).saturating_sub(removed),
        }
    }
}

/// Timing metrics for one diff invocation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffMetrics {
    /// Elapsed wall-clock milliseconds for parse + diff.
    pub parse_and_diff_time: f64,
}
