//! Background diff task with message-passing isolation.
//!
//! One diff invocation runs on a dedicated thread and communicates only
//! through a channel: zero or more [`WorkerMessage::Progress`]
//! notifications followed by exactly one terminal
//! [`WorkerMessage::Success`] or [`WorkerMessage::Error`]. The channel is
//! the only synchronization point; nothing is shared across invocations.
//!
//! Dropping the [`DiffTask`] handle abandons the worker: no partial result
//! is ever delivered, and the detached thread's remaining sends are
//! discarded.

use crate::diff::{DiffEngine, DiffResult};
use crate::error::Result;
use crate::parsers::FileChunkSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// A diff request: paths to the base and new SBOM files.
#[derive(Debug, Clone)]
pub struct DiffRequest {
    pub base_file: PathBuf,
    pub new_file: PathBuf,
}

/// Messages emitted by a diff worker, in wire order.
///
/// Serializes to the `{"type": ..., "payload": ...}` envelope shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WorkerMessage {
    /// Human-readable liveness notification.
    #[serde(rename = "PROGRESS")]
    Progress(String),
    /// Terminal: the full materialized diff result.
    #[serde(rename = "SUCCESS")]
    Success(Box<DiffResult>),
    /// Terminal: error description; no partial diff accompanies it.
    #[serde(rename = "ERROR")]
    Error(String),
}

impl WorkerMessage {
    /// Whether this message ends the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }
}

/// Handle to a running diff worker.
pub struct DiffTask {
    receiver: Receiver<WorkerMessage>,
    handle: Option<JoinHandle<()>>,
}

impl DiffTask {
    /// Block for the next message; `None` once the worker is gone and the
    /// channel is drained.
    #[must_use]
    pub fn recv(&self) -> Option<WorkerMessage> {
        self.receiver.recv().ok()
    }

    /// Non-blocking receive.
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerMessage> {
        self.receiver.try_recv().ok()
    }

    /// Iterate messages until the channel closes.
    pub fn iter(&self) -> mpsc::Iter<'_, WorkerMessage> {
        self.receiver.iter()
    }

    /// Drain all remaining messages and wait for the worker to finish.
    #[must_use]
    pub fn join(mut self) -> Vec<WorkerMessage> {
        let messages: Vec<WorkerMessage> = self.receiver.iter().collect();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
        messages
    }

    /// Abandon the task. The worker thread is detached; whatever it sends
    /// from here on is discarded.
    pub fn abandon(mut self) {
        self.handle.take();
    }
}

/// Spawn a diff over two SBOM files on a dedicated worker thread.
#[must_use]
pub fn spawn_diff(request: DiffRequest) -> DiffTask {
    let (sender, receiver) = mpsc::channel();
    let handle = thread::spawn(move || run_diff_task(&request, &sender));
    DiffTask {
        receiver,
        handle: Some(handle),
    }
}

/// Run a diff request to completion, sending progress and exactly one
/// terminal message on `sender`.
///
/// Exposed for callers that manage their own threads or channels.
pub fn run_diff_task(request: &DiffRequest, sender: &Sender<WorkerMessage>) {
    let started = Instant::now();
    let message = match execute(request, sender, started) {
        Ok(result) => WorkerMessage::Success(Box::new(result)),
        Err(e) => WorkerMessage::Error(e.to_string()),
    };
    // A closed channel means the caller abandoned the task.
    sender.send(message).ok();
}

fn execute(
    request: &DiffRequest,
    sender: &Sender<WorkerMessage>,
    started: Instant,
) -> Result<DiffResult> {
    let progress = sender.clone();
    let engine = DiffEngine::new().with_progress_callback(move |p| {
        progress
            .send(WorkerMessage::Progress(format!(
                "Found {} OCI packages in {}...",
                p.records_accepted, p.source_name
            )))
            .ok();
    });

    // Sequential by design: base is fully drained before new is opened,
    // so progress never interleaves and peak memory stays at one map.
    let base_groups = {
        announce(sender, &request.base_file);
        engine.collect_groups(FileChunkSource::open(&request.base_file)?)?
    };
    let new_groups = {
        announce(sender, &request.new_file);
        engine.collect_groups(FileChunkSource::open(&request.new_file)?)?
    };

    let mut result = engine.diff_groups(&base_groups, &new_groups);
    result.metrics.parse_and_diff_time = started.elapsed().as_secs_f64() * 1000.0;
    Ok(result)
}

fn announce(sender: &Sender<WorkerMessage>, path: &Path) {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    sender
        .send(WorkerMessage::Progress(format!(
            "Filtering OCI packages in {name}..."
        )))
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn sbom_file(purls: &[&str]) -> NamedTempFile {
        let elements: Vec<String> = purls
            .iter()
            .enumerate()
            .map(|(i, purl)| {
                format!(
                    r#"{{"name": "pkg{i}", "externalRefs": [{{"referenceCategory": "PACKAGE-MANAGER", "referenceType": "purl", "referenceLocator": "{purl}"}}]}}"#
                )
            })
            .collect();
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"spdxVersion": "SPDX-2.3", "packages": [{}]}}"#,
            elements.join(",")
        )
        .expect("write fixture");
        file
    }

    fn request(base: &NamedTempFile, new: &NamedTempFile) -> DiffRequest {
        DiffRequest {
            base_file: base.path().to_path_buf(),
            new_file: new.path().to_path_buf(),
        }
    }

    #[test]
    fn test_success_is_last_message() {
        let base = sbom_file(&["pkg:oci/app@sha256:aaa"]);
        let new = sbom_file(&["pkg:oci/app@sha256:bbb"]);

        let messages = spawn_diff(request(&base, &new)).join();
        let last = messages.last().expect("at least one message");
        assert!(matches!(last, WorkerMessage::Success(_)));

        // Terminal message is unique and final.
        let terminals = messages.iter().filter(|m| m.is_terminal()).count();
        assert_eq!(terminals, 1);

        let WorkerMessage::Success(result) = last else {
            unreachable!()
        };
        assert_eq!(result.modified.len(), 1);
        assert!(result.metrics.parse_and_diff_time >= 0.0);
    }

    #[test]
    fn test_progress_precedes_terminal() {
        let base = sbom_file(&["pkg:oci/app@sha256:aaa"]);
        let new = sbom_file(&["pkg:oci/app@sha256:aaa"]);

        let messages = spawn_diff(request(&base, &new)).join();
        // Two per-file announcements, then the terminal.
        assert!(matches!(&messages[0], WorkerMessage::Progress(p) if p.starts_with("Filtering")));
        assert!(matches!(&messages[1], WorkerMessage::Progress(p) if p.starts_with("Filtering")));
        assert!(messages[2].is_terminal());
    }

    #[test]
    fn test_missing_array_produces_error_terminal() {
        let mut broken = NamedTempFile::new().expect("temp file");
        write!(broken, r#"{{"no": "array here"}}"#).expect("write fixture");
        let new = sbom_file(&["pkg:oci/app@sha256:aaa"]);

        let messages = spawn_diff(request(&broken, &new)).join();
        let last = messages.last().expect("at least one message");
        let WorkerMessage::Error(text) = last else {
            panic!("expected ERROR terminal, got {last:?}");
        };
        assert!(text.contains("packages"), "error was: {text}");
        assert!(
            !messages.iter().any(|m| matches!(m, WorkerMessage::Success(_))),
            "no SUCCESS may ever be sent on a failed diff"
        );
    }

    #[test]
    fn test_unreadable_file_produces_error_terminal() {
        let new = sbom_file(&["pkg:oci/app@sha256:aaa"]);
        let req = DiffRequest {
            base_file: PathBuf::from("/definitely/not/here.spdx.json"),
            new_file: new.path().to_path_buf(),
        };
        let messages = spawn_diff(req).join();
        assert!(matches!(messages.last(), Some(WorkerMessage::Error(_))));
    }

    #[test]
    fn test_message_wire_shape() {
        let progress = WorkerMessage::Progress("Filtering...".to_string());
        let json = serde_json::to_value(&progress).expect("serialize");
        assert_eq!(json["type"], "PROGRESS");
        assert_eq!(json["payload"], "Filtering...");

        let error = WorkerMessage::Error("boom".to_string());
        let json = serde_json::to_value(&error).expect("serialize");
        assert_eq!(json["type"], "ERROR");

        let success = WorkerMessage::Success(Box::default());
        let json = serde_json::to_value(&success).expect("serialize");
        assert_eq!(json["type"], "SUCCESS");
        assert!(json["payload"]["summary"].is_object());
    }

    #[test]
    fn test_abandon_discards_worker() {
        let base = sbom_file(&["pkg:oci/app@sha256:aaa"]);
        let new = sbom_file(&["pkg:oci/app@sha256:bbb"]);
        // Must not hang or panic; the detached thread finishes on its own.
        spawn_diff(request(&base, &new)).abandon();
    }
}
