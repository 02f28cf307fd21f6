// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Document load and save, synchronous and on a background thread.
//!
//! Every call resolves to exactly one [`IoOutcome`]. Background work never
//! touches the session directly: when it finishes it pushes a completion
//! task onto a queue that [`EditSession::update`] drains once per frame.

use super::document::{Document, SchemaVersion};
use crate::editing::EditSession;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("{found} (expected {expected})")]
    VersionMismatch {
        found: SchemaVersion,
        expected: SchemaVersion,
    },
}

/// The only outcomes surfaced to a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStatus {
    Ok,
    IoError,
    ParseError,
    VersionMismatch,
}

/// Result of one load or save, with a message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct IoOutcome {
    pub status: IoStatus,
    pub message: String,
}

impl IoOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: IoStatus::Ok,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == IoStatus::Ok
    }

    pub fn saved(path: &Path, result: &Result<(), PersistError>) -> Self {
        match result {
            Ok(()) => Self::ok(format!("Saved to {}", path.display())),
            Err(e) => Self {
                status: e.status(),
                message: format!("Save failed: {e}"),
            },
        }
    }

    pub fn loaded(path: &Path, result: &Result<Document, PersistError>) -> Self {
        match result {
            Ok(_) => Self::ok(format!("Loaded {}", path.display())),
            Err(e) => Self {
                status: e.status(),
                message: match e {
                    PersistError::Io(e) => format!("load I/O error: {e}"),
                    PersistError::Parse(e) => format!("load parsing error: {e}"),
                    PersistError::VersionMismatch { .. } => {
                        format!("json version mismatch: {e}")
                    }
                },
            },
        }
    }
}

impl PersistError {
    pub fn status(&self) -> IoStatus {
        match self {
            PersistError::Io(_) => IoStatus::IoError,
            PersistError::Parse(_) => IoStatus::ParseError,
            PersistError::VersionMismatch { .. } => IoStatus::VersionMismatch,
        }
    }
}

// ===== Synchronous API =====

pub fn save_to_path(doc: &Document, path: &Path) -> Result<(), PersistError> {
    let text = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, text)?;
    tracing::info!(
        "Saved {} vertices, {} paths to {}",
        doc.state.vertices.len(),
        doc.state.paths.len(),
        path.display()
    );
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Document, PersistError> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

/// Parse document text, checking the schema version before the body
pub fn parse_document(text: &str) -> Result<Document, PersistError> {
    #[derive(serde::Deserialize)]
    struct Header {
        version: SchemaVersion,
    }

    let header: Header = serde_json::from_str(text)?;
    if !header.version.is_readable() {
        return Err(PersistError::VersionMismatch {
            found: header.version,
            expected: SchemaVersion::CURRENT,
        });
    }
    Ok(serde_json::from_str(text)?)
}

// ===== Background worker =====

/// Completion work handed back to the editing thread
pub type SessionTask = Box<dyn FnOnce(&mut EditSession) + Send>;

/// Runs one load or save at a time off the editing thread
#[derive(Clone, Default)]
pub struct IoWorker {
    busy: Arc<AtomicBool>,
    queue: Arc<Mutex<Vec<SessionTask>>>,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl fmt::Debug for IoWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoWorker")
            .field("busy", &self.is_busy())
            .field("queued", &lock(&self.queue).len())
            .finish()
    }
}

impl IoWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start a save. Returns false if another operation is in flight.
    pub fn save(&self, doc: Document, path: PathBuf) -> bool {
        self.spawn(move || {
            let result = save_to_path(&doc, &path);
            if let Err(e) = &result {
                tracing::error!("Save to {} failed: {}", path.display(), e);
            }
            let outcome = IoOutcome::saved(&path, &result);
            Box::new(move |session: &mut EditSession| session.post_status(outcome))
        })
    }

    /// Start a load. Returns false if another operation is in flight.
    pub fn load(&self, path: PathBuf) -> bool {
        self.spawn(move || {
            let result = load_from_path(&path);
            if let Err(e) = &result {
                tracing::error!("Load of {} failed: {}", path.display(), e);
            }
            let outcome = IoOutcome::loaded(&path, &result);
            Box::new(move |session: &mut EditSession| {
                if let Ok(doc) = result {
                    session.replace_document(doc);
                }
                session.post_status(outcome);
            })
        })
    }

    fn spawn(&self, work: impl FnOnce() -> SessionTask + Send + 'static) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("I/O already in progress, request ignored");
            return false;
        }
        let busy = Arc::clone(&self.busy);
        let queue = Arc::clone(&self.queue);
        let handle = std::thread::spawn(move || {
            let task = work();
            lock(&queue).push(task);
            busy.store(false, Ordering::Release);
        });
        *lock(&self.handle) = Some(handle);
        true
    }

    /// Take every finished task, oldest first
    pub fn drain(&self) -> Vec<SessionTask> {
        std::mem::take(&mut *lock(&self.queue))
    }

    /// Block until the in-flight operation (if any) has queued its result
    pub fn wait(&self) {
        let handle = lock(&self.handle).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("I/O thread panicked");
                self.busy.store(false, Ordering::Release);
            }
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::selection::Selection;
    use crate::model::ObjectStore;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pathedit-{}-{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = temp_file("does-not-exist.json");
        let result = load_from_path(&path);
        let outcome = IoOutcome::loaded(&path, &result);
        assert_eq!(outcome.status, IoStatus::IoError);
        assert!(outcome.message.starts_with("load I/O error: "));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_document("{ not json").unwrap_err();
        assert_eq!(err.status(), IoStatus::ParseError);
    }

    #[test]
    fn kind_without_payload_is_a_parse_error() {
        let json = r#"{
            "version": { "major": 1, "minor": 0 },
            "state": {
                "vertices": [
                    { "id": 0, "x": 0, "y": 0, "z": 0,
                      "bezier": { "in_handle": [0, 0], "out_handle": [0, 0] } },
                    { "id": 1, "x": 1, "y": 0, "z": 0,
                      "bezier": { "in_handle": [0, 0], "out_handle": [0, 0] } }
                ],
                "paths": [ { "verts": [0, 1], "id": 0, "closed": false, "kind": "Source" } ]
            }
        }"#;
        let err = parse_document(json).unwrap_err();
        assert_eq!(err.status(), IoStatus::ParseError);
    }

    #[test]
    fn newer_version_is_rejected() {
        let json = r#"{ "version": { "major": 2, "minor": 0 }, "state": {} }"#;
        let err = parse_document(json).unwrap_err();
        assert_eq!(err.status(), IoStatus::VersionMismatch);
        let outcome = IoOutcome::loaded(Path::new("x.json"), &Err(err));
        assert_eq!(outcome.message, "json version mismatch: 2.0 (expected 1.0)");
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = ObjectStore::new();
        let a = store.create_vertex(kurbo::Point::new(1.0, 2.0));
        let b = store.create_vertex(kurbo::Point::new(3.0, 4.0));
        store.create_path(vec![a, b], false).unwrap();
        let doc = Document::capture(&store, &Selection::new());

        let path = temp_file("round-trip.json");
        save_to_path(&doc, &path).unwrap();
        let back = load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, doc);
    }

    #[test]
    fn worker_refuses_second_request_while_busy() {
        let worker = IoWorker::new();
        worker.busy.store(true, Ordering::Release);
        assert!(!worker.load(temp_file("never.json")));
        worker.busy.store(false, Ordering::Release);
        assert!(worker.drain().is_empty());
    }
}
