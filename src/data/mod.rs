// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Persistence: the document schema, file I/O and the status messages
//! that report its outcome.

pub mod document;
pub mod file_io;
pub mod status;

pub use document::{Document, DocumentState, SchemaVersion};
pub use file_io::{
    IoOutcome, IoStatus, IoWorker, PersistError, SessionTask, load_from_path, parse_document,
    save_to_path,
};
pub use status::StatusMessage;
