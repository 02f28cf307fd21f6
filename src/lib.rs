// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pathedit: the editing core of a 2D Bezier path/vertex canvas.
//!
//! The crate owns geometry and interaction state only. A host forwards one
//! [`editing::FrameInput`] per frame to [`editing::EditSession::update`] and
//! draws whatever the session exposes (paths in z order, the selection box,
//! the lasso rectangle, the pen preview); nothing in here rasterizes.

pub mod data;
pub mod editing;
pub mod geometry;
pub mod model;
pub mod settings;
pub mod tools;

pub use data::{Document, IoOutcome, IoStatus, PersistError};
pub use editing::{EditSession, FrameInput, Hit, HitKind, HitTarget, Modifiers};
pub use model::{ObjectStore, PathId, VertexId};
pub use settings::EditorConfig;
pub use tools::{ToolBox, ToolId};

/// Install a `tracing` subscriber filtered by `RUST_LOG`, defaulting this
/// crate to `info`. Safe to call more than once.
pub fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "pathedit=info".parse() {
        filter = filter.add_directive(directive);
    }
    // A subscriber may already be installed (tests, embedding hosts)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
