// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod clipboard;
pub mod mouse;
pub mod selection;
pub mod session;
pub mod view_cache;
pub mod viewport;

pub use clipboard::{ClipboardContents, PastePlacement};
pub use hit_test::{Hit, HitKind, HitParams, HitTarget};
pub use mouse::{Drag, FrameInput, Modifiers, Mouse, MouseButton, MouseDelegate, MouseEvent};
pub use selection::{IdSet, Selection, SelectionMask};
pub use session::EditSession;
pub use view_cache::{BoxHandle, CursorShape, RevisionCache, Revisions, SelectionView};
pub use viewport::ViewPort;
