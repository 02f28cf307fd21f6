// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Hit testing and hover methods for EditSession

use super::EditSession;
use crate::editing::hit_test::{self, Hit, HitParams};
use crate::editing::mouse::Modifiers;
use crate::editing::view_cache::CursorShape;
use crate::tools::ToolBox;
use kurbo::Point;

impl EditSession {
    /// Pick radii for the current zoom
    pub fn hit_params(&self) -> HitParams {
        HitParams::new(&self.config, self.viewport.zoom())
    }

    /// Classify a world-space position against the drawing
    pub fn hit_at(&self, pos: Point) -> Option<Hit> {
        hit_test::classify(pos, &self.store, &self.selection, &self.hit_params())
    }

    /// Recompute the hover result for this frame
    pub fn refresh_hover(&mut self, pos: Point) {
        let hit = self.hit_at(pos);
        if hit != self.selection.hovered() {
            tracing::trace!("Hover: {:?}", hit);
        }
        self.selection.set_hovered(hit);
    }

    /// Whether positions should snap to the grid for this gesture
    pub fn want_snap(&self, mods: Modifiers) -> bool {
        self.config.snap_enabled || mods.shift
    }

    /// Resize cursor for a scale handle under `pos`, select tool only
    pub fn cursor_shape(&mut self, pos: Point) -> Option<CursorShape> {
        if let ToolBox::Select(tool) = &self.current_tool {
            if let Some(handle) = tool.active_handle() {
                return Some(handle.cursor());
            }
        } else {
            return None;
        }
        self.selection_view()
            .and_then(|view| view.handle_at(pos))
            .map(|handle| handle.cursor())
    }
}
