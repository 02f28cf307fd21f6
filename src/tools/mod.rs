// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tool system for canvas editing

use crate::editing::{Drag, EditSession, MouseDelegate, MouseEvent};

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// Select, lasso, move and scale
    Select,
    /// Author new paths vertex by vertex
    Pen,
}

// ===== Tool Trait =====

/// An interactive canvas tool
pub trait Tool: MouseDelegate<Data = EditSession> {
    /// Get the tool identifier
    fn id(&self) -> ToolId;

    /// Explicit finish action (Enter or double-click)
    fn finish(&mut self, _session: &mut EditSession) {}

    /// Whether a gesture is in progress
    fn is_busy(&self) -> bool {
        false
    }
}

// ===== ToolBox Enum =====

/// Enum wrapping all tool types
#[derive(Debug, Clone)]
pub enum ToolBox {
    Select(select::SelectTool),
    Pen(pen::PenTool),
}

// ===== ToolBox Implementation =====

impl ToolBox {
    /// Create a tool by ID
    pub fn for_id(id: ToolId) -> Self {
        match id {
            ToolId::Select => ToolBox::Select(select::SelectTool::default()),
            ToolId::Pen => ToolBox::Pen(pen::PenTool::default()),
        }
    }

    /// Get the tool ID
    pub fn id(&self) -> ToolId {
        match self {
            ToolBox::Select(tool) => tool.id(),
            ToolBox::Pen(tool) => tool.id(),
        }
    }

    pub fn finish(&mut self, session: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.finish(session),
            ToolBox::Pen(tool) => tool.finish(session),
        }
    }

    pub fn is_busy(&self) -> bool {
        match self {
            ToolBox::Select(tool) => tool.is_busy(),
            ToolBox::Pen(tool) => tool.is_busy(),
        }
    }

    pub fn as_select(&self) -> Option<&select::SelectTool> {
        match self {
            ToolBox::Select(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_pen(&self) -> Option<&pen::PenTool> {
        match self {
            ToolBox::Pen(tool) => Some(tool),
            _ => None,
        }
    }
}

// ===== MouseDelegate Implementation =====

/// Forward mouse callbacks to the active tool
impl MouseDelegate for ToolBox {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_down(event, data),
            ToolBox::Pen(tool) => tool.left_down(event, data),
        }
    }

    fn left_up(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_up(event, data),
            ToolBox::Pen(tool) => tool.left_up(event, data),
        }
    }

    fn left_click(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_click(event, data),
            ToolBox::Pen(tool) => tool.left_click(event, data),
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.mouse_moved(event, data),
            ToolBox::Pen(tool) => tool.mouse_moved(event, data),
        }
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_began(event, drag, data),
            ToolBox::Pen(tool) => tool.left_drag_began(event, drag, data),
        }
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_changed(event, drag, data),
            ToolBox::Pen(tool) => tool.left_drag_changed(event, drag, data),
        }
    }

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.left_drag_ended(event, drag, data),
            ToolBox::Pen(tool) => tool.left_drag_ended(event, drag, data),
        }
    }

    fn cancel(&mut self, data: &mut EditSession) {
        match self {
            ToolBox::Select(tool) => tool.cancel(data),
            ToolBox::Pen(tool) => tool.cancel(data),
        }
    }
}

// ===== Tool Modules =====

pub mod pen;
pub mod select;
