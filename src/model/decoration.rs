// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Point glyphs and free-standing lines.
//!
//! Both are lightweight decorations over vertices: a point marks one vertex,
//! a line joins two. Like paths they hold vertex ids, never vertex data.

use super::entity_id::{LineId, PointId, VertexId, ZIndex};
use super::path::Color;
use crate::settings::z_order;
use serde::{Deserialize, Serialize};

/// Display style of a point glyph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub color: Color,
    pub radius: f64,
    pub visible: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: Color::rgba(0, 255, 0, 255),
            radius: 4.0,
            visible: true,
        }
    }
}

/// A glyph drawn at a vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub v: VertexId,
    #[serde(default)]
    pub sty: PointStyle,
}

/// A straight line between two vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub a: VertexId,
    pub b: VertexId,
    pub color: Color,
    pub thickness: f64,
    pub z_index: ZIndex,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "visible_default")]
    pub visible: bool,
}

fn visible_default() -> bool {
    true
}

impl Line {
    pub fn new(id: LineId, a: VertexId, b: VertexId) -> Self {
        Self {
            id,
            a,
            b,
            color: Color::rgba(255, 255, 0, 255),
            thickness: 2.0,
            z_index: ZIndex(z_order::FLOOR_USER),
            locked: false,
            visible: true,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn references(&self, vid: VertexId) -> bool {
        self.a == vid || self.b == vid
    }
}
