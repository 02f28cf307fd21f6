// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Paths: ordered vertex-id sequences with style, z-order and payload.
//!
//! A path does not own its vertices. It lists their ids in drawing order;
//! the `ObjectStore` resolves them. The vertex list and the `closed` flag
//! are private so the one structural invariant (a closed path has at least
//! three vertices) is enforced on every mutation and on load.

use super::entity_id::{PathId, VertexId, ZIndex};
use super::error::ModelError;
use super::payload::{PathKind, Payload};
use crate::settings::{io, z_order};
use serde::{Deserialize, Serialize};

/// Packed 32-bit colour with red in the low byte and alpha in the high byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// Stroke and fill appearance of a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke_width: f64,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::rgba(255, 255, 0, 255),
            fill_color: Color::rgba(255, 255, 255, 0),
            stroke_width: 2.0,
        }
    }
}

impl PathStyle {
    pub fn has_fill(&self) -> bool {
        self.fill_color.alpha() != 0
    }
}

/// Which end of an open path a vertex sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEnd {
    Head,
    Tail,
}

/// A polyline / spline / area defined over shared vertices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PathRecord", into = "PathRecord")]
pub struct Path {
    pub id: PathId,
    verts: Vec<VertexId>,
    closed: bool,
    pub style: PathStyle,
    pub z_index: ZIndex,
    pub locked: bool,
    pub visible: bool,
    label: String,
    pub payload: Payload,
}

impl Path {
    /// Build a path; a `closed` request with fewer than 3 vertices is reopened
    pub fn new(id: PathId, verts: Vec<VertexId>, closed: bool) -> Self {
        let closed = closed && verts.len() >= 3;
        Self {
            id,
            label: truncate_label(&format!("Path {}", id.0)),
            verts,
            closed,
            style: PathStyle::default(),
            z_index: ZIndex(z_order::FLOOR_USER),
            locked: false,
            visible: true,
            payload: Payload::None,
        }
    }

    pub fn verts(&self) -> &[VertexId] {
        &self.verts
    }

    pub fn len(&self) -> usize {
        self.verts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close or open the path. Closing is refused below 3 vertices.
    pub fn set_closed(&mut self, closed: bool) -> bool {
        if closed && self.verts.len() < 3 {
            return false;
        }
        self.closed = closed;
        true
    }

    /// At least two vertices: something to draw
    pub fn is_drawable(&self) -> bool {
        self.verts.len() >= 2
    }

    /// Closed with an interior
    pub fn is_area(&self) -> bool {
        self.closed && self.verts.len() >= 3
    }

    /// Visible and unlocked: eligible for picking and lasso
    pub fn is_selectable(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = truncate_label(label);
    }

    pub fn kind(&self) -> PathKind {
        self.payload.kind()
    }

    /// Retag the path, replacing the payload with the kind's default
    pub fn set_kind(&mut self, kind: PathKind) {
        if kind != self.kind() {
            self.payload = kind.default_payload();
        }
    }

    /// Number of segments (one extra for the closing segment)
    pub fn segment_count(&self) -> usize {
        match self.verts.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Vertex ids at both ends of segment `si`
    pub fn segment_endpoints(&self, si: usize) -> Option<(VertexId, VertexId)> {
        if si >= self.segment_count() {
            return None;
        }
        let n = self.verts.len();
        Some((self.verts[si], self.verts[(si + 1) % n]))
    }

    pub fn contains(&self, vid: VertexId) -> bool {
        self.verts.contains(&vid)
    }

    pub fn first(&self) -> Option<VertexId> {
        self.verts.first().copied()
    }

    pub fn last(&self) -> Option<VertexId> {
        self.verts.last().copied()
    }

    /// Which end of an open path `vid` is, if any
    pub fn endpoint(&self, vid: VertexId) -> Option<PathEnd> {
        if self.closed {
            return None;
        }
        if self.last() == Some(vid) {
            Some(PathEnd::Tail)
        } else if self.first() == Some(vid) {
            Some(PathEnd::Head)
        } else {
            None
        }
    }

    pub fn push_vertex(&mut self, vid: VertexId) {
        self.verts.push(vid);
    }

    pub fn prepend_vertex(&mut self, vid: VertexId) {
        self.verts.insert(0, vid);
    }

    /// Insert `vid` so it splits segment `seg_idx`
    pub fn insert_vertex_after(&mut self, seg_idx: usize, vid: VertexId) -> bool {
        if seg_idx >= self.verts.len() {
            return false;
        }
        self.verts.insert(seg_idx + 1, vid);
        true
    }

    /// Remove every occurrence of `vid`; returns whether the path is still drawable.
    ///
    /// A closed path that drops below three vertices is reopened.
    pub fn remove_vertex(&mut self, vid: VertexId) -> bool {
        self.verts.retain(|&v| v != vid);
        if self.closed && self.verts.len() < 3 {
            self.closed = false;
        }
        self.is_drawable()
    }

    /// Rewrite vertex ids (used when pasting copies)
    pub fn remap_vertices(&mut self, mut map: impl FnMut(VertexId) -> Option<VertexId>) {
        self.verts = self.verts.iter().filter_map(|&v| map(v)).collect();
        if self.closed && self.verts.len() < 3 {
            self.closed = false;
        }
    }
}

fn truncate_label(label: &str) -> String {
    label.chars().take(io::LABEL_MAX_CHARS).collect()
}

// ===== SERIALIZATION RECORD =====

fn default_label() -> String {
    "?".to_string()
}

fn default_z() -> ZIndex {
    ZIndex(z_order::FLOOR_USER)
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
struct PathRecord {
    verts: Vec<VertexId>,
    id: PathId,
    closed: bool,
    #[serde(default)]
    style: PathStyle,
    #[serde(default = "default_z")]
    z_index: ZIndex,
    #[serde(default)]
    locked: bool,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default = "default_label")]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<serde_json::Value>,
}

impl TryFrom<PathRecord> for Path {
    type Error = ModelError;

    fn try_from(r: PathRecord) -> Result<Self, Self::Error> {
        let payload = match (r.kind, r.payload) {
            (None, None) => Payload::None,
            (Some(kind), Some(value)) => match PathKind::from_name(&kind) {
                Some(kind) => Payload::from_value(kind, value).map_err(|e| {
                    ModelError::InvalidPayload {
                        path: r.id,
                        reason: e.to_string(),
                    }
                })?,
                None => {
                    tracing::warn!("{}: unknown kind {:?}, dropping payload", r.id, kind);
                    Payload::None
                }
            },
            (kind, payload) => {
                return Err(ModelError::KindPayloadMismatch {
                    path: r.id,
                    has_kind: kind.is_some(),
                    has_payload: payload.is_some(),
                });
            }
        };

        if r.closed && r.verts.len() < 3 {
            tracing::warn!("{}: closed with {} vertices, reopening", r.id, r.verts.len());
        }
        let mut path = Path::new(r.id, r.verts, r.closed);
        path.style = r.style;
        path.z_index = r.z_index;
        path.locked = r.locked;
        path.visible = r.visible;
        path.set_label(&r.label);
        path.payload = payload;
        Ok(path)
    }
}

impl From<Path> for PathRecord {
    fn from(p: Path) -> Self {
        // A payload that fails to serialize would be dropped together with its kind
        let payload = p.payload.to_value().ok().flatten();
        let kind = payload.as_ref().map(|_| p.kind().name().to_string());
        Self {
            verts: p.verts,
            id: p.id,
            closed: p.closed,
            style: p.style,
            z_index: p.z_index,
            locked: p.locked,
            visible: p.visible,
            label: p.label,
            kind,
            payload,
        }
    }
}
