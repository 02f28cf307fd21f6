// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Vertices and their Bezier handle data.
//!
//! A vertex is an anchor position plus a [`BezierControl`]: an incoming and
//! an outgoing handle stored as offsets from the anchor. A zero handle means
//! the adjoining segment leaves the anchor in a straight line.
//!
//! `CurvatureState` is derived data. It is recomputed every time a handle
//! changes and again on deserialization, so it can never disagree with the
//! handles it describes.

use super::entity_id::VertexId;
use crate::geometry::quantize;
use crate::settings::bezier;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Authoring hint for how the two handles of a vertex relate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvatureKind {
    /// Handles move independently
    #[default]
    Corner,
    /// Handles stay collinear; lengths are independent
    Smooth,
    /// Handles stay collinear and of equal length
    Symmetric,
}

/// Which handles are non-zero (within epsilon)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvatureState {
    #[default]
    None,
    In,
    Out,
    All,
}

/// Which handle of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSide {
    In,
    Out,
}

impl HandleSide {
    pub fn from_out(out: bool) -> Self {
        if out { HandleSide::Out } else { HandleSide::In }
    }

    pub fn opposite(self) -> Self {
        match self {
            HandleSide::In => HandleSide::Out,
            HandleSide::Out => HandleSide::In,
        }
    }
}

/// Handle offsets and curvature bookkeeping for one vertex
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BezierRecord", into = "BezierRecord")]
pub struct BezierControl {
    in_handle: Vec2,
    out_handle: Vec2,
    kind: CurvatureKind,
    state: CurvatureState,
}

impl BezierControl {
    pub fn new(kind: CurvatureKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn in_handle(&self) -> Vec2 {
        self.in_handle
    }

    pub fn out_handle(&self) -> Vec2 {
        self.out_handle
    }

    pub fn handle(&self, side: HandleSide) -> Vec2 {
        match side {
            HandleSide::In => self.in_handle,
            HandleSide::Out => self.out_handle,
        }
    }

    pub fn kind(&self) -> CurvatureKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: CurvatureKind) {
        self.kind = kind;
    }

    pub fn curvature_state(&self) -> CurvatureState {
        self.state
    }

    pub fn in_is_linear(&self) -> bool {
        is_zero(self.in_handle)
    }

    pub fn out_is_linear(&self) -> bool {
        is_zero(self.out_handle)
    }

    pub fn is_linear(&self) -> bool {
        self.state == CurvatureState::None
    }

    /// Set one handle, mirroring the other according to [`CurvatureKind`]
    pub fn set_handle(&mut self, side: HandleSide, handle: Vec2) {
        let handle = quantize_vec(handle);
        let mirrored = match self.kind {
            CurvatureKind::Corner => None,
            CurvatureKind::Symmetric => Some(-handle),
            CurvatureKind::Smooth => {
                let other = self.handle(side.opposite());
                let len = other.hypot();
                if is_zero(handle) || len < bezier::NUMERICAL_ERROR {
                    None
                } else {
                    Some(-handle.normalize() * len)
                }
            }
        };

        match side {
            HandleSide::In => self.in_handle = handle,
            HandleSide::Out => self.out_handle = handle,
        }
        if let Some(m) = mirrored {
            let m = quantize_vec(m);
            match side {
                HandleSide::In => self.out_handle = m,
                HandleSide::Out => self.in_handle = m,
            }
        }
        self.refresh_state();
    }

    pub fn set_in_handle(&mut self, handle: Vec2) {
        self.set_handle(HandleSide::In, handle);
    }

    pub fn set_out_handle(&mut self, handle: Vec2) {
        self.set_handle(HandleSide::Out, handle);
    }

    /// Overwrite both handles without any mirroring (used by transforms)
    pub fn set_handles(&mut self, in_handle: Vec2, out_handle: Vec2) {
        self.in_handle = quantize_vec(in_handle);
        self.out_handle = quantize_vec(out_handle);
        self.refresh_state();
    }

    /// Drop both handles, turning the vertex into a sharp corner
    pub fn reset(&mut self) {
        self.in_handle = Vec2::ZERO;
        self.out_handle = Vec2::ZERO;
        self.state = CurvatureState::None;
    }

    fn refresh_state(&mut self) {
        self.state = curvature_state_of(self.in_handle, self.out_handle);
    }
}

/// Epsilon test over a pair of handles
pub fn curvature_state_of(in_handle: Vec2, out_handle: Vec2) -> CurvatureState {
    match (!is_zero(in_handle), !is_zero(out_handle)) {
        (true, true) => CurvatureState::All,
        (true, false) => CurvatureState::In,
        (false, true) => CurvatureState::Out,
        (false, false) => CurvatureState::None,
    }
}

fn is_zero(v: Vec2) -> bool {
    v.x.abs() < bezier::NUMERICAL_ERROR && v.y.abs() < bezier::NUMERICAL_ERROR
}

fn quantize_vec(v: Vec2) -> Vec2 {
    Vec2::new(
        quantize(v.x, bezier::NUMERICAL_ERROR),
        quantize(v.y, bezier::NUMERICAL_ERROR),
    )
}

/// An anchor point that paths and lines refer to by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VertexRecord", into = "VertexRecord")]
pub struct Vertex {
    pub id: VertexId,
    pub pos: Point,
    /// Depth coordinate carried through for 3D-aware hosts; unused by the 2D core
    pub z: f64,
    pub bezier: BezierControl,
}

impl Vertex {
    pub fn new(id: VertexId, pos: Point) -> Self {
        Self {
            id,
            pos,
            z: 0.0,
            bezier: BezierControl::default(),
        }
    }

    pub fn curvature_state(&self) -> CurvatureState {
        self.bezier.curvature_state()
    }

    pub fn set_in_handle(&mut self, handle: Vec2) {
        self.bezier.set_in_handle(handle);
    }

    pub fn set_out_handle(&mut self, handle: Vec2) {
        self.bezier.set_out_handle(handle);
    }

    /// World position of a handle tip, if that handle is set
    pub fn handle_tip(&self, side: HandleSide) -> Option<Point> {
        let h = self.bezier.handle(side);
        if is_zero(h) { None } else { Some(self.pos + h) }
    }
}

// ===== SERIALIZATION RECORDS =====

#[derive(Serialize, Deserialize)]
struct BezierRecord {
    in_handle: [f64; 2],
    out_handle: [f64; 2],
    #[serde(default)]
    kind: CurvatureKind,
    // Written for readers of the file; recomputed on load
    #[serde(default)]
    curvature_state: CurvatureState,
}

impl From<BezierRecord> for BezierControl {
    fn from(r: BezierRecord) -> Self {
        let in_handle = Vec2::new(r.in_handle[0], r.in_handle[1]);
        let out_handle = Vec2::new(r.out_handle[0], r.out_handle[1]);
        Self {
            in_handle,
            out_handle,
            kind: r.kind,
            state: curvature_state_of(in_handle, out_handle),
        }
    }
}

impl From<BezierControl> for BezierRecord {
    fn from(b: BezierControl) -> Self {
        Self {
            in_handle: [b.in_handle.x, b.in_handle.y],
            out_handle: [b.out_handle.x, b.out_handle.y],
            kind: b.kind,
            curvature_state: b.state,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct VertexRecord {
    id: VertexId,
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
    #[serde(default)]
    bezier: BezierControl,
}

impl From<VertexRecord> for Vertex {
    fn from(r: VertexRecord) -> Self {
        Self {
            id: r.id,
            pos: Point::new(r.x, r.y),
            z: r.z,
            bezier: r.bezier,
        }
    }
}

impl From<Vertex> for VertexRecord {
    fn from(v: Vertex) -> Self {
        Self {
            id: v.id,
            x: v.pos.x,
            y: v.pos.y,
            z: v.z,
            bezier: v.bezier,
        }
    }
}
