// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The object store: sole owner of every vertex, path, point and line.
//!
//! Everything else in the editor holds ids and resolves them here on each
//! use. Lookups are fallible; an id that no longer resolves is reported as
//! "not found" and never panics.

use super::decoration::{Line, Point, PointStyle};
use super::entity_id::{IdAllocator, LineId, PathId, PointId, VertexId};
use super::error::ModelError;
use super::path::Path;
use super::vertex::Vertex;
use crate::geometry::{SegmentControls, segment_controls};
use indexmap::IndexMap;
use kurbo::{BezPath, Rect};

/// Arena of editor entities, keyed by typed ids
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    vertices: IndexMap<VertexId, Vertex>,
    paths: IndexMap<PathId, Path>,
    points: IndexMap<PointId, Point>,
    lines: IndexMap<LineId, Line>,

    vertex_ids: IdAllocator<VertexId>,
    path_ids: IdAllocator<PathId>,
    point_ids: IdAllocator<PointId>,
    line_ids: IdAllocator<LineId>,

    /// Bumped on every mutation that can change geometry or draw order
    revision: u64,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from loaded records.
    ///
    /// Dangling vertex references are dropped (with a warning) and the id
    /// allocators are advanced past every loaded id.
    pub fn from_parts(
        vertices: Vec<Vertex>,
        paths: Vec<Path>,
        points: Vec<Point>,
        lines: Vec<Line>,
    ) -> Self {
        let mut store = Self {
            vertices: vertices.into_iter().map(|v| (v.id, v)).collect(),
            paths: paths.into_iter().map(|p| (p.id, p)).collect(),
            points: points.into_iter().map(|p| (p.id, p)).collect(),
            lines: lines.into_iter().map(|l| (l.id, l)).collect(),
            ..Self::default()
        };
        // Ids of records dropped below must not be handed out again
        store.recompute_next_ids();
        let repaired = store.repair_references();
        if repaired > 0 {
            tracing::warn!("Dropped {} dangling vertex references on load", repaired);
        }
        store
    }

    /// Geometry revision; changes whenever stored data may have changed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Ensure future ids exceed every id currently stored
    pub fn recompute_next_ids(&mut self) {
        self.vertex_ids.advance_past(self.vertices.keys().copied());
        self.path_ids.advance_past(self.paths.keys().copied());
        self.point_ids.advance_past(self.points.keys().copied());
        self.line_ids.advance_past(self.lines.keys().copied());
    }

    /// Drop references to vertices that do not exist; returns how many went
    pub fn repair_references(&mut self) -> usize {
        let vertices = &self.vertices;
        let mut dropped = 0;

        for path in self.paths.values_mut() {
            let before = path.len();
            path.remap_vertices(|v| vertices.contains_key(&v).then_some(v));
            dropped += before - path.len();
        }

        let before = self.points.len() + self.lines.len();
        self.points.retain(|_, p| vertices.contains_key(&p.v));
        self.lines
            .retain(|_, l| vertices.contains_key(&l.a) && vertices.contains_key(&l.b));
        dropped += before - (self.points.len() + self.lines.len());

        if dropped > 0 {
            self.touch();
        }
        dropped
    }

    // ===== FACTORIES =====

    pub fn create_vertex(&mut self, pos: kurbo::Point) -> VertexId {
        let id = self.vertex_ids.next();
        self.vertices.insert(id, Vertex::new(id, pos));
        self.touch();
        id
    }

    /// Create a path over existing vertices, placed on top of the z-order
    pub fn create_path(
        &mut self,
        verts: Vec<VertexId>,
        closed: bool,
    ) -> Result<PathId, ModelError> {
        if let Some(&missing) = verts.iter().find(|v| !self.vertices.contains_key(*v)) {
            return Err(ModelError::VertexNotFound(missing));
        }
        let id = self.path_ids.next();
        let mut path = Path::new(id, verts, closed);
        path.z_index = self.assign_new_z();
        self.paths.insert(id, path);
        self.touch();
        Ok(id)
    }

    pub fn create_point(&mut self, v: VertexId, sty: PointStyle) -> Result<PointId, ModelError> {
        self.require_vertex(v)?;
        let id = self.point_ids.next();
        self.points.insert(id, Point { id, v, sty });
        self.touch();
        Ok(id)
    }

    /// Create a line between two existing vertices, placed on top of the z-order
    pub fn create_line(&mut self, a: VertexId, b: VertexId) -> Result<LineId, ModelError> {
        self.require_vertex(a)?;
        self.require_vertex(b)?;
        let id = self.line_ids.next();
        let mut line = Line::new(id, a, b);
        line.z_index = self.assign_new_z();
        self.lines.insert(id, line);
        self.touch();
        Ok(id)
    }

    fn require_vertex(&self, v: VertexId) -> Result<(), ModelError> {
        if self.vertices.contains_key(&v) {
            Ok(())
        } else {
            Err(ModelError::VertexNotFound(v))
        }
    }

    // ===== LOOKUP =====

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.touch();
        self.vertices.get_mut(&id)
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(&id)
    }

    pub fn path_mut(&mut self, id: PathId) -> Option<&mut Path> {
        self.touch();
        self.paths.get_mut(&id)
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(&id)
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.touch();
        self.points.get_mut(&id)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.touch();
        self.lines.get_mut(&id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.values()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.values()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
            && self.paths.is_empty()
            && self.points.is_empty()
            && self.lines.is_empty()
    }

    /// Paths whose vertex list contains `vid`
    pub fn paths_with_vertex(&self, vid: VertexId) -> impl Iterator<Item = &Path> {
        self.paths.values().filter(move |p| p.contains(vid))
    }

    /// A vertex can be picked unless a locked owner or only hidden owners hold it
    pub fn is_vertex_selectable(&self, vid: VertexId) -> bool {
        if !self.vertices.contains_key(&vid) {
            return false;
        }
        let mut owners = 0;
        let mut visible_owners = 0;
        for path in self.paths_with_vertex(vid) {
            if path.locked {
                return false;
            }
            owners += 1;
            visible_owners += usize::from(path.visible);
        }
        for line in self.lines.values().filter(|l| l.references(vid)) {
            if line.locked {
                return false;
            }
            owners += 1;
            visible_owners += usize::from(line.visible);
        }
        owners == 0 || visible_owners > 0
    }

    // ===== DELETION =====

    /// Delete a vertex and everything that depends on it.
    ///
    /// The vertex is first detached from every path (paths left with fewer
    /// than two vertices are removed), points wrapping it and lines touching
    /// it are removed, and only then is the vertex erased.
    pub fn delete_vertex(&mut self, vid: VertexId) -> Result<(), ModelError> {
        self.require_vertex(vid)?;

        let mut dead_paths = Vec::new();
        for path in self.paths.values_mut().filter(|p| p.contains(vid)) {
            if !path.remove_vertex(vid) {
                dead_paths.push(path.id);
            }
        }
        for id in &dead_paths {
            self.paths.shift_remove(id);
        }
        if !dead_paths.is_empty() {
            tracing::debug!("Deleting {} removed {} degenerate paths", vid, dead_paths.len());
        }

        self.points.retain(|_, p| p.v != vid);
        self.lines.retain(|_, l| !l.references(vid));
        self.vertices.shift_remove(&vid);
        self.touch();
        Ok(())
    }

    /// Delete a path; with `erase_orphans` its vertices that nothing else
    /// references are erased too
    pub fn delete_path(&mut self, id: PathId, erase_orphans: bool) -> Result<(), ModelError> {
        let path = self
            .paths
            .shift_remove(&id)
            .ok_or(ModelError::PathNotFound(id))?;

        if erase_orphans {
            let mut orphans: Vec<VertexId> = path
                .verts()
                .iter()
                .copied()
                .filter(|&v| !self.is_vertex_referenced(v))
                .collect();
            orphans.dedup();
            for v in orphans {
                self.vertices.shift_remove(&v);
            }
        }
        self.touch();
        Ok(())
    }

    pub fn delete_point(&mut self, id: PointId) -> Result<(), ModelError> {
        self.points
            .shift_remove(&id)
            .ok_or(ModelError::PointNotFound(id))?;
        self.touch();
        Ok(())
    }

    pub fn delete_line(&mut self, id: LineId) -> Result<(), ModelError> {
        self.lines
            .shift_remove(&id)
            .ok_or(ModelError::LineNotFound(id))?;
        self.touch();
        Ok(())
    }

    /// Whether any path, point or line still uses `vid`
    pub fn is_vertex_referenced(&self, vid: VertexId) -> bool {
        self.paths.values().any(|p| p.contains(vid))
            || self.points.values().any(|p| p.v == vid)
            || self.lines.values().any(|l| l.references(vid))
    }

    // ===== PATH STRUCTURE =====

    /// Split segment `seg_idx` of `path` by inserting `vid`
    pub fn insert_vertex_after(
        &mut self,
        path: PathId,
        seg_idx: usize,
        vid: VertexId,
    ) -> Result<bool, ModelError> {
        self.require_vertex(vid)?;
        let p = self
            .paths
            .get_mut(&path)
            .ok_or(ModelError::PathNotFound(path))?;
        let inserted = p.insert_vertex_after(seg_idx, vid);
        if inserted {
            self.touch();
        }
        Ok(inserted)
    }

    /// Remove `vid` from one path's vertex list; returns whether the path is
    /// still drawable. A closed path dropping below three vertices reopens.
    pub fn remove_vertex(&mut self, path: PathId, vid: VertexId) -> Result<bool, ModelError> {
        let p = self
            .paths
            .get_mut(&path)
            .ok_or(ModelError::PathNotFound(path))?;
        let still_valid = p.remove_vertex(vid);
        self.touch();
        Ok(still_valid)
    }

    // ===== GEOMETRY QUERIES =====

    /// Control points of segment `si` of `path`
    pub fn segment_control_points(&self, path: PathId, si: usize) -> Option<SegmentControls> {
        let (a, b) = self.paths.get(&path)?.segment_endpoints(si)?;
        Some(segment_controls(self.vertex(a)?, self.vertex(b)?))
    }

    /// Every resolvable segment of a path, in order
    pub fn path_segments(&self, path: &Path) -> Vec<SegmentControls> {
        (0..path.segment_count())
            .filter_map(|si| {
                let (a, b) = path.segment_endpoints(si)?;
                Some(segment_controls(self.vertex(a)?, self.vertex(b)?))
            })
            .collect()
    }

    /// The path as a kurbo `BezPath`, for hosts that render with kurbo
    pub fn path_bezpath(&self, id: PathId) -> Option<BezPath> {
        let path = self.paths.get(&id)?;
        let segments = self.path_segments(path);
        let first = segments.first()?;

        let mut bez = BezPath::new();
        bez.move_to(first.p0);
        for seg in &segments {
            if seg.is_linear {
                bez.line_to(seg.p3);
            } else {
                bez.curve_to(seg.p1, seg.p2, seg.p3);
            }
        }
        if path.is_closed() {
            bez.close_path();
        }
        Some(bez)
    }

    /// Flattened outline of a path; curved segments use `steps` subdivisions
    pub fn path_polygon(&self, path: &Path, steps: usize) -> Vec<kurbo::Point> {
        let mut poly = Vec::new();
        for seg in self.path_segments(path) {
            let pts = seg.flatten(steps);
            // Each segment starts where the previous one ended
            let skip = usize::from(!poly.is_empty());
            poly.extend(pts.into_iter().skip(skip));
        }
        if path.is_closed() && poly.len() > 1 {
            poly.pop();
        }
        poly
    }

    /// Curve-tight bounds of a path
    pub fn path_tight_bounds(&self, id: PathId) -> Option<Rect> {
        let path = self.paths.get(&id)?;
        self.path_segments(path)
            .iter()
            .map(SegmentControls::bounds)
            .reduce(|a, b| a.union(b))
    }
}
