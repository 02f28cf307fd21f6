// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Copy and paste of selected objects

use super::selection::Selection;
use crate::model::{Line, ObjectStore, Path, Point, Vertex, VertexId};
use kurbo::{Rect, Vec2};
use std::collections::BTreeMap;

/// Where pasted objects land
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PastePlacement {
    /// Shift the copy by a fixed world offset
    Offset(Vec2),
    /// Move the copy so the top-left of its bounds sits at this point
    At(kurbo::Point),
}

/// Detached snapshot of copied objects and the vertices they use
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipboardContents {
    vertices: Vec<Vertex>,
    paths: Vec<Path>,
    lines: Vec<Line>,
    points: Vec<Point>,
}

impl ClipboardContents {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.lines.is_empty() && self.points.is_empty()
    }

    pub fn object_count(&self) -> usize {
        self.paths.len() + self.lines.len() + self.points.len()
    }

    /// Bounds of the copied anchors
    pub fn bounds(&self) -> Option<Rect> {
        self.vertices.iter().map(|v| v.pos).fold(None, |acc, p| {
            Some(acc.map_or(Rect::from_points(p, p), |r: Rect| r.union_pt(p)))
        })
    }
}

/// Snapshot selected paths, lines and points. `None` if nothing resolves.
pub fn copy_selection(store: &ObjectStore, selection: &Selection) -> Option<ClipboardContents> {
    let mut paths: Vec<Path> = selection
        .paths()
        .iter()
        .filter_map(|&id| store.path(id).cloned())
        .collect();
    let mut lines: Vec<Line> = selection
        .lines()
        .iter()
        .filter_map(|&id| store.line(id).cloned())
        .collect();
    let points: Vec<Point> = selection
        .points()
        .iter()
        .filter_map(|&id| store.point(id).cloned())
        .collect();

    // Pasted objects are restacked in this order
    paths.sort_by_key(|p| p.z_index);
    lines.sort_by_key(|l| l.z_index);

    let mut used: Vec<VertexId> = Vec::new();
    used.extend(paths.iter().flat_map(|p| p.verts().iter().copied()));
    used.extend(lines.iter().flat_map(|l| [l.a, l.b]));
    used.extend(points.iter().map(|p| p.v));
    used.sort_unstable();
    used.dedup();

    let contents = ClipboardContents {
        vertices: used
            .into_iter()
            .filter_map(|id| store.vertex(id).cloned())
            .collect(),
        paths,
        lines,
        points,
    };
    if contents.is_empty() {
        None
    } else {
        tracing::debug!("Copied {} objects", contents.object_count());
        Some(contents)
    }
}

/// Insert a fresh copy of `contents` and select it.
///
/// Every vertex gets a new id; paths and lines are stacked above
/// everything else, keeping their relative order.
pub fn paste(
    store: &mut ObjectStore,
    selection: &mut Selection,
    contents: &ClipboardContents,
    placement: PastePlacement,
) -> usize {
    if contents.is_empty() {
        return 0;
    }
    let offset = match (placement, contents.bounds()) {
        (PastePlacement::Offset(d), _) => d,
        (PastePlacement::At(target), Some(bounds)) => target - bounds.origin(),
        (PastePlacement::At(_), None) => Vec2::ZERO,
    };

    let mut remap: BTreeMap<VertexId, VertexId> = BTreeMap::new();
    for v in &contents.vertices {
        let id = store.create_vertex(v.pos + offset);
        if let Some(new) = store.vertex_mut(id) {
            new.z = v.z;
            new.bezier = v.bezier.clone();
        }
        remap.insert(v.id, id);
    }

    selection.clear();
    let mut pasted = 0;

    for src in &contents.paths {
        let verts: Vec<VertexId> = src
            .verts()
            .iter()
            .filter_map(|v| remap.get(v).copied())
            .collect();
        let Ok(id) = store.create_path(verts, src.is_closed()) else {
            continue;
        };
        if let Some(path) = store.path_mut(id) {
            path.style = src.style;
            path.payload = src.payload.clone();
            path.set_label(src.label());
        }
        selection.paths_mut().insert(id);
        pasted += 1;
    }

    for src in &contents.lines {
        let (Some(&a), Some(&b)) = (remap.get(&src.a), remap.get(&src.b)) else {
            continue;
        };
        let Ok(id) = store.create_line(a, b) else {
            continue;
        };
        if let Some(line) = store.line_mut(id) {
            line.color = src.color;
            line.thickness = src.thickness;
        }
        selection.lines_mut().insert(id);
        pasted += 1;
    }

    for src in &contents.points {
        let Some(&v) = remap.get(&src.v) else {
            continue;
        };
        if let Ok(id) = store.create_point(v, src.sty) {
            selection.points_mut().insert(id);
            pasted += 1;
        }
    }

    selection.rebuild_vertices(store);
    tracing::info!("Pasted {} objects", pasted);
    pasted
}
