// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing commands for EditSession: translation, nudging, deletion,
//! z-order and curvature changes on the current selection

use super::EditSession;
use crate::model::{CurvatureKind, HandleSide, VertexId};
use kurbo::Vec2;
use std::collections::BTreeSet;

impl EditSession {
    /// Move every selected vertex by `delta` in world space.
    ///
    /// Handles are offsets from their anchor, so curves keep their shape.
    /// Returns the number of vertices moved.
    pub fn translate_selection(&mut self, delta: Vec2) -> usize {
        if self.selection_mask.is_locked() || delta == Vec2::ZERO {
            return 0;
        }
        let ids: Vec<VertexId> = self.selection.vertices().iter().copied().collect();
        let mut moved = 0;
        for id in ids {
            if !self.store.is_vertex_selectable(id) {
                continue;
            }
            if let Some(v) = self.store.vertex_mut(id) {
                v.pos += delta;
                moved += 1;
            }
        }
        moved
    }

    /// Nudge the selection by an arrow-key step
    ///
    /// Step sizes are configured in `settings::nudge`.
    pub fn nudge_selection(&mut self, delta: Vec2) {
        let moved = self.translate_selection(delta);
        if moved > 0 {
            tracing::debug!("Nudged {} vertices by ({}, {})", moved, delta.x, delta.y);
        }
    }

    /// Delete the selected objects.
    ///
    /// Whole paths, lines and points go first, taking their vertices with
    /// them unless something else still uses those vertices. A vertex that
    /// was selected on its own is then removed from every path it sits on.
    pub fn delete_selection(&mut self) {
        if self.selection_mask.is_locked() || self.selection.is_empty() {
            return;
        }

        // Vertices covered by a selected object are not "on their own"
        let mut covered: BTreeSet<VertexId> = BTreeSet::new();
        for &id in self.selection.paths().iter() {
            if let Some(path) = self.store.path(id) {
                covered.extend(path.verts().iter().copied());
            }
        }
        for &id in self.selection.lines().iter() {
            if let Some(line) = self.store.line(id) {
                covered.extend([line.a, line.b]);
            }
        }
        for &id in self.selection.points().iter() {
            if let Some(pt) = self.store.point(id) {
                covered.insert(pt.v);
            }
        }
        let loose: Vec<VertexId> = self
            .selection
            .vertices()
            .iter()
            .copied()
            .filter(|v| !covered.contains(v))
            .collect();

        let paths: Vec<_> = self.selection.paths().iter().copied().collect();
        let lines: Vec<_> = self.selection.lines().iter().copied().collect();
        let points: Vec<_> = self.selection.points().iter().copied().collect();

        for id in &paths {
            if let Err(e) = self.store.delete_path(*id, true) {
                tracing::debug!("Skipping delete: {}", e);
            }
        }
        for id in &lines {
            let ends = self.store.line(*id).map(|l| [l.a, l.b]);
            if let Err(e) = self.store.delete_line(*id) {
                tracing::debug!("Skipping delete: {}", e);
            }
            for v in ends.into_iter().flatten() {
                self.erase_if_orphan(v);
            }
        }
        for id in &points {
            let v = self.store.point(*id).map(|pt| pt.v);
            if let Err(e) = self.store.delete_point(*id) {
                tracing::debug!("Skipping delete: {}", e);
            }
            if let Some(v) = v {
                self.erase_if_orphan(v);
            }
        }
        for v in &loose {
            if self.store.vertex(*v).is_some() {
                if let Err(e) = self.store.delete_vertex(*v) {
                    tracing::debug!("Skipping delete: {}", e);
                }
            }
        }

        tracing::info!(
            "Deleted {} paths, {} lines, {} points, {} vertices",
            paths.len(),
            lines.len(),
            points.len(),
            loose.len()
        );
        self.selection.clear();
        self.selection.prune(&self.store);
    }

    fn erase_if_orphan(&mut self, v: VertexId) {
        if self.store.vertex(v).is_some() && !self.store.is_vertex_referenced(v) {
            if let Err(e) = self.store.delete_vertex(v) {
                tracing::debug!("Skipping delete: {}", e);
            }
        }
    }

    // ===== Z-order =====

    /// Move the selected paths and lines above everything else
    pub fn bring_selection_to_front(&mut self) -> bool {
        let targets = self.selection.z_targets();
        self.store.bring_to_front(&targets)
    }

    /// Move the selected paths and lines below everything else
    pub fn send_selection_to_back(&mut self) -> bool {
        let targets = self.selection.z_targets();
        self.store.send_to_back(&targets)
    }

    pub fn bring_selection_forward(&mut self) -> bool {
        let targets = self.selection.z_targets();
        self.store.bring_forward(&targets)
    }

    pub fn send_selection_backward(&mut self) -> bool {
        let targets = self.selection.z_targets();
        self.store.send_backward(&targets)
    }

    // ===== Curvature =====

    /// Set the handle relationship of every selected vertex.
    ///
    /// Switching to a linked kind re-applies the out-handle so the in-handle
    /// follows it immediately.
    pub fn set_selection_curvature(&mut self, kind: CurvatureKind) -> usize {
        if self.selection_mask.is_locked() {
            return 0;
        }
        let ids: Vec<VertexId> = self.selection.vertices().iter().copied().collect();
        let mut changed = 0;
        for id in ids {
            if let Some(v) = self.store.vertex_mut(id) {
                v.bezier.set_kind(kind);
                let out = v.bezier.out_handle();
                if kind != CurvatureKind::Corner && !v.bezier.out_is_linear() {
                    v.bezier.set_handle(HandleSide::Out, out);
                }
                changed += 1;
            }
        }
        changed
    }

    /// Drop both handles of every selected vertex, making it a corner
    pub fn straighten_selection(&mut self) -> usize {
        if self.selection_mask.is_locked() {
            return 0;
        }
        let ids: Vec<VertexId> = self.selection.vertices().iter().copied().collect();
        let mut changed = 0;
        for id in ids {
            if let Some(v) = self.store.vertex_mut(id) {
                v.bezier.reset();
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurvatureState, PointStyle, ZTarget};
    use kurbo::Point;

    fn open_path(session: &mut EditSession) -> (crate::model::PathId, Vec<VertexId>) {
        let ids: Vec<_> = [(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]
            .into_iter()
            .map(|(x, y)| session.store.create_vertex(Point::new(x, y)))
            .collect();
        let path = session.store.create_path(ids.clone(), false).unwrap();
        (path, ids)
    }

    #[test]
    fn deleting_a_lone_vertex_splices_it_out() {
        let mut session = EditSession::new();
        let (path, ids) = open_path(&mut session);
        session.selection.vertices_mut().insert(ids[1]);
        session.delete_selection();
        assert_eq!(session.store.path(path).unwrap().verts(), &[ids[0], ids[2]]);
        assert!(session.store.vertex(ids[1]).is_none());
    }

    #[test]
    fn deleting_a_path_keeps_shared_vertices() {
        let mut session = EditSession::new();
        let (path, ids) = open_path(&mut session);
        let pt = session.store.create_point(ids[0], PointStyle::default()).unwrap();
        session.selection.paths_mut().insert(path);
        session.selection.rebuild_vertices(&session.store);

        session.delete_selection();
        assert!(session.store.path(path).is_none());
        assert!(session.store.vertex(ids[0]).is_some());
        assert!(session.store.point(pt).is_some());
        assert!(session.store.vertex(ids[1]).is_none());
    }

    #[test]
    fn deleting_a_line_erases_orphaned_ends() {
        let mut session = EditSession::new();
        let a = session.store.create_vertex(Point::ORIGIN);
        let b = session.store.create_vertex(Point::new(10.0, 0.0));
        let line = session.store.create_line(a, b).unwrap();
        session.selection.lines_mut().insert(line);
        session.delete_selection();
        assert!(session.store.is_empty());
    }

    #[test]
    fn locked_selection_is_not_deleted() {
        let mut session = EditSession::new();
        let (path, _) = open_path(&mut session);
        session.selection.paths_mut().insert(path);
        session.selection_mask.set_locked(true);
        session.delete_selection();
        assert!(session.store.path(path).is_some());
    }

    #[test]
    fn translate_keeps_handles_relative() {
        let mut session = EditSession::new();
        let (_, ids) = open_path(&mut session);
        session
            .store
            .vertex_mut(ids[0])
            .unwrap()
            .set_out_handle(Vec2::new(10.0, 10.0));
        session.selection.vertices_mut().insert(ids[0]);
        assert_eq!(session.translate_selection(Vec2::new(5.0, 0.0)), 1);
        let v = session.store.vertex(ids[0]).unwrap();
        assert_eq!(v.pos, Point::new(5.0, 0.0));
        assert_eq!(v.handle_tip(crate::model::HandleSide::Out), Some(Point::new(15.0, 10.0)));
    }

    #[test]
    fn bring_to_front_reorders_selected_path() {
        let mut session = EditSession::new();
        let (first, _) = open_path(&mut session);
        let (second, _) = open_path(&mut session);
        session.selection.paths_mut().insert(first);
        assert!(session.bring_selection_to_front());
        let order = session.store.z_ordered();
        assert_eq!(order.last(), Some(&ZTarget::Path(first)));
        assert_eq!(order.first(), Some(&ZTarget::Path(second)));
    }

    #[test]
    fn symmetric_curvature_mirrors_out_handle() {
        let mut session = EditSession::new();
        let (_, ids) = open_path(&mut session);
        session
            .store
            .vertex_mut(ids[1])
            .unwrap()
            .set_out_handle(Vec2::new(10.0, 5.0));
        session.selection.vertices_mut().insert(ids[1]);
        assert_eq!(session.set_selection_curvature(CurvatureKind::Symmetric), 1);
        let v = session.store.vertex(ids[1]).unwrap();
        assert_eq!(v.bezier.in_handle(), Vec2::new(-10.0, -5.0));
        assert_eq!(v.curvature_state(), CurvatureState::All);
    }

    #[test]
    fn straighten_clears_curvature() {
        let mut session = EditSession::new();
        let (_, ids) = open_path(&mut session);
        session
            .store
            .vertex_mut(ids[1])
            .unwrap()
            .set_in_handle(Vec2::new(-10.0, 0.0));
        session.selection.vertices_mut().insert(ids[1]);
        assert_eq!(session.straighten_selection(), 1);
        assert_eq!(
            session.store.vertex(ids[1]).unwrap().curvature_state(),
            CurvatureState::None
        );
    }
}
