// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen tool for authoring paths vertex by vertex.
//!
//! Every press places a vertex. A press that then travels far enough,
//! quickly enough, turns into handle authoring for that vertex instead of
//! leaving a corner behind.

use crate::editing::hit_test::{Hit, HitKind, HitTarget};
use crate::editing::{Drag, EditSession, MouseDelegate, MouseEvent};
use crate::model::{CurvatureKind, HandleSide, PathEnd, PathId, PointStyle, VertexId};
use crate::tools::{Tool, ToolId};
use kurbo::Point;

// ===== Pen State =====

/// What the current press is doing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PenGesture {
    /// Waiting for the next click
    #[default]
    Idle,
    /// A vertex was just placed and may still become curved
    Pending {
        vertex: VertexId,
        press_time: f64,
        press_screen: Point,
    },
    /// Dragging one handle of `vertex`
    DraggingHandle { vertex: VertexId, side: HandleSide },
}

/// Path being extended and which end new vertices attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePath {
    pub path: PathId,
    /// New vertices go before the head rather than after the tail
    pub prepend: bool,
}

// ===== PenTool Struct =====

#[derive(Debug, Clone, Default)]
pub struct PenTool {
    active: Option<ActivePath>,
    gesture: PenGesture,
    /// Last hover position, for the rubber-band preview
    cursor: Option<Point>,
}

// ===== Tool Implementation =====

impl Tool for PenTool {
    fn id(&self) -> ToolId {
        ToolId::Pen
    }

    /// Close the path when it has enough vertices, otherwise leave it open
    fn finish(&mut self, session: &mut EditSession) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.gesture = PenGesture::Idle;
        let Some(path) = session.store.path_mut(active.path) else {
            return;
        };
        if path.len() >= 3 {
            path.set_closed(true);
            tracing::info!("Pen: closed {}", active.path);
        } else if path.len() < 2 {
            discard_path(session, active.path);
        } else {
            tracing::info!("Pen: finished open {}", active.path);
        }
    }

    fn is_busy(&self) -> bool {
        self.active.is_some() || self.gesture != PenGesture::Idle
    }
}

// ===== MouseDelegate Implementation =====

impl MouseDelegate for PenTool {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, data: &mut EditSession) {
        self.gesture = PenGesture::Idle;
        let hit = data.hit_at(event.pos);

        // Alt on a point glyph pulls a fresh out-handle from that vertex
        if event.mods.alt {
            if let Some(vertex) = point_glyph_vertex(hit, data) {
                if let Some(v) = data.store.vertex_mut(vertex) {
                    v.bezier.set_kind(CurvatureKind::Corner);
                    v.set_out_handle(kurbo::Vec2::ZERO);
                }
                self.gesture = PenGesture::DraggingHandle {
                    vertex,
                    side: HandleSide::Out,
                };
                tracing::debug!("Pen: editing out-handle of {}", vertex);
                return;
            }
        }

        let pos = if data.want_snap(event.mods) {
            crate::geometry::snap_to_grid(event.pos, data.config().snap_step)
        } else {
            event.pos
        };

        match self.active {
            None => {
                if let Some(active) = open_endpoint(hit, data) {
                    tracing::debug!("Pen: continuing {} (prepend {})", active.path, active.prepend);
                    self.active = Some(active);
                    return;
                }
                // A new path only starts on empty canvas
                if hit.is_some_and(|h| h.kind.is_object()) {
                    tracing::debug!("Pen: press on an existing object, not starting a path");
                    return;
                }
                self.start_path(pos, event, data);
            }
            Some(active) => {
                if self.near_closing_vertex(event.pos, active, data) {
                    if let Some(path) = data.store.path_mut(active.path) {
                        path.set_closed(true);
                    }
                    self.active = None;
                    tracing::info!("Pen: closed {}", active.path);
                    return;
                }
                self.extend_path(pos, active, event, data);
            }
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, _data: &mut EditSession) {
        self.cursor = Some(event.pos);
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        self.left_drag_changed(event, drag, data);
    }

    fn left_drag_changed(&mut self, event: MouseEvent, _drag: Drag, data: &mut EditSession) {
        self.cursor = Some(event.pos);
        match self.gesture {
            PenGesture::Idle => {}
            PenGesture::Pending {
                vertex,
                press_time,
                press_screen,
            } => {
                let (threshold, window) = {
                    let config = data.config();
                    (config.pen_movement_threshold, config.pen_time_window)
                };
                if event.time - press_time > window {
                    // Too slow: the vertex stays a corner
                    self.gesture = PenGesture::Idle;
                } else if (event.screen - press_screen).hypot() >= threshold {
                    let side = match self.active {
                        Some(ActivePath { prepend: true, .. }) => HandleSide::In,
                        _ => HandleSide::Out,
                    };
                    if let Some(v) = data.store.vertex_mut(vertex) {
                        v.bezier.set_kind(CurvatureKind::Symmetric);
                    }
                    self.gesture = PenGesture::DraggingHandle { vertex, side };
                    tracing::debug!("Pen: authoring handles on {}", vertex);
                    set_handle_tip(data, vertex, side, event.pos);
                }
            }
            PenGesture::DraggingHandle { vertex, side } => {
                set_handle_tip(data, vertex, side, event.pos);
            }
        }
    }

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        self.left_drag_changed(event, drag, data);
        self.gesture = PenGesture::Idle;
    }

    fn left_up(&mut self, _event: MouseEvent, _data: &mut EditSession) {
        self.gesture = PenGesture::Idle;
    }

    /// Abort: drop the handle being authored and end the path, deleting it
    /// if it never got a second vertex
    fn cancel(&mut self, data: &mut EditSession) {
        if let PenGesture::DraggingHandle { vertex, side } = self.gesture {
            if let Some(v) = data.store.vertex_mut(vertex) {
                v.bezier.set_kind(CurvatureKind::Corner);
                match side {
                    HandleSide::In => v.set_in_handle(kurbo::Vec2::ZERO),
                    HandleSide::Out => v.set_out_handle(kurbo::Vec2::ZERO),
                }
            }
        }
        self.gesture = PenGesture::Idle;
        if let Some(active) = self.active.take() {
            if data.store.path(active.path).is_some_and(|p| p.len() < 2) {
                discard_path(data, active.path);
            }
        }
        tracing::debug!("Pen: cancelled");
    }
}

// ===== Helper Methods =====

impl PenTool {
    pub fn active(&self) -> Option<ActivePath> {
        self.active
    }

    pub fn gesture(&self) -> PenGesture {
        self.gesture
    }

    /// Segment from the attach point to the cursor while a path is open
    pub fn preview_segment(&self, data: &EditSession) -> Option<(Point, Point)> {
        let active = self.active?;
        let cursor = self.cursor?;
        let path = data.store.path(active.path)?;
        let attach = if active.prepend {
            path.first()
        } else {
            path.last()
        }?;
        Some((data.store.vertex(attach)?.pos, cursor))
    }

    fn start_path(&mut self, pos: Point, event: MouseEvent, data: &mut EditSession) {
        let vertex = data.store.create_vertex(pos);
        let path = match data.store.create_path(vec![vertex], false) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Pen: could not start path: {}", e);
                return;
            }
        };
        add_point_glyph(data, vertex);
        self.active = Some(ActivePath {
            path,
            prepend: false,
        });
        self.pend(vertex, event);
        tracing::debug!("Pen: started {}", path);
    }

    fn extend_path(&mut self, pos: Point, active: ActivePath, event: MouseEvent, data: &mut EditSession) {
        if data.store.path(active.path).is_none() {
            // Deleted underneath us
            self.active = None;
            self.start_path(pos, event, data);
            return;
        }
        let vertex = data.store.create_vertex(pos);
        if let Some(path) = data.store.path_mut(active.path) {
            if active.prepend {
                path.prepend_vertex(vertex);
            } else {
                path.push_vertex(vertex);
            }
        }
        add_point_glyph(data, vertex);
        self.pend(vertex, event);
    }

    fn pend(&mut self, vertex: VertexId, event: MouseEvent) {
        self.gesture = PenGesture::Pending {
            vertex,
            press_time: event.time,
            press_screen: event.screen,
        };
    }

    /// Whether `pos` is on the far end of a path that can be closed
    fn near_closing_vertex(&self, pos: Point, active: ActivePath, data: &EditSession) -> bool {
        let Some(path) = data.store.path(active.path) else {
            return false;
        };
        if path.len() < 3 {
            return false;
        }
        let far = if active.prepend {
            path.last()
        } else {
            path.first()
        };
        let radius_sq = data.hit_params().radius_sq;
        far.and_then(|id| data.store.vertex(id))
            .is_some_and(|v| (v.pos - pos).hypot2() <= radius_sq)
    }
}

fn set_handle_tip(data: &mut EditSession, vertex: VertexId, side: HandleSide, tip: Point) {
    if let Some(v) = data.store.vertex_mut(vertex) {
        let handle = tip - v.pos;
        v.bezier.set_handle(side, handle);
    }
}

fn add_point_glyph(data: &mut EditSession, vertex: VertexId) {
    if let Err(e) = data.store.create_point(vertex, PointStyle::default()) {
        tracing::warn!("Pen: no point glyph for {}: {}", vertex, e);
    }
}

/// Vertex under a point glyph hit
fn point_glyph_vertex(hit: Option<Hit>, data: &EditSession) -> Option<VertexId> {
    match hit? {
        Hit {
            kind: HitKind::Vertex,
            target: HitTarget::Point(id),
            ..
        } => data.store.point(id).map(|pt| pt.v),
        _ => None,
    }
}

/// Open path whose head or tail is under the cursor
fn open_endpoint(hit: Option<Hit>, data: &EditSession) -> Option<ActivePath> {
    let hit = hit?;
    if hit.kind != HitKind::Vertex {
        return None;
    }
    let vertex = match hit.target {
        HitTarget::Vertex(id) => id,
        HitTarget::Point(id) => data.store.point(id)?.v,
        _ => return None,
    };
    data.store
        .paths_with_vertex(vertex)
        .filter(|p| !p.is_closed() && p.is_selectable())
        .find_map(|p| {
            p.endpoint(vertex).map(|end| ActivePath {
                path: p.id,
                prepend: end == PathEnd::Head && p.len() > 1,
            })
        })
}

/// Remove a path and everything the pen created for it
fn discard_path(data: &mut EditSession, id: PathId) {
    let verts: Vec<VertexId> = data
        .store
        .path(id)
        .map(|p| p.verts().to_vec())
        .unwrap_or_default();
    for v in verts {
        if data.store.paths_with_vertex(v).count() > 1 {
            continue;
        }
        if let Err(e) = data.store.delete_vertex(v) {
            tracing::warn!("Pen: failed to delete {}: {}", v, e);
        }
    }
    if data.store.path(id).is_some() {
        if let Err(e) = data.store.delete_path(id, true) {
            tracing::warn!("Pen: failed to delete {}: {}", id, e);
        }
    }
    data.selection.prune(&data.store);
    tracing::debug!("Pen: discarded {}", id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{FrameInput, Modifiers};
    use crate::model::CurvatureState;

    fn pen_session() -> EditSession {
        let mut session = EditSession::new();
        session.set_tool(ToolId::Pen);
        session
    }

    fn click(session: &mut EditSession, p: Point) {
        session.update(&FrameInput::at(p).pressed());
        session.update(&FrameInput::at(p).released());
    }

    fn active_path(session: &EditSession) -> PathId {
        session
            .current_tool
            .as_pen()
            .and_then(|pen| pen.active())
            .map(|a| a.path)
            .unwrap()
    }

    #[test]
    fn quick_drag_makes_a_curved_vertex() {
        let mut session = pen_session();
        session.update(&FrameInput::at(Point::new(0.0, 0.0)).pressed());
        session.update(&FrameInput::at(Point::new(10.0, 0.0)).held().with_dt(0.02));
        session.update(&FrameInput::at(Point::new(10.0, 0.0)).released().with_dt(0.02));

        let v = session.store.vertices().next().unwrap();
        assert_ne!(v.curvature_state(), CurvatureState::None);
        assert_eq!(v.bezier.out_handle(), kurbo::Vec2::new(10.0, 0.0));
        // Symmetric authoring mirrors the other side
        assert_eq!(v.bezier.in_handle(), kurbo::Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn click_without_drag_makes_a_corner() {
        let mut session = pen_session();
        click(&mut session, Point::new(0.0, 0.0));
        let v = session.store.vertices().next().unwrap();
        assert_eq!(v.curvature_state(), CurvatureState::None);
        assert_eq!(session.store.point_count(), 1);
    }

    #[test]
    fn slow_drag_stays_a_corner() {
        let mut session = pen_session();
        session.update(&FrameInput::at(Point::new(0.0, 0.0)).pressed());
        session.update(&FrameInput::at(Point::new(1.0, 0.0)).held().with_dt(0.5));
        session.update(&FrameInput::at(Point::new(20.0, 0.0)).held().with_dt(0.02));
        session.update(&FrameInput::at(Point::new(20.0, 0.0)).released());
        let v = session.store.vertices().next().unwrap();
        assert_eq!(v.curvature_state(), CurvatureState::None);
    }

    #[test]
    fn clicking_near_the_start_closes() {
        let mut session = pen_session();
        for p in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)] {
            click(&mut session, Point::new(p.0, p.1));
        }
        let path = active_path(&session);
        click(&mut session, Point::new(2.0, 1.0));

        let p = session.store.path(path).unwrap();
        assert!(p.is_closed());
        assert_eq!(p.len(), 3);
        assert!(session.current_tool.as_pen().unwrap().active().is_none());
    }

    #[test]
    fn two_vertices_cannot_close_by_clicking_start() {
        let mut session = pen_session();
        click(&mut session, Point::new(0.0, 0.0));
        click(&mut session, Point::new(100.0, 0.0));
        let path = active_path(&session);
        // Clicking on the start vertex again just adds another vertex
        click(&mut session, Point::new(0.0, 0.0));
        assert_eq!(session.store.path(path).unwrap().len(), 3);
        assert!(!session.store.path(path).unwrap().is_closed());
    }

    #[test]
    fn enter_closes_with_three_vertices() {
        let mut session = pen_session();
        for p in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)] {
            click(&mut session, Point::new(p.0, p.1));
        }
        let path = active_path(&session);
        let mut enter = FrameInput::at(Point::new(100.0, 100.0));
        enter.enter = true;
        session.update(&enter);
        assert!(session.store.path(path).unwrap().is_closed());
    }

    #[test]
    fn double_click_with_two_vertices_leaves_path_open() {
        let mut session = pen_session();
        click(&mut session, Point::new(0.0, 0.0));
        click(&mut session, Point::new(100.0, 0.0));
        let path = active_path(&session);
        let mut dbl = FrameInput::at(Point::new(100.0, 0.0)).pressed();
        dbl.double_click = true;
        session.update(&dbl);
        session.update(&FrameInput::at(Point::new(100.0, 0.0)).released());

        let p = session.store.path(path).unwrap();
        assert!(!p.is_closed());
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn escape_with_one_vertex_discards_the_path() {
        let mut session = pen_session();
        click(&mut session, Point::new(0.0, 0.0));
        let mut esc = FrameInput::at(Point::new(0.0, 0.0));
        esc.escape = true;
        session.update(&esc);
        assert!(session.store.is_empty());
    }

    #[test]
    fn clicking_an_open_head_prepends() {
        let mut session = pen_session();
        click(&mut session, Point::new(0.0, 0.0));
        click(&mut session, Point::new(100.0, 0.0));
        let path = active_path(&session);
        let mut enter = FrameInput::at(Point::new(100.0, 0.0));
        enter.enter = true;
        session.update(&enter);

        // Continue from the head, then add one vertex in front of it
        click(&mut session, Point::new(0.0, 0.0));
        click(&mut session, Point::new(-100.0, 0.0));
        let p = session.store.path(path).unwrap();
        assert_eq!(p.len(), 3);
        let head = session.store.vertex(p.first().unwrap()).unwrap();
        assert_eq!(head.pos, Point::new(-100.0, 0.0));
    }

    #[test]
    fn press_on_an_existing_object_does_not_start_a_path() {
        let mut session = pen_session();
        let ids: Vec<_> = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]
            .into_iter()
            .map(|(x, y)| session.store.create_vertex(Point::new(x, y)))
            .collect();
        session.store.create_path(ids, true).unwrap();

        // Edge midpoint, then a point inside the closed surface
        click(&mut session, Point::new(50.0, 0.0));
        click(&mut session, Point::new(70.0, 30.0));
        assert_eq!(session.store.path_count(), 1);
        assert_eq!(session.store.vertex_count(), 3);
        assert!(session.current_tool.as_pen().unwrap().active().is_none());

        click(&mut session, Point::new(300.0, 300.0));
        assert_eq!(session.store.path_count(), 2);
    }

    #[test]
    fn alt_on_point_glyph_edits_out_handle() {
        let mut session = pen_session();
        click(&mut session, Point::new(0.0, 0.0));
        let mut enter = FrameInput::at(Point::ORIGIN);
        enter.enter = true;
        session.update(&enter);
        // A lone vertex is discarded on finish; build a fresh two-vertex path
        click(&mut session, Point::new(0.0, 0.0));
        click(&mut session, Point::new(100.0, 0.0));
        session.update(&enter);

        let alt = Modifiers::alt();
        session.update(&FrameInput::at(Point::new(100.0, 0.0)).with_mods(alt).pressed());
        session.update(&FrameInput::at(Point::new(130.0, 20.0)).with_mods(alt).held());
        session.update(&FrameInput::at(Point::new(130.0, 20.0)).with_mods(alt).released());

        let v = session
            .store
            .vertices()
            .find(|v| v.pos == Point::new(100.0, 0.0))
            .unwrap();
        assert_eq!(v.bezier.out_handle(), kurbo::Vec2::new(30.0, 20.0));
        assert_eq!(v.bezier.in_handle(), kurbo::Vec2::ZERO);
    }
}
