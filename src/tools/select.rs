// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection tool: click and lasso selection, moving, bounding-box scaling
//! and direct Bezier handle editing.
//!
//! A press decides what the gesture will be once the pointer starts to
//! move; the drag itself then runs in exactly one [`TransformState`].
//! Every state that mutates geometry snapshots what it touches so Escape
//! can put it back.

use crate::editing::hit_test::{Hit, HitTarget};
use crate::editing::view_cache::BoxHandle;
use crate::editing::{Drag, EditSession, Modifiers, MouseDelegate, MouseEvent, SelectionMask};
use crate::geometry::{safe_div, segment_intersects_rect, snap_to_grid};
use crate::model::{BezierControl, HandleSide, VertexId};
use crate::tools::{Tool, ToolId};
use kurbo::{Point, Rect, Vec2};
use std::collections::BTreeSet;

// ===== Gesture State =====

/// Original geometry of one vertex, captured when a drag starts
#[derive(Debug, Clone, PartialEq)]
pub struct VertexSnapshot {
    pub id: VertexId,
    pub pos: Point,
    pub bezier: BezierControl,
}

/// The one drag in progress, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TransformState {
    #[default]
    Idle,
    /// Rubber-band selection over empty canvas
    Lasso {
        start: Point,
        current: Point,
        additive: bool,
    },
    /// Translating every selected vertex
    Moving {
        originals: Vec<VertexSnapshot>,
        /// Top-left of the selection at the start; snapping aligns this
        anchor: Point,
    },
    /// Scaling the selection from one of the eight box handles
    Scaling {
        handle: BoxHandle,
        bbox: Rect,
        originals: Vec<VertexSnapshot>,
    },
    /// Pulling a single Bezier handle of a selected vertex
    DraggingHandle {
        vertex: VertexId,
        side: HandleSide,
        original: BezierControl,
    },
}

/// What the press landed on; turned into a [`TransformState`] on drag
#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Scale { handle: BoxHandle, bbox: Rect },
    Handle { vertex: VertexId, side: HandleSide },
    /// Move the selection; a click without drag toggles `toggle` off
    Move { toggle: Option<Hit> },
    Lasso { additive: bool },
}

// ===== SelectTool Struct =====

/// The select tool, driving the transform state machine
#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    state: TransformState,
    press: Option<Press>,
}

// ===== Tool Implementation =====

impl Tool for SelectTool {
    fn id(&self) -> ToolId {
        ToolId::Select
    }

    fn is_busy(&self) -> bool {
        self.state != TransformState::Idle
    }
}

// ===== MouseDelegate Implementation =====

impl MouseDelegate for SelectTool {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, data: &mut EditSession) {
        self.state = TransformState::Idle;
        self.press = Some(Self::classify_press(event, data));
        tracing::debug!("Select: press {:?}", self.press);
    }

    fn left_click(&mut self, _event: MouseEvent, data: &mut EditSession) {
        match self.press.take() {
            Some(Press::Move { toggle: Some(hit) }) => {
                data.selection.toggle_hit(&hit, &data.store);
            }
            Some(Press::Lasso { additive: false }) => {
                if !data.selection_mask.is_locked() {
                    data.selection.clear();
                }
            }
            _ => {}
        }
    }

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        let Some(press) = self.press.take() else {
            return;
        };
        self.state = match press {
            Press::Scale { handle, bbox } => TransformState::Scaling {
                handle,
                bbox,
                originals: snapshot_selection(data),
            },
            Press::Handle { vertex, side } => match data.store.vertex(vertex) {
                Some(v) => TransformState::DraggingHandle {
                    vertex,
                    side,
                    original: v.bezier.clone(),
                },
                None => TransformState::Idle,
            },
            Press::Move { .. } => {
                let anchor = data
                    .selection_view()
                    .map(|view| view.hull.origin())
                    .unwrap_or(drag.start);
                TransformState::Moving {
                    originals: snapshot_selection(data),
                    anchor,
                }
            }
            Press::Lasso { additive } => {
                if !additive && !data.selection_mask.is_locked() {
                    data.selection.clear();
                }
                TransformState::Lasso {
                    start: drag.start,
                    current: drag.current,
                    additive,
                }
            }
        };
        tracing::debug!("Select: drag began in {}", self.state_name());
        self.apply_drag(event, drag, data);
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        self.apply_drag(event, drag, data);
    }

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        self.apply_drag(event, drag, data);
        if let TransformState::Lasso {
            start,
            current,
            additive,
        } = self.state
        {
            let picked = lasso_select(data, Rect::from_points(start, current), additive);
            tracing::debug!("Select: lasso picked {} objects", picked);
        }
        tracing::debug!("Select: drag ended in {}", self.state_name());
        self.state = TransformState::Idle;
    }

    fn cancel(&mut self, data: &mut EditSession) {
        match std::mem::take(&mut self.state) {
            TransformState::Moving { originals, .. }
            | TransformState::Scaling { originals, .. } => restore(data, &originals),
            TransformState::DraggingHandle {
                vertex, original, ..
            } => {
                if let Some(v) = data.store.vertex_mut(vertex) {
                    v.bezier = original;
                }
            }
            TransformState::Lasso { .. } | TransformState::Idle => {}
        }
        self.press = None;
        tracing::debug!("Select: cancelled");
    }
}

// ===== Helper Methods =====

impl SelectTool {
    pub fn state(&self) -> &TransformState {
        &self.state
    }

    /// Normalized lasso rectangle while lassoing, for drawing
    pub fn lasso_rect(&self) -> Option<Rect> {
        match self.state {
            TransformState::Lasso { start, current, .. } => {
                Some(Rect::from_points(start, current))
            }
            _ => None,
        }
    }

    /// The box handle being dragged, for cursor feedback
    pub fn active_handle(&self) -> Option<BoxHandle> {
        match self.state {
            TransformState::Scaling { handle, .. } => Some(handle),
            _ => None,
        }
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            TransformState::Idle => "Idle",
            TransformState::Lasso { .. } => "Lasso",
            TransformState::Moving { .. } => "Moving",
            TransformState::Scaling { .. } => "Scaling",
            TransformState::DraggingHandle { .. } => "DraggingHandle",
        }
    }

    fn classify_press(event: MouseEvent, data: &mut EditSession) -> Press {
        let view = data.selection_view();
        if let Some(handle) = view.as_ref().and_then(|v| v.handle_at(event.pos)) {
            if let Some(view) = &view {
                return Press::Scale {
                    handle,
                    bbox: view.bbox,
                };
            }
        }

        let hit = data.hit_at(event.pos);
        if let Some(hit) = hit {
            if let (Some(vertex), Some(side)) = (hit.vertex(), hit.handle_side()) {
                return Press::Handle { vertex, side };
            }
        }

        let mask = data.selection_mask;
        if let Some(hit) = hit.filter(|h| mask.allows(mask_bit(h.target))) {
            let additive = event.mods.is_additive();
            let was_selected = data.selection.contains_hit(&hit);
            if !was_selected {
                if !additive {
                    data.selection.clear();
                }
                data.selection.add_hit(&hit, &data.store);
            }
            return Press::Move {
                toggle: (additive && was_selected).then_some(hit),
            };
        }

        if view.is_some_and(|v| v.contains(event.pos)) {
            Press::Move { toggle: None }
        } else {
            Press::Lasso {
                additive: event.mods.is_additive(),
            }
        }
    }

    fn apply_drag(&mut self, event: MouseEvent, drag: Drag, data: &mut EditSession) {
        let snap = data.want_snap(event.mods);
        let step = data.config().snap_step;
        match &mut self.state {
            TransformState::Idle => {}
            TransformState::Lasso { current, .. } => *current = drag.current,
            TransformState::Moving { originals, anchor } => {
                let mut delta = drag.delta();
                if snap {
                    delta = snap_to_grid(*anchor + delta, step) - *anchor;
                }
                for orig in originals.iter() {
                    if let Some(v) = data.store.vertex_mut(orig.id) {
                        v.pos = orig.pos + delta;
                    }
                }
            }
            TransformState::Scaling {
                handle,
                bbox,
                originals,
            } => {
                let cursor = if snap {
                    snap_to_grid(event.pos, step)
                } else {
                    event.pos
                };
                let (pivot, scale) = scale_about(*handle, *bbox, cursor, event.mods);
                for orig in originals.iter() {
                    if let Some(v) = data.store.vertex_mut(orig.id) {
                        v.pos = pivot + mul(scale, orig.pos - pivot);
                        let mut bezier = orig.bezier.clone();
                        bezier.set_handles(
                            mul(scale, orig.bezier.in_handle()),
                            mul(scale, orig.bezier.out_handle()),
                        );
                        v.bezier = bezier;
                    }
                }
            }
            TransformState::DraggingHandle {
                vertex,
                side,
                original,
            } => {
                let tip = if snap {
                    snap_to_grid(event.pos, step)
                } else {
                    event.pos
                };
                if let Some(v) = data.store.vertex_mut(*vertex) {
                    let mut bezier = original.clone();
                    bezier.set_handle(*side, tip - v.pos);
                    v.bezier = bezier;
                }
            }
        }
    }
}

/// Pivot and per-axis scale for dragging `handle` of `bbox` to `cursor`.
///
/// The pivot is the opposite anchor, or the box centre with Alt. Side
/// handles scale one axis only; Shift on a corner scales uniformly by the
/// larger factor. Degenerate extents scale by 1.
pub fn scale_about(handle: BoxHandle, bbox: Rect, cursor: Point, mods: Modifiers) -> (Point, Vec2) {
    let pivot = if mods.alt {
        bbox.center()
    } else {
        handle.pivot(bbox)
    };
    let start = handle.anchor(bbox);

    let mut sx = if handle.is_corner() || handle.is_horizontal_side() {
        safe_div(cursor.x - pivot.x, start.x - pivot.x)
    } else {
        1.0
    };
    let mut sy = if handle.is_corner() || handle.is_vertical_side() {
        safe_div(cursor.y - pivot.y, start.y - pivot.y)
    } else {
        1.0
    };

    if mods.shift && handle.is_corner() {
        let s = sx.abs().max(sy.abs());
        sx = s.copysign(sx);
        sy = s.copysign(sy);
    }
    (pivot, Vec2::new(sx, sy))
}

fn mul(scale: Vec2, v: Vec2) -> Vec2 {
    Vec2::new(scale.x * v.x, scale.y * v.y)
}

fn snapshot_selection(data: &EditSession) -> Vec<VertexSnapshot> {
    data.selection
        .vertices()
        .iter()
        .filter_map(|&id| data.store.vertex(id))
        .map(|v| VertexSnapshot {
            id: v.id,
            pos: v.pos,
            bezier: v.bezier.clone(),
        })
        .collect()
}

fn restore(data: &mut EditSession, originals: &[VertexSnapshot]) {
    for orig in originals {
        if let Some(v) = data.store.vertex_mut(orig.id) {
            v.pos = orig.pos;
            v.bezier = orig.bezier.clone();
        }
    }
}

fn mask_bit(target: HitTarget) -> u8 {
    match target {
        HitTarget::Vertex(_) => SelectionMask::VERTEX,
        HitTarget::Point(_) => SelectionMask::POINT,
        HitTarget::Line(_) => SelectionMask::LINE,
        HitTarget::Path(_) => SelectionMask::PATH,
    }
}

/// Select everything the rectangle touches; returns how many objects matched.
///
/// Without `additive` the objects are added; with it their membership is
/// toggled. Locked or hidden objects are skipped. Path edges are flattened
/// the same way the edge hit test does, so a curve bowing into the rect
/// counts. Vertices of matched objects follow their object; any other
/// selectable vertex inside the rect is picked on its own.
pub fn lasso_select(data: &mut EditSession, rect: Rect, additive: bool) -> usize {
    let mask = data.selection_mask;
    if mask.is_locked() {
        return 0;
    }
    let steps = data.hit_params().bezier_steps;
    let store = &data.store;
    let selection = &mut data.selection;
    let inside = |p: Point| {
        p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
    };
    let mut picked = 0;
    // Vertices owned by an object the rect matched this time
    let mut covered: BTreeSet<VertexId> = BTreeSet::new();
    let before: Vec<VertexId> = selection.vertices().iter().copied().collect();

    if mask.allows(SelectionMask::POINT) {
        let hits: Vec<_> = store
            .points()
            .filter(|pt| pt.sty.visible && store.is_vertex_selectable(pt.v))
            .filter(|pt| store.vertex(pt.v).is_some_and(|v| inside(v.pos)))
            .map(|pt| (pt.id, pt.v))
            .collect();
        picked += hits.len();
        let set = selection.points_mut();
        for (id, v) in hits {
            covered.insert(v);
            if additive {
                set.toggle(id);
            } else {
                set.insert(id);
            }
        }
    }

    if mask.allows(SelectionMask::LINE) {
        let hits: Vec<_> = store
            .lines()
            .filter(|line| line.is_selectable())
            .filter(|line| match (store.vertex(line.a), store.vertex(line.b)) {
                (Some(a), Some(b)) => segment_intersects_rect(a.pos, b.pos, rect),
                _ => false,
            })
            .map(|line| (line.id, [line.a, line.b]))
            .collect();
        picked += hits.len();
        let set = selection.lines_mut();
        for (id, ends) in hits {
            covered.extend(ends);
            if additive {
                set.toggle(id);
            } else {
                set.insert(id);
            }
        }
    }

    if mask.allows(SelectionMask::PATH) {
        let hits: Vec<_> = store
            .paths()
            .filter(|path| path.is_selectable() && path.is_drawable())
            .filter(|path| {
                store.path_segments(path).iter().any(|seg| {
                    seg.flatten(steps)
                        .windows(2)
                        .any(|w| segment_intersects_rect(w[0], w[1], rect))
                })
            })
            .map(|path| path.id)
            .collect();
        picked += hits.len();
        for id in hits {
            if let Some(path) = store.path(id) {
                covered.extend(path.verts().iter().copied());
            }
            let set = selection.paths_mut();
            if additive {
                set.toggle(id);
            } else {
                set.insert(id);
            }
        }
    }

    selection.rebuild_vertices(store);
    // Vertices picked on their own earlier survive the rebuild
    {
        let set = selection.vertices_mut();
        for id in before.into_iter().filter(|v| !covered.contains(v)) {
            set.insert(id);
        }
    }

    if mask.allows(SelectionMask::VERTEX) {
        let hits: Vec<_> = store
            .vertices()
            .filter(|v| inside(v.pos) && store.is_vertex_selectable(v.id))
            .map(|v| v.id)
            .filter(|id| !covered.contains(id))
            .collect();
        let set = selection.vertices_mut();
        for id in hits {
            if additive {
                set.toggle(id);
                picked += 1;
            } else if set.insert(id) {
                picked += 1;
            }
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::FrameInput;
    use approx::assert_abs_diff_eq;

    fn session_with_square() -> (EditSession, Vec<VertexId>) {
        let mut session = EditSession::new();
        let ids: Vec<_> = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]
            .into_iter()
            .map(|(x, y)| session.store.create_vertex(Point::new(x, y)))
            .collect();
        session.store.create_path(ids.clone(), true).unwrap();
        (session, ids)
    }

    fn drag(session: &mut EditSession, from: Point, to: Point, mods: Modifiers) {
        session.update(&FrameInput::at(from).with_mods(mods).pressed());
        session.update(&FrameInput::at(to).with_mods(mods).held());
        session.update(&FrameInput::at(to).with_mods(mods).released());
    }

    fn pos(session: &EditSession, id: VertexId) -> Point {
        session.store.vertex(id).unwrap().pos
    }

    #[test]
    fn clicking_an_edge_selects_the_path() {
        let (mut session, ids) = session_with_square();
        session.update(&FrameInput::at(Point::new(50.0, 1.0)).pressed());
        session.update(&FrameInput::at(Point::new(50.0, 1.0)).released());
        assert_eq!(session.selection.paths().len(), 1);
        assert_eq!(session.selection.vertices().len(), ids.len());
    }

    #[test]
    fn clicking_empty_canvas_clears() {
        let (mut session, _) = session_with_square();
        session.update(&FrameInput::at(Point::new(50.0, 1.0)).pressed());
        session.update(&FrameInput::at(Point::new(50.0, 1.0)).released());
        session.update(&FrameInput::at(Point::new(500.0, 500.0)).pressed());
        session.update(&FrameInput::at(Point::new(500.0, 500.0)).released());
        assert!(session.selection.is_empty());
    }

    #[test]
    fn dragging_an_object_moves_it() {
        let (mut session, ids) = session_with_square();
        drag(
            &mut session,
            Point::new(50.0, 1.0),
            Point::new(60.0, 21.0),
            Modifiers::NONE,
        );
        assert_eq!(pos(&session, ids[0]), Point::new(10.0, 20.0));
        assert_eq!(pos(&session, ids[2]), Point::new(110.0, 120.0));
    }

    #[test]
    fn shift_move_snaps_top_left_to_grid() {
        let (mut session, ids) = session_with_square();
        drag(
            &mut session,
            Point::new(50.0, 1.0),
            Point::new(53.0, 6.0),
            Modifiers::shift(),
        );
        // Raw delta (3, 5) puts the corner at (3, 5), which snaps to (0, 8)
        assert_eq!(pos(&session, ids[0]), Point::new(0.0, 8.0));
    }

    #[test]
    fn lasso_selects_touched_paths_only() {
        let (mut session, _) = session_with_square();
        let a = session.store.create_vertex(Point::new(300.0, 300.0));
        let b = session.store.create_vertex(Point::new(400.0, 300.0));
        session.store.create_path(vec![a, b], false).unwrap();

        drag(
            &mut session,
            Point::new(-20.0, 40.0),
            Point::new(20.0, 60.0),
            Modifiers::NONE,
        );
        assert_eq!(session.selection.paths().len(), 1);
        assert!(!session.selection.vertices().contains(&a));
    }

    #[test]
    fn additive_lasso_toggles_membership() {
        let (mut session, _) = session_with_square();
        let rect = Rect::new(-10.0, -10.0, 10.0, 10.0);
        lasso_select(&mut session, rect, true);
        assert_eq!(session.selection.paths().len(), 1);
        lasso_select(&mut session, rect, true);
        assert!(session.selection.paths().is_empty());
        assert!(session.selection.vertices().is_empty());
    }

    #[test]
    fn lasso_skips_locked_paths() {
        let (mut session, _) = session_with_square();
        for id in session.store.paths().map(|p| p.id).collect::<Vec<_>>() {
            session.store.path_mut(id).unwrap().locked = true;
        }
        lasso_select(&mut session, Rect::new(-10.0, -10.0, 10.0, 10.0), false);
        assert!(session.selection.is_empty());
    }

    #[test]
    fn lasso_follows_curved_edges() {
        let (mut session, ids) = session_with_square();
        // Bow the top edge up so it peaks near y = -75 while the chord stays at y = 0
        session
            .store
            .vertex_mut(ids[0])
            .unwrap()
            .set_out_handle(Vec2::new(0.0, -100.0));
        session
            .store
            .vertex_mut(ids[1])
            .unwrap()
            .set_in_handle(Vec2::new(0.0, -100.0));

        let picked = lasso_select(&mut session, Rect::new(40.0, -80.0, 60.0, -60.0), false);
        assert_eq!(picked, 1);
        assert_eq!(session.selection.paths().len(), 1);
        assert_eq!(session.selection.vertices().len(), 4);
    }

    #[test]
    fn vertex_only_mask_picks_path_vertices() {
        let (mut session, ids) = session_with_square();
        session.selection_mask = SelectionMask::from_bits(SelectionMask::VERTEX);

        let picked = lasso_select(&mut session, Rect::new(-10.0, -10.0, 10.0, 10.0), false);
        assert_eq!(picked, 1);
        assert!(session.selection.paths().is_empty());
        assert_eq!(session.selection.vertices().len(), 1);
        assert!(session.selection.vertices().contains(&ids[0]));

        // A second rect adds to the first pick
        lasso_select(&mut session, Rect::new(90.0, 90.0, 110.0, 110.0), false);
        assert_eq!(session.selection.vertices().len(), 2);
        assert!(session.selection.vertices().contains(&ids[2]));

        // Additive toggles the lone vertex back off
        lasso_select(&mut session, Rect::new(-10.0, -10.0, 10.0, 10.0), true);
        assert_eq!(session.selection.vertices().len(), 1);
        assert!(!session.selection.vertices().contains(&ids[0]));
    }

    #[test]
    fn vertex_only_mask_skips_locked_paths() {
        let (mut session, ids) = session_with_square();
        session.selection_mask = SelectionMask::from_bits(SelectionMask::VERTEX);
        let path = session.store.paths().map(|p| p.id).next().unwrap();
        session.store.path_mut(path).unwrap().locked = true;
        lasso_select(&mut session, Rect::new(-10.0, -10.0, 10.0, 10.0), false);
        assert!(!session.selection.vertices().contains(&ids[0]));
        assert!(session.selection.is_empty());
    }

    #[test]
    fn corner_handle_scales_about_opposite_corner() {
        let (mut session, ids) = session_with_square();
        lasso_select(&mut session, Rect::new(-10.0, -10.0, 10.0, 10.0), false);
        let view = session.selection_view().unwrap();
        let se = view.handle_pos(BoxHandle::SouthEast);
        let nw = view.handle_pos(BoxHandle::NorthWest);
        // Drag SE out so the padded box doubles in size
        let target = nw + (se - nw) * 2.0;
        drag(&mut session, se, target, Modifiers::NONE);

        let margin = session.config().bbox_margin_px;
        assert_abs_diff_eq!(pos(&session, ids[0]).x, 0.0 + margin, epsilon = 1e-6);
        assert_abs_diff_eq!(
            pos(&session, ids[2]).x,
            100.0 * 2.0 + margin,
            epsilon = 1e-6
        );
        assert!(!session.current_tool.is_busy());
    }

    #[test]
    fn side_handle_locks_other_axis() {
        let bbox = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (pivot, scale) = scale_about(
            BoxHandle::East,
            bbox,
            Point::new(200.0, 999.0),
            Modifiers::NONE,
        );
        assert_eq!(pivot, Point::new(0.0, 25.0));
        assert_eq!(scale, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn shift_corner_is_uniform_and_alt_uses_centre() {
        let bbox = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (_, scale) = scale_about(
            BoxHandle::SouthEast,
            bbox,
            Point::new(300.0, 150.0),
            Modifiers::shift(),
        );
        assert_eq!(scale, Vec2::new(3.0, 3.0));

        let (pivot, scale) = scale_about(
            BoxHandle::SouthEast,
            bbox,
            Point::new(150.0, 150.0),
            Modifiers::alt(),
        );
        assert_eq!(pivot, Point::new(50.0, 50.0));
        assert_eq!(scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn degenerate_box_scales_by_one() {
        let bbox = Rect::new(10.0, 0.0, 10.0, 50.0);
        let (_, scale) = scale_about(
            BoxHandle::East,
            bbox,
            Point::new(40.0, 0.0),
            Modifiers::NONE,
        );
        assert_eq!(scale.x, 1.0);
    }

    #[test]
    fn escape_restores_positions() {
        let (mut session, ids) = session_with_square();
        session.update(&FrameInput::at(Point::new(50.0, 1.0)).pressed());
        session.update(&FrameInput::at(Point::new(80.0, 31.0)).held());
        assert_eq!(pos(&session, ids[0]), Point::new(30.0, 30.0));

        let mut esc = FrameInput::at(Point::new(80.0, 31.0)).held();
        esc.escape = true;
        session.update(&esc);
        assert_eq!(pos(&session, ids[0]), Point::ORIGIN);
        assert!(!session.current_tool.is_busy());
    }

    #[test]
    fn dragging_a_handle_edits_the_curve() {
        let (mut session, ids) = session_with_square();
        session
            .store
            .vertex_mut(ids[0])
            .unwrap()
            .set_out_handle(Vec2::new(30.0, -30.0));
        session.selection.vertices_mut().insert(ids[0]);

        drag(
            &mut session,
            Point::new(30.0, -30.0),
            Point::new(40.0, -20.0),
            Modifiers::NONE,
        );
        let v = session.store.vertex(ids[0]).unwrap();
        assert_eq!(v.bezier.out_handle(), Vec2::new(40.0, -20.0));
        assert_eq!(v.pos, Point::ORIGIN);
    }

    #[test]
    fn locked_mask_freezes_selection() {
        let (mut session, _) = session_with_square();
        session.selection_mask.set_locked(true);
        session.update(&FrameInput::at(Point::new(50.0, 1.0)).pressed());
        session.update(&FrameInput::at(Point::new(50.0, 1.0)).released());
        assert!(session.selection.is_empty());
    }
}
