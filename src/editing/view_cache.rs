// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Revision-stamped caching of derived selection geometry.
//!
//! The selection bounding box and its eight scale handles are needed every
//! frame (for drawing and for press classification) but only change when
//! the selection, the geometry, the camera or the style changes. Each of
//! those owners keeps a monotonically increasing counter; the cache holds
//! the last computed value together with the counters it was computed for
//! and recomputes only when any of them differs.

use crate::model::{HandleSide, ObjectStore};
use kurbo::{Point, Rect, Vec2};

use super::selection::Selection;

/// The four counters derived selection geometry depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Revisions {
    pub selection: u64,
    pub geometry: u64,
    pub camera: u64,
    pub style: u64,
}

/// Memoizes one value keyed by a revision stamp
#[derive(Debug, Clone)]
pub struct RevisionCache<K, T> {
    entry: Option<(K, T)>,
    hits: u64,
    misses: u64,
}

impl<K: PartialEq + Copy, T> RevisionCache<K, T> {
    pub fn new() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing it on a stamp mismatch
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> T) -> &T {
        let entry = match self.entry.take() {
            Some((k, value)) if k == key => {
                self.hits += 1;
                (k, value)
            }
            _ => {
                self.misses += 1;
                (key, compute())
            }
        };
        &self.entry.insert(entry).1
    }

    /// Cached value if it was computed for exactly `key`
    pub fn peek(&self, key: K) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl<K: PartialEq + Copy, T> Default for RevisionCache<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Bounding box handles =====

/// Resize cursor a host should show over a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    /// Diagonal, top-left to bottom-right
    ResizeNwSe,
    /// Diagonal, top-right to bottom-left
    ResizeNeSw,
    ResizeNs,
    ResizeEw,
}

/// One of the eight scale handles of the selection box.
///
/// Discriminants run clockwise from the top-left corner; corners are even.
/// World space is y-down, so "north" is the box's minimum y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxHandle {
    NorthWest = 0,
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
}

impl BoxHandle {
    pub const ALL: [BoxHandle; 8] = [
        BoxHandle::NorthWest,
        BoxHandle::North,
        BoxHandle::NorthEast,
        BoxHandle::East,
        BoxHandle::SouthEast,
        BoxHandle::South,
        BoxHandle::SouthWest,
        BoxHandle::West,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_corner(self) -> bool {
        self.index() % 2 == 0
    }

    /// North or south: scales y only
    pub fn is_vertical_side(self) -> bool {
        matches!(self, BoxHandle::North | BoxHandle::South)
    }

    /// East or west: scales x only
    pub fn is_horizontal_side(self) -> bool {
        matches!(self, BoxHandle::East | BoxHandle::West)
    }

    pub fn cursor(self) -> CursorShape {
        match self {
            BoxHandle::NorthWest | BoxHandle::SouthEast => CursorShape::ResizeNwSe,
            BoxHandle::NorthEast | BoxHandle::SouthWest => CursorShape::ResizeNeSw,
            BoxHandle::North | BoxHandle::South => CursorShape::ResizeNs,
            BoxHandle::East | BoxHandle::West => CursorShape::ResizeEw,
        }
    }

    /// Handle on the other side of the box
    pub fn opposite(self) -> BoxHandle {
        BoxHandle::ALL[(self.index() + 4) % 8]
    }

    /// Which way each axis grows as the handle moves outwards
    pub fn sign(self) -> Vec2 {
        let x = match self {
            BoxHandle::NorthWest | BoxHandle::West | BoxHandle::SouthWest => -1.0,
            BoxHandle::NorthEast | BoxHandle::East | BoxHandle::SouthEast => 1.0,
            BoxHandle::North | BoxHandle::South => 0.0,
        };
        let y = match self {
            BoxHandle::NorthWest | BoxHandle::North | BoxHandle::NorthEast => -1.0,
            BoxHandle::SouthWest | BoxHandle::South | BoxHandle::SouthEast => 1.0,
            BoxHandle::East | BoxHandle::West => 0.0,
        };
        Vec2::new(x, y)
    }

    /// World position of this handle on `bbox`
    pub fn anchor(self, bbox: Rect) -> Point {
        let center = bbox.center();
        let s = self.sign();
        let pick = |sign: f64, lo: f64, mid: f64, hi: f64| {
            if sign < 0.0 {
                lo
            } else if sign > 0.0 {
                hi
            } else {
                mid
            }
        };
        Point::new(
            pick(s.x, bbox.x0, center.x, bbox.x1),
            pick(s.y, bbox.y0, center.y, bbox.y1),
        )
    }

    /// Fixed point while dragging this handle: the opposite anchor
    pub fn pivot(self, bbox: Rect) -> Point {
        self.opposite().anchor(bbox)
    }
}

// ===== Selection view =====

/// Derived geometry of the current selection, in world space
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionView {
    /// Control hull of the selected vertices (anchors plus handle tips)
    pub hull: Rect,
    /// The hull padded by the configured pixel margin
    pub bbox: Rect,
    /// Scale handle positions, indexed by [`BoxHandle::index`]
    pub handles: [Point; 8],
    /// Pick half extent of a scale handle, in world units
    pub handle_half: f64,
}

impl SelectionView {
    /// Compute the view, or `None` if no selected vertex resolves
    pub fn compute(
        store: &ObjectStore,
        selection: &Selection,
        zoom: f64,
        margin_px: f64,
        handle_half_px: f64,
    ) -> Option<Self> {
        let hull = control_hull(store, selection)?;
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        let bbox = hull.inflate(margin_px / zoom, margin_px / zoom);
        let handles = BoxHandle::ALL.map(|h| h.anchor(bbox));
        Some(Self {
            hull,
            bbox,
            handles,
            handle_half: handle_half_px / zoom,
        })
    }

    pub fn handle_pos(&self, handle: BoxHandle) -> Point {
        self.handles[handle.index()]
    }

    /// Scale handle under `p`, if any
    pub fn handle_at(&self, p: Point) -> Option<BoxHandle> {
        BoxHandle::ALL.into_iter().find(|&h| {
            let d = p - self.handle_pos(h);
            d.x.abs() <= self.handle_half && d.y.abs() <= self.handle_half
        })
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bbox.contains(p)
    }
}

/// Bounds of selected anchors and their non-zero handle tips
pub fn control_hull(store: &ObjectStore, selection: &Selection) -> Option<Rect> {
    selection
        .vertices()
        .iter()
        .filter_map(|&id| store.vertex(id))
        .flat_map(|v| {
            [
                Some(v.pos),
                v.handle_tip(HandleSide::In),
                v.handle_tip(HandleSide::Out),
            ]
        })
        .flatten()
        .fold(None, |acc: Option<Rect>, p| {
            Some(acc.map_or(Rect::from_points(p, p), |r| r.union_pt(p)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_hits_until_any_counter_changes() {
        let mut cache: RevisionCache<Revisions, u32> = RevisionCache::new();
        let mut computed = 0;
        let mut rev = Revisions::default();

        for _ in 0..3 {
            cache.get_or_compute(rev, || {
                computed += 1;
                computed
            });
        }
        assert_eq!(computed, 1);
        assert_eq!(cache.hits(), 2);

        for bump in 0..4 {
            match bump {
                0 => rev.selection += 1,
                1 => rev.geometry += 1,
                2 => rev.camera += 1,
                _ => rev.style += 1,
            }
            let value = *cache.get_or_compute(rev, || {
                computed += 1;
                computed
            });
            assert_eq!(value, computed);
        }
        assert_eq!(computed, 5);
        assert_eq!(cache.misses(), 5);
    }

    #[test]
    fn peek_only_matches_current_stamp() {
        let mut cache: RevisionCache<u64, &str> = RevisionCache::new();
        cache.get_or_compute(1, || "one");
        assert_eq!(cache.peek(1), Some(&"one"));
        assert_eq!(cache.peek(2), None);
        cache.invalidate();
        assert_eq!(cache.peek(1), None);
    }

    #[test]
    fn handles_have_opposite_pivots() {
        let bbox = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(BoxHandle::NorthWest.anchor(bbox), Point::new(0.0, 0.0));
        assert_eq!(BoxHandle::NorthWest.pivot(bbox), Point::new(100.0, 50.0));
        assert_eq!(BoxHandle::East.anchor(bbox), Point::new(100.0, 25.0));
        assert_eq!(BoxHandle::East.pivot(bbox), Point::new(0.0, 25.0));
        assert_eq!(BoxHandle::South.pivot(bbox), Point::new(50.0, 0.0));
        for h in BoxHandle::ALL {
            assert_eq!(h.opposite().opposite(), h);
            assert_eq!(h.sign(), -h.opposite().sign());
        }
    }

    #[test]
    fn cursor_shapes_follow_axes() {
        assert_eq!(BoxHandle::NorthWest.cursor(), CursorShape::ResizeNwSe);
        assert_eq!(BoxHandle::SouthWest.cursor(), CursorShape::ResizeNeSw);
        assert_eq!(BoxHandle::North.cursor(), CursorShape::ResizeNs);
        assert_eq!(BoxHandle::West.cursor(), CursorShape::ResizeEw);
        assert!(BoxHandle::SouthEast.is_corner());
        assert!(!BoxHandle::South.is_corner());
    }

    #[test]
    fn hull_includes_handle_tips_and_margin_scales_with_zoom() {
        let mut store = ObjectStore::new();
        let a = store.create_vertex(Point::new(0.0, 0.0));
        let b = store.create_vertex(Point::new(100.0, 0.0));
        store
            .vertex_mut(a)
            .unwrap()
            .set_out_handle(Vec2::new(20.0, -40.0));
        let mut sel = Selection::new();
        sel.vertices_mut().insert(a);
        sel.vertices_mut().insert(b);

        let view = SelectionView::compute(&store, &sel, 2.0, 8.0, 5.0).unwrap();
        assert_eq!(view.hull, Rect::new(0.0, -40.0, 100.0, 0.0));
        assert_eq!(view.bbox, Rect::new(-4.0, -44.0, 104.0, 4.0));
        assert_eq!(view.handle_at(Point::new(105.0, 5.0)), Some(BoxHandle::SouthEast));
        assert_eq!(view.handle_at(Point::new(50.0, -20.0)), None);
        assert!(view.contains(Point::new(50.0, -20.0)));
    }

    #[test]
    fn empty_selection_has_no_view() {
        let store = ObjectStore::new();
        assert!(SelectionView::compute(&store, &Selection::new(), 1.0, 8.0, 5.0).is_none());
    }
}
