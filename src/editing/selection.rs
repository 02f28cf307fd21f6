// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection state: which vertices, points, lines and paths are selected.
//!
//! Each kind lives in an [`IdSet`], an `Arc<BTreeSet<_>>` that is cheap to
//! clone (for clipboard and gesture snapshots) and copy-on-write on
//! mutation. The `BTreeSet` gives deterministic iteration order, which
//! matters for multi-vertex operations like nudging.
//!
//! Selected ids are weak references. Nothing here keeps an object alive;
//! ids that stop resolving are dropped by [`Selection::prune`].

use crate::editing::hit_test::{Hit, HitTarget};
use crate::model::{LineId, ObjectStore, PathId, PointId, VertexId, ZTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// An ordered, cheaply clonable set of ids of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSet<I: Ord> {
    inner: Arc<BTreeSet<I>>,
}

impl<I: Ord + Copy> IdSet<I> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BTreeSet::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, id: &I) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.inner.iter()
    }

    /// Returns whether the id was newly added
    pub fn insert(&mut self, id: I) -> bool {
        Arc::make_mut(&mut self.inner).insert(id)
    }

    /// Returns whether the id was present
    pub fn remove(&mut self, id: &I) -> bool {
        if !self.inner.contains(id) {
            return false;
        }
        Arc::make_mut(&mut self.inner).remove(id)
    }

    /// Flip membership; returns whether the id is now selected
    pub fn toggle(&mut self, id: I) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.insert(id)
        }
    }

    pub fn clear(&mut self) {
        if !self.inner.is_empty() {
            self.inner = Arc::new(BTreeSet::new());
        }
    }

    pub fn retain(&mut self, f: impl FnMut(&I) -> bool) {
        Arc::make_mut(&mut self.inner).retain(f);
    }
}

impl<I: Ord + Copy> Default for IdSet<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Ord + Copy> FromIterator<I> for IdSet<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            inner: Arc::new(iter.into_iter().collect()),
        }
    }
}

// ===== Selection Mask =====

/// Bit set of which entity kinds click and lasso selection may pick.
///
/// The `LOCK` bit freezes the selection. Besides the stored bits there is
/// a separate lock flag; while it is set, [`effective`](Self::effective)
/// reports `LOCK` no matter what the stored bits say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionMask {
    bits: u8,
    locked: bool,
}

impl SelectionMask {
    pub const VERTEX: u8 = 1 << 0;
    pub const POINT: u8 = 1 << 1;
    pub const LINE: u8 = 1 << 2;
    pub const PATH: u8 = 1 << 3;
    pub const LOCK: u8 = 1 << 4;
    pub const ALL_KINDS: u8 = Self::VERTEX | Self::POINT | Self::LINE | Self::PATH;

    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bits,
            locked: false,
        }
    }

    pub fn bits(self) -> u8 {
        self.bits
    }

    pub fn set(&mut self, bit: u8) {
        self.bits |= bit;
    }

    pub fn clear(&mut self, bit: u8) {
        self.bits &= !bit;
    }

    pub fn toggle(&mut self, bit: u8) {
        self.bits ^= bit;
    }

    /// Whether every bit of `bit` is set in the stored mask
    pub fn test(self, bit: u8) -> bool {
        self.bits & bit == bit
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(self) -> bool {
        self.locked
    }

    /// Stored bits, with `LOCK` forced on while the lock flag is set
    pub fn effective(self) -> u8 {
        if self.locked {
            self.bits | Self::LOCK
        } else {
            self.bits
        }
    }

    /// Whether the selection may change and `kind` may be picked
    pub fn allows(self, kind: u8) -> bool {
        let eff = self.effective();
        eff & Self::LOCK == 0 && eff & kind == kind
    }
}

impl Default for SelectionMask {
    fn default() -> Self {
        Self::from_bits(Self::ALL_KINDS)
    }
}

// ===== Selection =====

/// Current selection plus the hover result refreshed every frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    vertices: IdSet<VertexId>,
    points: IdSet<PointId>,
    lines: IdSet<LineId>,
    paths: IdSet<PathId>,

    /// Transient; recomputed each frame by hit classification
    hovered: Option<Hit>,

    /// Bumped whenever a set changes; feeds the view cache
    revision: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
            && self.points.is_empty()
            && self.lines.is_empty()
            && self.paths.is_empty()
    }

    /// Whether any whole object (point, line or path) is selected
    pub fn has_objects(&self) -> bool {
        !(self.points.is_empty() && self.lines.is_empty() && self.paths.is_empty())
    }

    pub fn vertices(&self) -> &IdSet<VertexId> {
        &self.vertices
    }

    pub fn points(&self) -> &IdSet<PointId> {
        &self.points
    }

    pub fn lines(&self) -> &IdSet<LineId> {
        &self.lines
    }

    pub fn paths(&self) -> &IdSet<PathId> {
        &self.paths
    }

    pub fn vertices_mut(&mut self) -> &mut IdSet<VertexId> {
        self.touch();
        &mut self.vertices
    }

    pub fn points_mut(&mut self) -> &mut IdSet<PointId> {
        self.touch();
        &mut self.points
    }

    pub fn lines_mut(&mut self) -> &mut IdSet<LineId> {
        self.touch();
        &mut self.lines
    }

    pub fn paths_mut(&mut self) -> &mut IdSet<PathId> {
        self.touch();
        &mut self.paths
    }

    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        self.vertices.clear();
        self.points.clear();
        self.lines.clear();
        self.paths.clear();
        self.touch();
    }

    /// Selected paths and lines as z-order targets
    pub fn z_targets(&self) -> BTreeSet<ZTarget> {
        self.paths
            .iter()
            .map(|&p| ZTarget::Path(p))
            .chain(self.lines.iter().map(|&l| ZTarget::Line(l)))
            .collect()
    }

    // ===== Hover =====

    pub fn hovered(&self) -> Option<Hit> {
        self.hovered
    }

    pub fn set_hovered(&mut self, hit: Option<Hit>) {
        self.hovered = hit;
    }

    /// Called when the pointer leaves the canvas or a modal UI opens
    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// Hovering an edge or surface (a whole object)
    pub fn contains_object_hover(&self) -> bool {
        self.hovered.is_some_and(|h| h.kind.is_object())
    }

    /// Hovering nothing, a handle or a vertex
    pub fn contains_non_object_hover(&self) -> bool {
        !self.contains_object_hover()
    }

    // ===== Hit-driven selection =====

    /// Whether the object a hit refers to is already selected
    pub fn contains_hit(&self, hit: &Hit) -> bool {
        match hit.target {
            HitTarget::Vertex(v) => self.vertices.contains(&v),
            HitTarget::Point(p) => self.points.contains(&p),
            HitTarget::Line(l) => self.lines.contains(&l),
            HitTarget::Path(p) => self.paths.contains(&p),
        }
    }

    /// Select the object under a hit together with the vertices it uses.
    ///
    /// Handle hits only ever edit a handle and never change the selection.
    pub fn add_hit(&mut self, hit: &Hit, store: &ObjectStore) {
        if hit.kind.is_handle() {
            return;
        }
        match hit.target {
            HitTarget::Vertex(v) => {
                self.vertices.insert(v);
            }
            HitTarget::Point(id) => {
                if let Some(pt) = store.point(id) {
                    self.points.insert(id);
                    self.vertices.insert(pt.v);
                }
            }
            HitTarget::Line(id) => {
                if let Some(line) = store.line(id) {
                    self.lines.insert(id);
                    self.vertices.insert(line.a);
                    self.vertices.insert(line.b);
                }
            }
            HitTarget::Path(id) => {
                if let Some(path) = store.path(id) {
                    self.paths.insert(id);
                    for &v in path.verts() {
                        self.vertices.insert(v);
                    }
                }
            }
        }
        self.touch();
    }

    /// Add or remove the hit object, then resync the vertex set
    pub fn toggle_hit(&mut self, hit: &Hit, store: &ObjectStore) {
        if hit.kind.is_handle() {
            return;
        }
        match hit.target {
            HitTarget::Vertex(v) => {
                self.vertices.toggle(v);
                self.touch();
                return;
            }
            HitTarget::Point(id) => {
                self.points.toggle(id);
            }
            HitTarget::Line(id) => {
                self.lines.toggle(id);
            }
            HitTarget::Path(id) => {
                self.paths.toggle(id);
            }
        }
        self.rebuild_vertices(store);
    }

    /// Recompute the vertex set from the selected points, lines and paths
    pub fn rebuild_vertices(&mut self, store: &ObjectStore) {
        let mut verts = BTreeSet::new();
        for &id in self.points.iter() {
            if let Some(pt) = store.point(id) {
                verts.insert(pt.v);
            }
        }
        for &id in self.lines.iter() {
            if let Some(line) = store.line(id) {
                verts.insert(line.a);
                verts.insert(line.b);
            }
        }
        for &id in self.paths.iter() {
            if let Some(path) = store.path(id) {
                verts.extend(path.verts().iter().copied());
            }
        }
        self.vertices = verts.into_iter().collect();
        self.touch();
    }

    /// Drop ids that no longer resolve; returns how many were dropped
    pub fn prune(&mut self, store: &ObjectStore) -> usize {
        let before = self.total();
        self.vertices.retain(|&v| store.vertex(v).is_some());
        self.points.retain(|&p| store.point(p).is_some());
        self.lines.retain(|&l| store.line(l).is_some());
        self.paths.retain(|&p| store.path(p).is_some());
        let dropped = before - self.total();
        if dropped > 0 {
            tracing::debug!("Pruned {} stale selection ids", dropped);
            self.touch();
        }
        dropped
    }

    fn total(&self) -> usize {
        self.vertices.len() + self.points.len() + self.lines.len() + self.paths.len()
    }

    // ===== Persistence =====

    pub fn to_record(&self) -> SelectionRecord {
        SelectionRecord {
            vertices: self.vertices.iter().copied().collect(),
            points: self.points.iter().copied().collect(),
            lines: self.lines.iter().copied().collect(),
            paths: self.paths.iter().copied().collect(),
        }
    }

    pub fn from_record(record: SelectionRecord) -> Self {
        Self {
            vertices: record.vertices.into_iter().collect(),
            points: record.points.into_iter().collect(),
            lines: record.lines.into_iter().collect(),
            paths: record.paths.into_iter().collect(),
            hovered: None,
            revision: 0,
        }
    }
}

/// Serialized form of a selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRecord {
    pub vertices: Vec<VertexId>,
    pub points: Vec<PointId>,
    pub lines: Vec<LineId>,
    pub paths: Vec<PathId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::hit_test::HitKind;
    use kurbo::Point;

    fn two_segment_store() -> (ObjectStore, PathId, Vec<VertexId>) {
        let mut store = ObjectStore::new();
        let verts: Vec<VertexId> = (0..3)
            .map(|i| store.create_vertex(Point::new(i as f64 * 10.0, 0.0)))
            .collect();
        let path = store.create_path(verts.clone(), false).unwrap();
        (store, path, verts)
    }

    fn edge_hit(path: PathId) -> Hit {
        Hit {
            kind: HitKind::Edge,
            target: HitTarget::Path(path),
            out: false,
        }
    }

    #[test]
    fn new_selection_is_empty() {
        let sel = Selection::new();
        assert!(sel.is_empty());
        assert!(!sel.has_objects());
    }

    #[test]
    fn id_set_insert_remove_toggle() {
        let mut set = IdSet::<VertexId>::new();
        assert!(set.insert(VertexId(1)));
        assert!(!set.insert(VertexId(1)));
        assert_eq!(set.len(), 1);
        assert!(!set.toggle(VertexId(1)));
        assert!(set.is_empty());
        assert!(set.toggle(VertexId(2)));
        assert!(!set.remove(&VertexId(9)));
    }

    #[test]
    fn clone_is_independent() {
        let mut a = IdSet::<PathId>::new();
        a.insert(PathId(1));
        let mut b = a.clone();
        b.insert(PathId(2));
        assert!(!a.contains(&PathId(2)));
        assert!(b.contains(&PathId(2)));
    }

    #[test]
    fn mask_behaves_as_boolean_algebra() {
        let mut mask = SelectionMask::from_bits(0);
        for bit in [
            SelectionMask::VERTEX,
            SelectionMask::POINT,
            SelectionMask::LINE,
            SelectionMask::PATH,
            SelectionMask::LOCK,
        ] {
            assert!(!mask.test(bit));
            mask.set(bit);
            assert!(mask.test(bit));
            mask.toggle(bit);
            assert!(!mask.test(bit));
            mask.toggle(bit);
            assert!(mask.test(bit));
            mask.clear(bit);
            assert!(!mask.test(bit));
        }
        assert_eq!(mask.bits(), 0);
    }

    #[test]
    fn lock_flag_forces_lock_bit() {
        let mut mask = SelectionMask::default();
        assert_eq!(mask.effective() & SelectionMask::LOCK, 0);
        assert!(mask.allows(SelectionMask::PATH));

        mask.set_locked(true);
        mask.clear(SelectionMask::LOCK);
        assert_ne!(mask.effective() & SelectionMask::LOCK, 0);
        assert!(!mask.test(SelectionMask::LOCK));
        assert!(!mask.allows(SelectionMask::PATH));

        mask.set_locked(false);
        assert!(mask.allows(SelectionMask::PATH));
        mask.clear(SelectionMask::PATH);
        assert!(!mask.allows(SelectionMask::PATH));
    }

    #[test]
    fn path_hit_selects_path_and_vertices() {
        let (store, path, verts) = two_segment_store();
        let mut sel = Selection::new();
        sel.add_hit(&edge_hit(path), &store);
        assert!(sel.paths().contains(&path));
        assert_eq!(sel.vertices().len(), verts.len());
    }

    #[test]
    fn handle_hit_leaves_selection_alone() {
        let (store, _, verts) = two_segment_store();
        let mut sel = Selection::new();
        let rev = sel.revision();
        sel.add_hit(
            &Hit {
                kind: HitKind::Handle,
                target: HitTarget::Vertex(verts[0]),
                out: true,
            },
            &store,
        );
        assert!(sel.is_empty());
        assert_eq!(sel.revision(), rev);
    }

    #[test]
    fn toggle_hit_removes_path_vertices() {
        let (store, path, _) = two_segment_store();
        let mut sel = Selection::new();
        sel.add_hit(&edge_hit(path), &store);
        sel.toggle_hit(&edge_hit(path), &store);
        assert!(sel.is_empty());
    }

    #[test]
    fn hover_policy_splits_object_and_non_object() {
        let (_, path, verts) = two_segment_store();
        let mut sel = Selection::new();
        assert!(sel.contains_non_object_hover());

        sel.set_hovered(Some(edge_hit(path)));
        assert!(sel.contains_object_hover());
        assert!(!sel.contains_non_object_hover());

        sel.set_hovered(Some(Hit {
            kind: HitKind::Vertex,
            target: HitTarget::Vertex(verts[1]),
            out: false,
        }));
        assert!(sel.contains_non_object_hover());

        sel.clear_hover();
        assert!(sel.hovered().is_none());
    }

    #[test]
    fn prune_drops_stale_ids() {
        let (mut store, path, verts) = two_segment_store();
        let mut sel = Selection::new();
        sel.add_hit(&edge_hit(path), &store);
        store.delete_path(path, true).unwrap();

        assert_eq!(sel.prune(&store), 1 + verts.len());
        assert!(sel.is_empty());
    }

    #[test]
    fn rebuild_vertices_follows_objects() {
        let (mut store, path, verts) = two_segment_store();
        let pt_vertex = store.create_vertex(Point::new(50.0, 50.0));
        let pt = store
            .create_point(pt_vertex, crate::model::PointStyle::default())
            .unwrap();

        let mut sel = Selection::new();
        sel.vertices_mut().insert(VertexId(999));
        sel.paths_mut().insert(path);
        sel.points_mut().insert(pt);
        sel.rebuild_vertices(&store);

        assert!(!sel.vertices().contains(&VertexId(999)));
        assert!(sel.vertices().contains(&pt_vertex));
        assert!(verts.iter().all(|v| sel.vertices().contains(v)));
    }

    #[test]
    fn record_round_trips() {
        let mut sel = Selection::new();
        sel.paths_mut().insert(PathId(3));
        sel.vertices_mut().insert(VertexId(8));
        let back = Selection::from_record(sel.to_record());
        assert_eq!(back.paths(), sel.paths());
        assert_eq!(back.vertices(), sel.vertices());
    }
}
