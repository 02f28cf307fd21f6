// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Z-order management for paths and lines.
//!
//! User objects live in the band `[FLOOR_USER, CEIL_USER]`. New objects go
//! one step above the current maximum. Repeated "insert between" halves
//! gaps, so once two neighbours get closer than `RENORM_MIN_GAP` every user
//! z-index is redistributed with a uniform stride, keeping relative order.

use super::entity_id::{LineId, PathId, ZIndex};
use super::error::ModelError;
use super::store::ObjectStore;
use crate::settings::z_order;
use std::collections::BTreeSet;

/// An object that takes part in z-ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZTarget {
    Path(PathId),
    Line(LineId),
}

/// Midpoint between two z-indices, if there is room for one
pub fn insert_between(lo: ZIndex, hi: ZIndex) -> Option<ZIndex> {
    let (lo, hi) = if lo <= hi { (lo.0, hi.0) } else { (hi.0, lo.0) };
    (hi - lo >= 2).then(|| ZIndex(lo + (hi - lo) / 2))
}

/// Uniform stride for `n` objects across the user band
fn stride_for(n: usize) -> u32 {
    let band = u64::from(z_order::CEIL_USER - z_order::FLOOR_USER);
    let fit = band / (n as u64 + 1);
    (fit.min(u64::from(z_order::STEP)) as u32).max(1)
}

impl ObjectStore {
    pub fn z_of(&self, target: ZTarget) -> Option<ZIndex> {
        match target {
            ZTarget::Path(id) => self.path(id).map(|p| p.z_index),
            ZTarget::Line(id) => self.line(id).map(|l| l.z_index),
        }
    }

    fn set_z(&mut self, target: ZTarget, z: ZIndex) -> Result<(), ModelError> {
        match target {
            ZTarget::Path(id) => {
                self.path_mut(id).ok_or(ModelError::PathNotFound(id))?.z_index = z;
            }
            ZTarget::Line(id) => {
                self.line_mut(id).ok_or(ModelError::LineNotFound(id))?.z_index = z;
            }
        }
        Ok(())
    }

    /// Every z-ordered object, bottom to top (ties broken by kind then id)
    pub fn z_ordered(&self) -> Vec<ZTarget> {
        let mut all: Vec<(ZIndex, ZTarget)> = self
            .paths()
            .map(|p| (p.z_index, ZTarget::Path(p.id)))
            .chain(self.lines().map(|l| (l.z_index, ZTarget::Line(l.id))))
            .collect();
        all.sort();
        all.into_iter().map(|(_, t)| t).collect()
    }

    /// Z values of paths and lines that fall inside the user band
    fn user_zs(&self) -> impl Iterator<Item = u32> + '_ {
        self.paths()
            .map(|p| p.z_index.0)
            .chain(self.lines().map(|l| l.z_index.0))
            .filter(|z| (z_order::FLOOR_USER..=z_order::CEIL_USER).contains(z))
    }

    fn max_user_z(&self) -> Option<u32> {
        self.user_zs().max()
    }

    /// Z-index for a new object: one step above the current top
    pub fn assign_new_z(&mut self) -> ZIndex {
        let Some(max) = self.max_user_z() else {
            return ZIndex(z_order::FLOOR_USER);
        };
        if let Some(z) = max.checked_add(z_order::STEP)
            && z <= z_order::CEIL_USER
        {
            return ZIndex(z);
        }

        self.renormalize();
        let max = self.max_user_z().unwrap_or(z_order::FLOOR_USER);
        match max.checked_add(z_order::STEP) {
            Some(z) if z <= z_order::CEIL_USER => ZIndex(z),
            _ => ZIndex(max + (z_order::CEIL_USER - max).div_ceil(2)),
        }
    }

    /// Move one object above every other
    pub fn bump_to_front(&mut self, target: ZTarget) -> Result<(), ModelError> {
        if self.z_of(target).is_none() {
            return Err(match target {
                ZTarget::Path(id) => ModelError::PathNotFound(id),
                ZTarget::Line(id) => ModelError::LineNotFound(id),
            });
        }
        let z = self.assign_new_z();
        self.set_z(target, z)?;
        self.renormalize_if_needed();
        Ok(())
    }

    /// Smallest distance between adjacent user z-indices (0 for duplicates)
    pub fn min_z_gap(&self) -> Option<u32> {
        let mut zs: Vec<u32> = self.user_zs().collect();
        zs.sort_unstable();
        zs.windows(2).map(|w| w[1] - w[0]).min()
    }

    /// Redistribute when neighbours got too close; returns whether it did
    pub fn renormalize_if_needed(&mut self) -> bool {
        match self.min_z_gap() {
            Some(gap) if gap < z_order::RENORM_MIN_GAP => {
                self.renormalize();
                true
            }
            _ => false,
        }
    }

    /// Spread every z-ordered object evenly over the user band
    pub fn renormalize(&mut self) {
        let order = self.z_ordered();
        tracing::debug!("Renormalizing z-order of {} objects", order.len());
        self.apply_z_order(&order);
    }

    /// Assign uniformly spaced z-indices following `order`
    fn apply_z_order(&mut self, order: &[ZTarget]) {
        let stride = stride_for(order.len());
        let mut z = z_order::FLOOR_USER;
        for &target in order {
            // Targets come from z_ordered(), so they all resolve
            let _ = self.set_z(target, ZIndex(z));
            z = z.saturating_add(stride);
        }
    }

    // ===== SELECTION REORDERING =====

    /// Raise the chosen objects above all others, keeping their relative order
    pub fn bring_to_front(&mut self, chosen: &BTreeSet<ZTarget>) -> bool {
        let order = self.z_ordered();
        let (mut rest, picked): (Vec<_>, Vec<_>) =
            order.iter().copied().partition(|t| !chosen.contains(t));
        rest.extend(picked);
        self.reorder(order, rest)
    }

    /// Lower the chosen objects below all others, keeping their relative order
    pub fn send_to_back(&mut self, chosen: &BTreeSet<ZTarget>) -> bool {
        let order = self.z_ordered();
        let (mut picked, rest): (Vec<_>, Vec<_>) =
            order.iter().copied().partition(|t| chosen.contains(t));
        picked.extend(rest);
        self.reorder(order, picked)
    }

    /// Swap each chosen object with the unchosen neighbour just above it
    pub fn bring_forward(&mut self, chosen: &BTreeSet<ZTarget>) -> bool {
        let order = self.z_ordered();
        let mut next = order.clone();
        for i in (0..next.len().saturating_sub(1)).rev() {
            if chosen.contains(&next[i]) && !chosen.contains(&next[i + 1]) {
                next.swap(i, i + 1);
            }
        }
        self.reorder(order, next)
    }

    /// Swap each chosen object with the unchosen neighbour just below it
    pub fn send_backward(&mut self, chosen: &BTreeSet<ZTarget>) -> bool {
        let order = self.z_ordered();
        let mut next = order.clone();
        for i in 1..next.len() {
            if chosen.contains(&next[i]) && !chosen.contains(&next[i - 1]) {
                next.swap(i, i - 1);
            }
        }
        self.reorder(order, next)
    }

    fn reorder(&mut self, before: Vec<ZTarget>, after: Vec<ZTarget>) -> bool {
        let changed = before != after;
        self.apply_z_order(&after);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn store_with_paths(n: usize) -> (ObjectStore, Vec<PathId>) {
        let mut store = ObjectStore::new();
        let ids = (0..n)
            .map(|i| {
                let a = store.create_vertex(Point::new(i as f64, 0.0));
                let b = store.create_vertex(Point::new(i as f64, 10.0));
                store.create_path(vec![a, b], false).unwrap()
            })
            .collect();
        (store, ids)
    }

    fn zs(store: &ObjectStore, ids: &[PathId]) -> Vec<u32> {
        ids.iter().map(|&id| store.path(id).unwrap().z_index.0).collect()
    }

    #[test]
    fn first_object_sits_on_the_floor() {
        let (store, ids) = store_with_paths(1);
        assert_eq!(zs(&store, &ids), vec![z_order::FLOOR_USER]);
    }

    #[test]
    fn objects_outside_the_user_band_do_not_force_renormalization() {
        let (mut store, ids) = store_with_paths(3);
        // Two objects stacked on the editor back layer, one apart
        store.path_mut(ids[0]).unwrap().z_index = ZIndex(z_order::EDITOR_BACK);
        store.path_mut(ids[1]).unwrap().z_index = ZIndex(z_order::EDITOR_BACK + 1);
        let before = zs(&store, &ids);

        assert_eq!(store.min_z_gap(), None);
        assert!(!store.renormalize_if_needed());
        assert_eq!(zs(&store, &ids), before);

        // A duplicate inside the band still counts
        let (mut store, ids) = store_with_paths(2);
        let z = store.path(ids[0]).unwrap().z_index;
        store.path_mut(ids[1]).unwrap().z_index = z;
        assert_eq!(store.min_z_gap(), Some(0));
        assert!(store.renormalize_if_needed());
    }

    #[test]
    fn insert_between_takes_midpoint() {
        assert_eq!(insert_between(ZIndex(10), ZIndex(20)), Some(ZIndex(15)));
        assert_eq!(insert_between(ZIndex(20), ZIndex(10)), Some(ZIndex(15)));
        assert_eq!(insert_between(ZIndex(10), ZIndex(11)), None);
    }

    #[test]
    fn renormalize_preserves_order_and_evens_gaps() {
        let (mut store, ids) = store_with_paths(5);

        // Squeeze objects together by repeated halving
        let mut lo = store.path(ids[0]).unwrap().z_index;
        let hi = store.path(ids[1]).unwrap().z_index;
        for &id in &ids[2..] {
            let z = insert_between(lo, hi).unwrap();
            store.path_mut(id).unwrap().z_index = z;
            lo = z;
        }
        let order_before = store.z_ordered();
        assert!(store.min_z_gap().unwrap() < 1024);

        store.renormalize();

        assert_eq!(store.z_ordered(), order_before);
        let mut sorted: Vec<u32> = zs(&store, &ids);
        sorted.sort_unstable();
        let gaps: Vec<u32> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.iter().all(|&g| g == gaps[0]));
        assert_eq!(sorted[0], z_order::FLOOR_USER);
    }

    #[test]
    fn duplicates_trigger_renormalization() {
        let (mut store, ids) = store_with_paths(3);
        let z = store.path(ids[0]).unwrap().z_index;
        store.path_mut(ids[2]).unwrap().z_index = z;
        assert!(store.renormalize_if_needed());
        assert!(store.min_z_gap().unwrap() >= z_order::RENORM_MIN_GAP);
        assert!(!store.renormalize_if_needed());
    }

    #[test]
    fn new_z_near_ceiling_renormalizes_first() {
        let (mut store, ids) = store_with_paths(2);
        store.path_mut(ids[1]).unwrap().z_index = ZIndex(z_order::CEIL_USER - 3);
        let z = store.assign_new_z();
        assert!(z.0 <= z_order::CEIL_USER);
        assert!(z > store.path(ids[1]).unwrap().z_index);
    }

    #[test]
    fn bump_to_front_raises_one_object() {
        let (mut store, ids) = store_with_paths(3);
        store.bump_to_front(ZTarget::Path(ids[0])).unwrap();
        assert_eq!(store.z_ordered().last(), Some(&ZTarget::Path(ids[0])));
        assert!(store.bump_to_front(ZTarget::Line(LineId(77))).is_err());
    }

    #[test]
    fn lines_share_the_axis_with_paths() {
        let (mut store, ids) = store_with_paths(1);
        let a = store.create_vertex(Point::ORIGIN);
        let b = store.create_vertex(Point::new(5.0, 5.0));
        let line = store.create_line(a, b).unwrap();
        assert_eq!(
            store.z_ordered(),
            vec![ZTarget::Path(ids[0]), ZTarget::Line(line)]
        );
    }

    #[test]
    fn front_and_back_keep_relative_order() {
        let (mut store, ids) = store_with_paths(4);
        let chosen: BTreeSet<ZTarget> = [ZTarget::Path(ids[0]), ZTarget::Path(ids[2])].into();

        assert!(store.bring_to_front(&chosen));
        let expected: Vec<ZTarget> = [ids[1], ids[3], ids[0], ids[2]]
            .into_iter()
            .map(ZTarget::Path)
            .collect();
        assert_eq!(store.z_ordered(), expected);

        assert!(store.send_to_back(&chosen));
        let expected: Vec<ZTarget> = [ids[0], ids[2], ids[1], ids[3]]
            .into_iter()
            .map(ZTarget::Path)
            .collect();
        assert_eq!(store.z_ordered(), expected);
    }

    #[test]
    fn forward_and_backward_step_one_place() {
        let (mut store, ids) = store_with_paths(3);
        let chosen: BTreeSet<ZTarget> = [ZTarget::Path(ids[0])].into();

        assert!(store.bring_forward(&chosen));
        assert_eq!(store.z_ordered()[1], ZTarget::Path(ids[0]));

        assert!(store.send_backward(&chosen));
        assert_eq!(store.z_ordered()[0], ZTarget::Path(ids[0]));
        assert!(!store.send_backward(&chosen));
    }
}
