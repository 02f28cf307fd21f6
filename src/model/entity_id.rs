// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Strongly typed identifiers for vertices, paths, points and lines.
//!
//! Each id kind is its own `u32` newtype so a `PathId` can never be passed
//! where a `VertexId` is expected. Ids are handed out by an [`IdAllocator`]
//! owned by the `ObjectStore`; they increase monotonically and are never
//! reused within a document, so a stale id held by a selection or a line
//! simply stops resolving instead of pointing at a different object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Conversions shared by every id newtype
pub trait EntityId: Copy + Eq + Ord + std::hash::Hash + fmt::Debug {
    fn from_raw(raw: u32) -> Self;
    fn raw(self) -> u32;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl EntityId for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Vertex`](super::Vertex)
    VertexId,
    "v"
);
entity_id!(
    /// Identifies a [`Path`](super::Path)
    PathId,
    "path#"
);
entity_id!(
    /// Identifies a point glyph ([`Point`](super::Point))
    PointId,
    "point#"
);
entity_id!(
    /// Identifies a [`Line`](super::Line)
    LineId,
    "line#"
);

/// Position on the shared z-order axis
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ZIndex(pub u32);

/// Monotonic id source for one entity kind
#[derive(Debug, Clone)]
pub struct IdAllocator<I> {
    next: u32,
    _kind: PhantomData<I>,
}

impl<I: EntityId> IdAllocator<I> {
    pub fn new() -> Self {
        Self {
            next: 1,
            _kind: PhantomData,
        }
    }

    /// Hand out the next unused id
    pub fn next(&mut self) -> I {
        let id = I::from_raw(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Make sure future ids are strictly greater than every id in `seen`
    pub fn advance_past(&mut self, seen: impl IntoIterator<Item = I>) {
        if let Some(max) = seen.into_iter().map(EntityId::raw).max() {
            self.next = self.next.max(max.saturating_add(1));
        }
    }

    /// The id that the next call to [`next`](Self::next) will return
    pub fn peek(&self) -> I {
        I::from_raw(self.next)
    }
}

impl<I: EntityId> Default for IdAllocator<I> {
    fn default() -> Self {
        Self::new()
    }
}
