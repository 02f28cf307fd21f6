// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Stateless geometry: cubic Bezier math and 2D primitives.
//!
//! Nothing in here knows about ids or the object store. Callers resolve
//! vertices first and hand plain `kurbo` points to these functions.

pub mod cubic;
pub mod primitives;

pub use cubic::{SegmentControls, evaluate_cubic, segment_controls, tight_aabb_cubic};
pub use primitives::{
    distance_sq_to_segment, point_in_polygon, quantize, safe_div, segment_intersects_rect,
    snap_to_grid,
};
