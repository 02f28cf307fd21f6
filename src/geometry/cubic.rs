// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Cubic Bezier evaluation, tight bounds and segment classification.
//!
//! The tight bounding box is computed analytically: the extrema of a cubic
//! lie either at its endpoints or where the derivative of one coordinate
//! vanishes. The derivative is a quadratic per axis, so at most four
//! interior parameters need evaluating.

use crate::model::Vertex;
use crate::settings::bezier;
use kurbo::{CubicBez, ParamCurve, Point, Rect};

/// Evaluate the cubic defined by four control points at `t`
pub fn evaluate_cubic(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    CubicBez::new(p0, p1, p2, p3).eval(t)
}

/// Exact axis-aligned bounds of a cubic segment
pub fn tight_aabb_cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Rect {
    let mut bounds = Rect::from_points(p0, p3);

    let x_roots = derivative_roots(p0.x, p1.x, p2.x, p3.x);
    let y_roots = derivative_roots(p0.y, p1.y, p2.y, p3.y);

    for t in x_roots.into_iter().chain(y_roots) {
        bounds = bounds.union_pt(evaluate_cubic(p0, p1, p2, p3, t));
    }
    bounds
}

/// Parameters in (0, 1) where one coordinate of the cubic is stationary.
///
/// B'(t) / 3 = a t^2 + b t + c with
/// a = -p0 + 3p1 - 3p2 + p3, b = 2(p0 - 2p1 + p2), c = p1 - p0.
fn derivative_roots(p0: f64, p1: f64, p2: f64, p3: f64) -> Vec<f64> {
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 2.0 * (p0 - 2.0 * p1 + p2);
    let c = p1 - p0;
    solve_quadratic_in_unit(a, b, c)
}

/// Real roots of `a t^2 + b t + c` strictly inside (0, 1), deduplicated
pub(crate) fn solve_quadratic_in_unit(a: f64, b: f64, c: f64) -> Vec<f64> {
    let eps = bezier::QUADRATIC_EPSILON;
    let mut candidates = Vec::with_capacity(2);

    if a.abs() < eps {
        // Degenerates to b t + c = 0
        if b.abs() >= eps {
            candidates.push(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            candidates.push((-b + sq) / (2.0 * a));
            candidates.push((-b - sq) / (2.0 * a));
        }
    }

    let mut roots: Vec<f64> = Vec::with_capacity(2);
    for t in candidates {
        if !(t > 0.0 && t < 1.0) {
            continue;
        }
        if roots
            .iter()
            .any(|r| (r - t).abs() < bezier::ROOT_DEDUPE_EPSILON)
        {
            continue;
        }
        roots.push(t);
    }
    roots
}

/// Effective control points of one path segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentControls {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    /// Both adjoining handles are zero: the segment is a straight line
    pub is_linear: bool,
}

impl SegmentControls {
    pub fn to_cubic(&self) -> CubicBez {
        CubicBez::new(self.p0, self.p1, self.p2, self.p3)
    }

    pub fn eval(&self, t: f64) -> Point {
        evaluate_cubic(self.p0, self.p1, self.p2, self.p3, t)
    }

    /// Tight bounds, or the endpoint box for straight segments
    pub fn bounds(&self) -> Rect {
        if self.is_linear {
            Rect::from_points(self.p0, self.p3)
        } else {
            tight_aabb_cubic(self.p0, self.p1, self.p2, self.p3)
        }
    }

    /// `steps + 1` points along the segment, endpoints included
    pub fn flatten(&self, steps: usize) -> Vec<Point> {
        if self.is_linear || steps < 2 {
            return vec![self.p0, self.p3];
        }
        (0..=steps)
            .map(|k| self.eval(k as f64 / steps as f64))
            .collect()
    }
}

/// Control points of the segment running from `a` to `b`.
///
/// A handle that is zero within epsilon collapses its control point onto
/// the anchor, so a vertex with only one handle set still yields a valid
/// cubic (one control point coincident with an endpoint).
pub fn segment_controls(a: &Vertex, b: &Vertex) -> SegmentControls {
    let out_linear = a.bezier.out_is_linear();
    let in_linear = b.bezier.in_is_linear();
    let p0 = a.pos;
    let p3 = b.pos;

    if out_linear && in_linear {
        return SegmentControls {
            p0,
            p1: p0,
            p2: p3,
            p3,
            is_linear: true,
        };
    }

    let p1 = if out_linear { p0 } else { p0 + a.bezier.out_handle() };
    let p2 = if in_linear { p3 } else { p3 + b.bezier.in_handle() };
    SegmentControls {
        p0,
        p1,
        p2,
        p3,
        is_linear: false,
    }
}
