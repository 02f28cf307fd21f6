// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Small 2D helpers used by hit testing, lasso selection and transforms.

use kurbo::{Line, ParamCurveNearest, Point, Rect};

/// Denominators smaller than this are treated as zero
const DIV_EPSILON: f64 = 1e-9;

/// `num / den`, or the neutral factor 1.0 when `den` is near zero
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den.abs() < DIV_EPSILON {
        1.0
    } else {
        num / den
    }
}

/// Round `value` to the nearest multiple of `step`
pub fn quantize(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Round both coordinates to the grid; a non-positive step is a no-op
pub fn snap_to_grid(p: Point, step: f64) -> Point {
    if step <= 0.0 {
        return p;
    }
    Point::new(quantize(p.x, step), quantize(p.y, step))
}

/// Squared distance from `p` to the closed segment `a`-`b`
pub fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return p.distance_squared(a);
    }
    Line::new(a, b).nearest(p, 1e-9).distance_sq
}

/// Even-odd point-in-polygon test; the polygon is implicitly closed
pub fn point_in_polygon(poly: &[Point], p: Point) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (pi, pj) = (poly[i], poly[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether segment `a`-`b` touches the rectangle (inside or crossing an edge)
pub fn segment_intersects_rect(a: Point, b: Point, rect: Rect) -> bool {
    let rect = rect.abs();
    if rect.contains(a) || rect.contains(b) || on_rect(a, rect) || on_rect(b, rect) {
        return true;
    }
    if (a.x < rect.x0 && b.x < rect.x0)
        || (a.x > rect.x1 && b.x > rect.x1)
        || (a.y < rect.y0 && b.y < rect.y0)
        || (a.y > rect.y1 && b.y > rect.y1)
    {
        return false;
    }

    let tl = Point::new(rect.x0, rect.y0);
    let tr = Point::new(rect.x1, rect.y0);
    let br = Point::new(rect.x1, rect.y1);
    let bl = Point::new(rect.x0, rect.y1);
    segments_cross(a, b, tl, tr)
        || segments_cross(a, b, tr, br)
        || segments_cross(a, b, br, bl)
        || segments_cross(a, b, bl, tl)
}

// ===== PRIVATE HELPERS =====

// `Rect::contains` is half-open; lasso edges are inclusive
fn on_rect(p: Point, rect: Rect) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

fn ccw(p1: Point, p2: Point, p3: Point) -> bool {
    (p3.y - p1.y) * (p2.x - p1.x) > (p2.y - p1.y) * (p3.x - p1.x)
}

fn segments_cross(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}
