// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Camera mapping between world (design) space and canvas pixels

use kurbo::{Affine, Point, Vec2};

const MIN_ZOOM: f64 = 0.02;
const MAX_ZOOM: f64 = 64.0;

/// Pan and zoom of the canvas.
///
/// `screen = world * zoom + offset`. Every change bumps `revision` so
/// cached screen-space geometry knows to recompute; the fields are only
/// written through the methods below.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPort {
    zoom: f64,
    offset: Vec2,
    revision: u64,
}

impl ViewPort {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Canvas pixel position of the world origin
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World to canvas pixels
    pub fn to_screen(&self, p: Point) -> Point {
        self.affine() * p
    }

    /// Canvas pixels to world
    pub fn screen_to_design(&self, p: Point) -> Point {
        self.affine().inverse() * p
    }

    /// World-to-screen transform for hosts that draw with kurbo
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a length in pixels to world units
    pub fn pixels_to_world(&self, px: f64) -> f64 {
        px / self.zoom
    }

    pub fn pan(&mut self, delta_px: Vec2) {
        if delta_px == Vec2::ZERO {
            return;
        }
        self.offset += delta_px;
        self.revision += 1;
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        if offset != self.offset {
            self.offset = offset;
            self.revision += 1;
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.revision += 1;
        }
    }

    /// Zoom by `factor` keeping the world point under `anchor_px` fixed
    pub fn zoom_about(&mut self, anchor_px: Point, factor: f64) {
        let world = self.screen_to_design(anchor_px);
        self.set_zoom(self.zoom * factor);
        self.offset = anchor_px.to_vec2() - world.to_vec2() * self.zoom;
        self.revision += 1;
    }
}

impl Default for ViewPort {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn screen_round_trip() {
        let mut vp = ViewPort::new();
        vp.set_zoom(2.5);
        vp.pan(Vec2::new(40.0, -12.0));
        let p = Point::new(13.0, 7.0);
        let back = vp.screen_to_design(vp.to_screen(p));
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-9);
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut vp = ViewPort::new();
        let anchor = Point::new(200.0, 150.0);
        let world = vp.screen_to_design(anchor);
        vp.zoom_about(anchor, 3.0);
        let after = vp.to_screen(world);
        assert_abs_diff_eq!(after.x, anchor.x, epsilon = 1e-9);
        assert_abs_diff_eq!(after.y, anchor.y, epsilon = 1e-9);
    }

    #[test]
    fn changes_bump_revision() {
        let mut vp = ViewPort::new();
        let r0 = vp.revision();
        vp.pan(Vec2::ZERO);
        assert_eq!(vp.revision(), r0);
        vp.pan(Vec2::new(1.0, 0.0));
        assert!(vp.revision() > r0);
        let r1 = vp.revision();
        vp.set_zoom(1.0);
        assert_eq!(vp.revision(), r1);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = ViewPort::new();
        vp.set_zoom(0.0);
        assert!(vp.zoom() > 0.0);
        vp.set_zoom(1e9);
        assert_eq!(vp.zoom(), MAX_ZOOM);
    }

    #[test]
    fn set_offset_bumps_revision_only_on_change() {
        let mut vp = ViewPort::new();
        let r0 = vp.revision();
        vp.set_offset(Vec2::ZERO);
        assert_eq!(vp.revision(), r0);
        vp.set_offset(Vec2::new(3.0, 4.0));
        assert!(vp.revision() > r0);
        assert_eq!(vp.offset(), Vec2::new(3.0, 4.0));
        assert_eq!(vp.to_screen(Point::ORIGIN), Point::new(3.0, 4.0));
    }
}
