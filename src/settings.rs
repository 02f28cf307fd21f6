// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor settings and configuration constants.
//!
//! The constants below are the compiled-in defaults. Anything a host may
//! want to tune at runtime is also mirrored in [`EditorConfig`], which can
//! be loaded from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Z-ORDER BANDS
// ============================================================================
/// Reserved for grid and background layers
const Z_EDITOR_BACK: u32 = 1;

/// First z-index available to user objects
const Z_FLOOR_USER: u32 = 255;

/// Reserved for overlays and guides drawn above everything
const Z_EDITOR_FRONT: u32 = u32::MAX - 2;

/// Highest z-index a user object may take
const Z_CEIL_USER: u32 = Z_EDITOR_FRONT - 1;

/// Spacing between consecutive user objects after renormalization
const Z_STEP: u32 = 1024;

/// Adjacent user z-indices closer than this trigger a renormalization
const RENORM_MIN_GAP: u32 = 2;

// ============================================================================
// BEZIER SETTINGS
// ============================================================================
/// Handles are quantized to, and compared against zero with, this epsilon
const BEZIER_NUMERICAL_ERROR: f64 = 1e-3;

/// Below this magnitude a quadratic coefficient is treated as zero
const QUADRATIC_EPSILON: f64 = 1e-8;

/// Roots of the derivative closer than this are considered the same root
const ROOT_DEDUPE_EPSILON: f64 = 1e-6;

// ============================================================================
// HIT TESTING SETTINGS
// ============================================================================
/// Squared pick radius for vertices and edges (screen pixels squared)
const HIT_THRESH_SQ: f64 = 6.0 * 6.0;

/// Size of a drawn Bezier handle square (screen pixels)
const HANDLE_BOX_SIZE: f64 = 5.5;

/// Extra slack around a handle square when picking it (screen pixels)
const HANDLE_PICK_PAD: f64 = 4.0;

/// Number of line segments used to approximate a curved edge
const BEZIER_HIT_STEPS: usize = 20;

// ============================================================================
// SELECTION SETTINGS
// ============================================================================
/// Selection bounding box is padded by this many pixels on every side
const SELECTION_BBOX_MARGIN_PX: f64 = 8.0;

/// Half size of a bounding-box scale handle (screen pixels)
const BBOX_HANDLE_HALF_PX: f64 = 5.0;

/// Offset applied to pasted objects (world units)
const PASTE_OFFSET: f64 = 16.0;

// ============================================================================
// PEN SETTINGS
// ============================================================================
/// A press must move this far (screen pixels) to become a handle drag
const PEN_DRAG_MOVEMENT_THRESHOLD: f64 = 4.0;

/// ...and it must do so within this many seconds of the press
const PEN_DRAG_TIME_WINDOW: f64 = 0.35;

/// Mouse movement (screen pixels) before a press becomes a drag
const MOUSE_DRAG_THRESHOLD: f64 = 0.0;

// ============================================================================
// SNAP AND NUDGE SETTINGS
// ============================================================================
/// Whether snap-to-grid is on without holding Shift
const SNAP_TO_GRID_ENABLED: bool = false;

/// Grid spacing for snapping (world units)
const SNAP_TO_GRID_SPACING: f64 = 8.0;

/// Base nudge amount in world units (arrow key)
const NUDGE_BASE: f64 = 1.0;

/// Shift-arrow nudge amount in world units
const NUDGE_SHIFT: f64 = 10.0;

// ============================================================================
// PERSISTENCE SETTINGS
// ============================================================================
/// Document schema version written by this build
const SCHEMA_MAJOR: u32 = 1;
const SCHEMA_MINOR: u32 = 0;

/// Seconds a save/load status message stays visible
const STATUS_LIFETIME: f64 = 3.0;

/// Longest label a path may carry
const LABEL_MAX_CHARS: usize = 64;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Z-order bands shared by paths and lines
pub mod z_order {
    pub const EDITOR_BACK: u32 = super::Z_EDITOR_BACK;
    pub const FLOOR_USER: u32 = super::Z_FLOOR_USER;
    pub const EDITOR_FRONT: u32 = super::Z_EDITOR_FRONT;
    pub const CEIL_USER: u32 = super::Z_CEIL_USER;
    pub const STEP: u32 = super::Z_STEP;
    pub const RENORM_MIN_GAP: u32 = super::RENORM_MIN_GAP;
}

/// Numerical tolerances for curve math
pub mod bezier {
    pub const NUMERICAL_ERROR: f64 = super::BEZIER_NUMERICAL_ERROR;
    pub const QUADRATIC_EPSILON: f64 = super::QUADRATIC_EPSILON;
    pub const ROOT_DEDUPE_EPSILON: f64 = super::ROOT_DEDUPE_EPSILON;
}

/// Hit-testing radii (screen pixels)
pub mod hit {
    pub const THRESH_SQ: f64 = super::HIT_THRESH_SQ;
    pub const HANDLE_BOX_SIZE: f64 = super::HANDLE_BOX_SIZE;
    pub const HANDLE_PICK_PAD: f64 = super::HANDLE_PICK_PAD;
    pub const BEZIER_STEPS: usize = super::BEZIER_HIT_STEPS;
}

/// Selection box and clipboard settings
pub mod selection {
    pub const BBOX_MARGIN_PX: f64 = super::SELECTION_BBOX_MARGIN_PX;
    pub const BBOX_HANDLE_HALF_PX: f64 = super::BBOX_HANDLE_HALF_PX;
    pub const PASTE_OFFSET: f64 = super::PASTE_OFFSET;
}

/// Pen and mouse gesture thresholds
pub mod pen {
    pub const DRAG_MOVEMENT_THRESHOLD: f64 = super::PEN_DRAG_MOVEMENT_THRESHOLD;
    pub const DRAG_TIME_WINDOW: f64 = super::PEN_DRAG_TIME_WINDOW;
    pub const MOUSE_DRAG_THRESHOLD: f64 = super::MOUSE_DRAG_THRESHOLD;
}

/// Snap-to-grid settings for vertex movement
pub mod snap {
    pub const ENABLED: bool = super::SNAP_TO_GRID_ENABLED;
    pub const SPACING: f64 = super::SNAP_TO_GRID_SPACING;
}

/// Nudge amounts for arrow key movement
pub mod nudge {
    pub const BASE: f64 = super::NUDGE_BASE;
    pub const SHIFT: f64 = super::NUDGE_SHIFT;
}

/// Document format and status reporting
pub mod io {
    pub const SCHEMA_MAJOR: u32 = super::SCHEMA_MAJOR;
    pub const SCHEMA_MINOR: u32 = super::SCHEMA_MINOR;
    pub const STATUS_LIFETIME: f64 = super::STATUS_LIFETIME;
    pub const LABEL_MAX_CHARS: usize = super::LABEL_MAX_CHARS;
}

// ============================================================================
// RUNTIME CONFIGURATION
// ============================================================================

/// Error reading an [`EditorConfig`] file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime-tunable editor settings.
///
/// Every field falls back to the compiled-in default, so a config file
/// only has to mention what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Squared pick radius for vertices and edges (pixels squared)
    pub hit_radius_sq: f64,
    pub handle_box_size: f64,
    pub bezier_hit_steps: usize,
    pub bbox_margin_px: f64,
    pub bbox_handle_half_px: f64,
    pub pen_movement_threshold: f64,
    pub pen_time_window: f64,
    pub snap_enabled: bool,
    pub snap_step: f64,
    pub paste_offset: f64,
    pub status_lifetime: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_radius_sq: hit::THRESH_SQ,
            handle_box_size: hit::HANDLE_BOX_SIZE,
            bezier_hit_steps: hit::BEZIER_STEPS,
            bbox_margin_px: selection::BBOX_MARGIN_PX,
            bbox_handle_half_px: selection::BBOX_HANDLE_HALF_PX,
            pen_movement_threshold: pen::DRAG_MOVEMENT_THRESHOLD,
            pen_time_window: pen::DRAG_TIME_WINDOW,
            snap_enabled: snap::ENABLED,
            snap_step: snap::SPACING,
            paste_offset: selection::PASTE_OFFSET,
            status_lifetime: io::STATUS_LIFETIME,
        }
    }
}

impl EditorConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded editor config: {}", path.display());
        Ok(config)
    }
}
