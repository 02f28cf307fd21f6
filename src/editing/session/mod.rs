// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session - owns the drawing and drives it one frame at a time

mod hit_testing;
mod path_editing;

use super::clipboard::{self, ClipboardContents, PastePlacement};
use super::mouse::{FrameInput, Modifiers, Mouse, MouseButton, MouseEvent};
use super::selection::{Selection, SelectionMask};
use super::view_cache::{RevisionCache, Revisions, SelectionView};
use super::viewport::ViewPort;
use crate::data::{Document, IoOutcome, IoWorker, StatusMessage};
use crate::model::{ObjectStore, Point as PointGlyph, ZTarget};
use crate::settings::{EditorConfig, nudge};
use crate::tools::{ToolBox, ToolId};
use kurbo::{Point, Vec2};
use std::path::Path;

/// Editing session for one drawing
///
/// Holds the object store, the selection, the camera and the active tool.
/// Hosts feed it one [`FrameInput`] per frame through [`EditSession::update`];
/// every mutation happens inside that call or in an explicit command method.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Every vertex, path, point and line in the drawing
    pub store: ObjectStore,

    /// Currently selected objects, plus the per-frame hover result
    pub selection: Selection,

    /// Which kinds of object may be picked, and the selection lock
    pub selection_mask: SelectionMask,

    /// Viewport transformation
    pub viewport: ViewPort,

    /// Current editing tool
    pub current_tool: ToolBox,

    config: EditorConfig,
    /// Bumped whenever a setting that affects drawn geometry changes
    style_revision: u64,
    mouse: Mouse,
    /// Seconds since the session started, advanced by frame `dt`
    clock: f64,
    mods: Modifiers,
    last_cursor_px: Option<Point>,
    view_cache: RevisionCache<Revisions, Option<SelectionView>>,
    io: IoWorker,
    status: Option<StatusMessage>,
    clipboard: Option<ClipboardContents>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            store: ObjectStore::new(),
            selection: Selection::new(),
            selection_mask: SelectionMask::default(),
            viewport: ViewPort::new(),
            current_tool: ToolBox::for_id(ToolId::Select),
            config,
            style_revision: 0,
            mouse: Mouse::new(),
            clock: 0.0,
            mods: Modifiers::NONE,
            last_cursor_px: None,
            view_cache: RevisionCache::new(),
            io: IoWorker::new(),
            status: None,
            clipboard: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        if config != self.config {
            self.config = config;
            self.style_revision += 1;
        }
    }

    /// Session clock in seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Modifier keys held during the last frame
    pub fn modifiers(&self) -> Modifiers {
        self.mods
    }

    /// The counters every piece of derived view geometry is keyed on
    pub fn revisions(&self) -> Revisions {
        Revisions {
            selection: self.selection.revision(),
            geometry: self.store.revision(),
            camera: self.viewport.revision(),
            style: self.style_revision,
        }
    }

    // ===== Frame driver =====

    /// Advance one frame: finish background I/O, refresh hover, then feed
    /// the pointer and key edges to the active tool.
    pub fn update(&mut self, input: &FrameInput) {
        let dt = input.dt.max(0.0);
        self.clock += dt;
        self.mods = input.mods;

        if let Some(status) = &mut self.status {
            if !status.tick(dt) {
                self.status = None;
            }
        }
        for task in self.io.drain() {
            task(self);
        }

        let interactive = input.canvas_hovered && !input.blocking_ui_open;
        if interactive {
            self.refresh_hover(input.cursor_ws);
        } else {
            self.selection.clear_hover();
        }

        if input.escape || (input.blocking_ui_open && self.mouse.is_down()) {
            self.cancel_gesture();
        }

        let event = MouseEvent {
            pos: input.cursor_ws,
            screen: input.cursor_px,
            button: Some(MouseButton::Left),
            mods: input.mods,
            time: self.clock,
        };

        let moved = self.last_cursor_px != Some(input.cursor_px);
        if moved && (interactive || self.mouse.is_down()) {
            self.with_tool(|tool, mouse, session| mouse.mouse_moved(event, tool, session));
        }
        if input.double_click && !input.blocking_ui_open {
            self.finish_tool();
        } else if input.button_pressed && interactive {
            self.with_tool(|tool, mouse, session| mouse.mouse_down(event, tool, session));
        }
        if input.button_released && self.mouse.is_down() {
            self.with_tool(|tool, mouse, session| mouse.mouse_up(event, tool, session));
        }
        self.last_cursor_px = Some(input.cursor_px);

        if input.enter {
            self.finish_tool();
        }
        if !self.mouse.is_down() && !input.blocking_ui_open {
            if input.delete {
                self.delete_selection();
            }
            if input.nudge != Vec2::ZERO {
                let step = if input.mods.shift {
                    nudge::SHIFT
                } else {
                    nudge::BASE
                };
                self.nudge_selection(input.nudge * step);
            }
        }
    }

    /// Run `f` with the tool and mouse moved out of the session, so the
    /// tool can borrow the session mutably
    fn with_tool(&mut self, f: impl FnOnce(&mut ToolBox, &mut Mouse, &mut EditSession)) {
        let mut tool = std::mem::replace(&mut self.current_tool, ToolBox::for_id(ToolId::Select));
        let mut mouse = std::mem::take(&mut self.mouse);
        f(&mut tool, &mut mouse, self);
        self.current_tool = tool;
        self.mouse = mouse;
    }

    /// Abort whatever the active tool is doing
    pub fn cancel_gesture(&mut self) {
        self.with_tool(|tool, mouse, session| mouse.cancel(tool, session));
    }

    /// Explicit finish (Enter or double-click)
    pub fn finish_tool(&mut self) {
        self.with_tool(|tool, _mouse, session| tool.finish(session));
    }

    pub fn tool_id(&self) -> ToolId {
        self.current_tool.id()
    }

    /// Switch tools, aborting any gesture of the old one
    pub fn set_tool(&mut self, id: ToolId) {
        if self.current_tool.id() == id {
            return;
        }
        self.cancel_gesture();
        self.current_tool = ToolBox::for_id(id);
        tracing::debug!("Switched to {:?} tool", id);
    }

    /// Whether a drag or an authoring gesture is in progress
    pub fn is_busy(&self) -> bool {
        self.mouse.is_down() || self.current_tool.is_busy()
    }

    // ===== Derived view geometry =====

    /// Selection bounding box and scale handles, recomputed only when a
    /// revision counter has moved
    pub fn selection_view(&mut self) -> Option<SelectionView> {
        let key = self.revisions();
        let Self {
            view_cache,
            store,
            selection,
            viewport,
            config,
            ..
        } = self;
        view_cache
            .get_or_compute(key, || {
                SelectionView::compute(
                    store,
                    selection,
                    viewport.zoom(),
                    config.bbox_margin_px,
                    config.bbox_handle_half_px,
                )
            })
            .clone()
    }

    /// (hits, misses) of the selection view cache
    pub fn view_cache_stats(&self) -> (u64, u64) {
        (self.view_cache.hits(), self.view_cache.misses())
    }

    /// Visible paths and lines, back to front
    pub fn draw_order(&self) -> Vec<ZTarget> {
        self.store
            .z_ordered()
            .into_iter()
            .filter(|target| match *target {
                ZTarget::Path(id) => self.store.path(id).is_some_and(|p| p.visible),
                ZTarget::Line(id) => self.store.line(id).is_some_and(|l| l.visible),
            })
            .collect()
    }

    /// Visible point glyphs, in creation order
    pub fn visible_points(&self) -> impl Iterator<Item = &PointGlyph> {
        self.store.points().filter(|pt| pt.sty.visible)
    }

    // ===== Persistence =====

    pub fn document(&self) -> Document {
        Document::capture(&self.store, &self.selection)
    }

    /// Swap in a loaded drawing; any gesture in progress is dropped
    pub fn replace_document(&mut self, doc: Document) {
        let (store, selection) = doc.into_parts();
        self.store = store;
        self.selection = selection;
        self.view_cache.invalidate();
        self.mouse = Mouse::new();
        self.current_tool = ToolBox::for_id(self.current_tool.id());
        tracing::info!(
            "Document replaced: {} vertices, {} paths, {} points, {} lines",
            self.store.vertex_count(),
            self.store.path_count(),
            self.store.point_count(),
            self.store.line_count()
        );
    }

    /// Start a background save; false if I/O is already in flight
    pub fn save(&self, path: impl AsRef<Path>) -> bool {
        self.io.save(self.document(), path.as_ref().to_path_buf())
    }

    /// Start a background load; false if I/O is already in flight
    pub fn load(&self, path: impl AsRef<Path>) -> bool {
        self.io.load(path.as_ref().to_path_buf())
    }

    pub fn io(&self) -> &IoWorker {
        &self.io
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn post_status(&mut self, outcome: IoOutcome) {
        if outcome.is_ok() {
            tracing::info!("{}", outcome.message);
        } else {
            tracing::warn!("{}", outcome.message);
        }
        self.status = Some(StatusMessage::new(outcome, self.config.status_lifetime));
    }

    // ===== Clipboard =====

    /// Copy the selection; false if nothing was selected
    pub fn copy(&mut self) -> bool {
        match clipboard::copy_selection(&self.store, &self.selection) {
            Some(contents) => {
                self.clipboard = Some(contents);
                true
            }
            None => false,
        }
    }

    /// Paste at a fixed offset from the copied objects
    pub fn paste(&mut self) -> usize {
        let offset = self.config.paste_offset;
        self.paste_with(PastePlacement::Offset(Vec2::new(offset, offset)))
    }

    /// Paste so the copied objects' bounds start at `at`
    pub fn paste_at(&mut self, at: Point) -> usize {
        self.paste_with(PastePlacement::At(at))
    }

    fn paste_with(&mut self, placement: PastePlacement) -> usize {
        let Some(contents) = &self.clipboard else {
            return 0;
        };
        clipboard::paste(&mut self.store, &mut self.selection, contents, placement)
    }

    pub fn clipboard(&self) -> Option<&ClipboardContents> {
        self.clipboard.as_ref()
    }
}
