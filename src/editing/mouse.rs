// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Mouse gesture state machine.
//!
//! The host hands the editor one [`FrameInput`] per frame. The session
//! turns its button edges into raw down / move / up events, and [`Mouse`]
//! turns those into higher level callbacks on a [`MouseDelegate`]: clicks,
//! drag start / change / end, and cancellation.

use crate::settings::pen;
use kurbo::{Point, Vec2};

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Shift or Ctrl: extend the selection instead of replacing it
    pub fn is_additive(self) -> bool {
        self.shift || self.ctrl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// One pointer event, carrying both world and canvas positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Cursor in world space
    pub pos: Point,
    /// Cursor in canvas pixels
    pub screen: Point,
    pub button: Option<MouseButton>,
    pub mods: Modifiers,
    /// Session clock (seconds) when the event happened
    pub time: f64,
}

impl MouseEvent {
    pub fn new(pos: Point, button: Option<MouseButton>) -> Self {
        Self {
            pos,
            screen: pos,
            button,
            mods: Modifiers::NONE,
            time: 0.0,
        }
    }

    pub fn with_modifiers(pos: Point, button: Option<MouseButton>, mods: Modifiers) -> Self {
        Self {
            mods,
            ..Self::new(pos, button)
        }
    }
}

/// An in-progress drag, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub start: Point,
    pub prev: Point,
    pub current: Point,
    /// Where the drag started, in canvas pixels
    pub start_screen: Point,
    /// Session time of the press that started the drag
    pub start_time: f64,
}

impl Drag {
    /// Total movement since the press
    pub fn delta(&self) -> Vec2 {
        self.current - self.start
    }

    /// Movement since the previous drag event
    pub fn step(&self) -> Vec2 {
        self.current - self.prev
    }
}

/// Receiver of mouse gesture callbacks. Every method has a no-op default.
#[allow(unused_variables)]
pub trait MouseDelegate {
    type Data;

    fn left_down(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn left_up(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    /// Press and release without a drag in between
    fn left_click(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn mouse_moved(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    /// Abort the current gesture (Escape, focus loss)
    fn cancel(&mut self, data: &mut Self::Data) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum MouseState {
    #[default]
    Up,
    Down(MouseEvent),
    Dragging(Drag),
}

/// Turns raw button events into clicks and drags
#[derive(Debug, Clone, Default)]
pub struct Mouse {
    state: MouseState,
}

impl Mouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self) -> bool {
        !matches!(self.state, MouseState::Up)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, MouseState::Dragging(_))
    }

    pub fn mouse_down<D: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        delegate: &mut D,
        data: &mut D::Data,
    ) {
        if event.button != Some(MouseButton::Left) {
            return;
        }
        self.state = MouseState::Down(event);
        delegate.left_down(event, data);
    }

    pub fn mouse_moved<D: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        delegate: &mut D,
        data: &mut D::Data,
    ) {
        match self.state {
            MouseState::Up => delegate.mouse_moved(event, data),
            MouseState::Down(press) => {
                let moved_px = (event.screen - press.screen).hypot();
                if moved_px > pen::MOUSE_DRAG_THRESHOLD {
                    let drag = Drag {
                        start: press.pos,
                        prev: press.pos,
                        current: event.pos,
                        start_screen: press.screen,
                        start_time: press.time,
                    };
                    self.state = MouseState::Dragging(drag);
                    delegate.left_drag_began(event, drag, data);
                } else {
                    delegate.mouse_moved(event, data);
                }
            }
            MouseState::Dragging(drag) => {
                let drag = Drag {
                    prev: drag.current,
                    current: event.pos,
                    ..drag
                };
                self.state = MouseState::Dragging(drag);
                delegate.left_drag_changed(event, drag, data);
            }
        }
    }

    pub fn mouse_up<D: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        delegate: &mut D,
        data: &mut D::Data,
    ) {
        match std::mem::take(&mut self.state) {
            MouseState::Up => {}
            MouseState::Down(_) => {
                delegate.left_up(event, data);
                delegate.left_click(event, data);
            }
            MouseState::Dragging(drag) => {
                let drag = Drag {
                    prev: drag.current,
                    current: event.pos,
                    ..drag
                };
                delegate.left_drag_ended(event, drag, data);
                delegate.left_up(event, data);
            }
        }
    }

    /// Abandon any gesture and tell the delegate
    pub fn cancel<D: MouseDelegate>(&mut self, delegate: &mut D, data: &mut D::Data) {
        self.state = MouseState::Up;
        delegate.cancel(data);
    }
}

// ===== Host input boundary =====

/// Per-frame snapshot of host input
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f64,
    pub cursor_ws: Point,
    pub cursor_px: Point,
    pub button_down: bool,
    pub button_pressed: bool,
    pub button_released: bool,
    pub mods: Modifiers,
    pub canvas_hovered: bool,
    /// A context menu or other modal surface has focus
    pub blocking_ui_open: bool,
    pub escape: bool,
    pub enter: bool,
    pub delete: bool,
    pub double_click: bool,
    /// Arrow-key direction for nudging (unit steps, zero when idle)
    pub nudge: Vec2,
}

impl FrameInput {
    /// A frame with the cursor at `world` (pixels equal to world units)
    pub fn at(world: Point) -> Self {
        Self {
            dt: 1.0 / 60.0,
            cursor_ws: world,
            cursor_px: world,
            canvas_hovered: true,
            ..Self::default()
        }
    }

    pub fn pressed(self) -> Self {
        Self {
            button_pressed: true,
            button_down: true,
            ..self
        }
    }

    pub fn held(self) -> Self {
        Self {
            button_down: true,
            ..self
        }
    }

    pub fn released(self) -> Self {
        Self {
            button_released: true,
            button_down: false,
            ..self
        }
    }

    pub fn with_dt(self, dt: f64) -> Self {
        Self { dt, ..self }
    }

    pub fn with_mods(self, mods: Modifiers) -> Self {
        Self { mods, ..self }
    }
}
