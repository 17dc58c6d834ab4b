//! Pointer (mouse and touch) state tracking.
//!
//! Each contact is a [`Pointer`] holding its current and previous texcoord,
//! the aspect-corrected displacement between them, and the color it paints
//! with. [`PointerTracker`] owns all live pointers for one canvas and can
//! be fed raw winit events directly.
//!
//! # Usage
//!
//! ```ignore
//! let mut tracker = PointerTracker::new(Canvas::new(800, 600)?);
//! let mut colors = ColorCycle::new();
//!
//! tracker.down(PointerId::Mouse, 400.0, 300.0, &mut colors);
//! tracker.move_to(PointerId::Mouse, 420.0, 300.0);
//!
//! for pointer in tracker.take_moved() {
//!     // turn pointer.delta into splats
//! }
//! ```

use std::collections::HashMap;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

use crate::aspect::Canvas;
use crate::color::Rgb;
use crate::color_cycle::ColorCycle;

/// Identifies a contact. Assigned by the input source, never generated here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// One mouse or touch contact.
#[derive(Clone, Debug, PartialEq)]
pub struct Pointer {
    pub id: PointerId,
    pub down: bool,
    /// Set when the last move produced a non-zero delta.
    pub moved: bool,
    /// Current position, 0.0-1.0 with Y up.
    pub texcoord: Vec2,
    /// Position before the most recent update.
    pub prev_texcoord: Vec2,
    /// Aspect-corrected `texcoord - prev_texcoord`.
    pub delta: Vec2,
    pub color: Rgb,
}

impl Pointer {
    /// A fresh pointer pressed at pixel `(x, y)`, painting with the next
    /// color from `colors`.
    pub fn on_down(id: PointerId, x: f32, y: f32, canvas: &Canvas, colors: &mut ColorCycle) -> Self {
        let texcoord = canvas.texcoord(x, y);
        Self {
            id,
            down: true,
            moved: false,
            texcoord,
            prev_texcoord: texcoord,
            delta: Vec2::ZERO,
            color: colors.next_color(),
        }
    }

    /// Move to pixel `(x, y)`. `canvas` must be the extent used for `on_down`.
    pub fn on_move(&mut self, x: f32, y: f32, canvas: &Canvas) {
        self.prev_texcoord = self.texcoord;
        self.texcoord = canvas.texcoord(x, y);
        self.delta = canvas.correction().delta(self.texcoord - self.prev_texcoord);
        self.moved = self.delta.x.abs() > 0.0 || self.delta.y.abs() > 0.0;
    }

    /// Release. Everything except `down` keeps its last value.
    pub fn on_up(&mut self) {
        self.down = false;
    }

    /// Length of the last delta.
    pub fn speed(&self) -> f32 {
        self.delta.length()
    }
}

/// All pointers on one canvas.
#[derive(Debug)]
pub struct PointerTracker {
    pointers: HashMap<PointerId, Pointer>,
    canvas: Canvas,
    // Last cursor position in pixels, needed because winit reports the
    // button press without a position. `None` until the first CursorMoved.
    cursor: Option<Vec2>,
}

impl PointerTracker {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            pointers: HashMap::new(),
            canvas,
            cursor: None,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Start a contact. Any previous record for `id` is replaced.
    pub fn down(&mut self, id: PointerId, x: f32, y: f32, colors: &mut ColorCycle) -> &Pointer {
        let pointer = Pointer::on_down(id, x, y, &self.canvas, colors);
        self.pointers.insert(id, pointer);
        &self.pointers[&id]
    }

    /// Move a known contact. Returns `None` for an id that never went down.
    pub fn move_to(&mut self, id: PointerId, x: f32, y: f32) -> Option<&Pointer> {
        let canvas = self.canvas;
        let pointer = self.pointers.get_mut(&id)?;
        pointer.on_move(x, y, &canvas);
        Some(&*pointer)
    }

    pub fn up(&mut self, id: PointerId) {
        if let Some(pointer) = self.pointers.get_mut(&id) {
            pointer.on_up();
        }
    }

    pub fn get(&self, id: PointerId) -> Option<&Pointer> {
        self.pointers.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pointer> {
        self.pointers.values()
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Snapshot every pointer that moved since the last call and clear its
    /// `moved` flag. Snapshots are ordered by id (mouse first, then touches).
    pub fn take_moved(&mut self) -> Vec<Pointer> {
        let mut moved: Vec<Pointer> = self
            .pointers
            .values_mut()
            .filter(|p| p.moved)
            .map(|p| {
                p.moved = false;
                p.clone()
            })
            .collect();
        moved.sort_by_key(|p| p.id);
        moved
    }

    /// Forget released pointers that have no pending movement.
    pub fn prune_released(&mut self) {
        self.pointers.retain(|_, p| p.down || p.moved);
    }

    /// Process a winit window event. Returns true if the event was used.
    ///
    /// Mouse movement is only tracked while the left button is held.
    pub fn handle_event(&mut self, event: &WindowEvent, colors: &mut ColorCycle) -> bool {
        match event {
            WindowEvent::Resized(size) => match Canvas::new(size.width, size.height) {
                Ok(canvas) => {
                    self.canvas = canvas;
                    true
                }
                Err(_) => {
                    log::warn!(
                        "Ignoring resize to {}x{}; keeping {}x{}",
                        size.width,
                        size.height,
                        self.canvas.width(),
                        self.canvas.height()
                    );
                    false
                }
            },

            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                self.cursor = Some(cursor);
                let held = self.get(PointerId::Mouse).is_some_and(|p| p.down);
                if held {
                    self.move_to(PointerId::Mouse, cursor.x, cursor.y);
                }
                held
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => match self.cursor {
                    Some(cursor) => {
                        self.down(PointerId::Mouse, cursor.x, cursor.y, colors);
                        true
                    }
                    None => {
                        log::debug!("Ignoring mouse press before any cursor position");
                        false
                    }
                },
                ElementState::Released => {
                    self.up(PointerId::Mouse);
                    true
                }
            },

            WindowEvent::Touch(touch) => {
                let id = PointerId::Touch(touch.id);
                let (x, y) = (touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        self.down(id, x, y, colors);
                    }
                    TouchPhase::Moved => {
                        self.move_to(id, x, y);
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => self.up(id),
                }
                true
            }

            _ => false,
        }
    }
}
