//! Touch input state with per-frame edge detection
//!
//! The host samples the touch controller once per frame and feeds the result
//! to [`TouchState::feed`]. Widgets then ask rectangle questions (is it
//! touched, did the finger just enter or leave it, was it clicked) against
//! the last two samples. None of the queries latch anything; they are pure
//! functions of the current and previous sample.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Represents a 2D touch point on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }
}

/// Last two touch samples plus the point where the current press began
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchState {
    current: Option<TouchPoint>,
    previous: Option<TouchPoint>,
    pressed_at: Option<TouchPoint>,
}

impl TouchState {
    pub const fn new() -> Self {
        Self {
            current: None,
            previous: None,
            pressed_at: None,
        }
    }

    /// Record this frame's sample; `None` means no finger on the panel.
    pub fn feed(&mut self, sample: Option<TouchPoint>) {
        self.previous = self.current;
        match (self.previous, sample) {
            (None, Some(point)) => self.pressed_at = Some(point),
            // The press origin survives the release frame so clicks resolve.
            (None, None) => self.pressed_at = None,
            _ => {}
        }
        self.current = sample;
    }

    pub fn current(&self) -> Option<TouchPoint> {
        self.current
    }

    pub fn previous(&self) -> Option<TouchPoint> {
        self.previous
    }

    pub fn pressed_at(&self) -> Option<TouchPoint> {
        self.pressed_at
    }

    pub fn is_pressed(&self) -> bool {
        self.current.is_some()
    }

    fn inside(point: Option<TouchPoint>, area: Rectangle) -> bool {
        point.is_some_and(|p| area.contains(p.to_point()))
    }

    /// The finger is currently within `area`.
    pub fn is_touched(&self, area: Rectangle) -> bool {
        Self::inside(self.current, area)
    }

    /// The finger moved into `area` (or pressed down inside it) this frame.
    pub fn is_touch_enter(&self, area: Rectangle) -> bool {
        Self::inside(self.current, area) && !Self::inside(self.previous, area)
    }

    /// The finger moved out of `area` (or was lifted inside it) this frame.
    pub fn is_touch_leave(&self, area: Rectangle) -> bool {
        Self::inside(self.previous, area) && !Self::inside(self.current, area)
    }

    /// A press that started inside `area` was released inside it this frame.
    pub fn is_touch_clicked(&self, area: Rectangle) -> bool {
        self.current.is_none()
            && Self::inside(self.previous, area)
            && Self::inside(self.pressed_at, area)
    }

    pub fn is_touch_change(&self, area: Rectangle) -> bool {
        self.is_touch_enter(area) || self.is_touch_leave(area)
    }
}
