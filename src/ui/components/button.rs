//! Push button widget
//!
//! The button tracks its pressed state from touch enter/leave edges during
//! the update pass and latches a click when a press that started on it is
//! released on it. The host collects clicks with [`Button::take_clicked`].

use core::mem;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, RoundedRectangle, StrokeAlignment};
use log::debug;

use super::label::{TextSize, draw_centered_text};
use super::{TEXT_CAPACITY, truncated};
use crate::ui::core::{Behavior, Canvas, DrawContext, UpdateContext};
use crate::ui::styling::ColorRole;

/// Corner radius of the button face.
const CORNER_RADIUS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    text: heapless::String<TEXT_CAPACITY>,
    size: TextSize,
    pressed: bool,
    clicked: bool,
}

impl Button {
    pub fn new(text: &str) -> Self {
        Self {
            text: truncated(text),
            size: TextSize::Medium,
            pressed: false,
            clicked: false,
        }
    }

    pub fn with_size(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the text changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        let new_text = truncated(text);
        if self.text != new_text {
            self.text = new_text;
            true
        } else {
            false
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether a click happened since the last call.
    pub fn take_clicked(&mut self) -> bool {
        mem::take(&mut self.clicked)
    }
}

impl<C: Canvas> Behavior<C> for Button {
    fn draw(&mut self, cx: &mut DrawContext<'_, C>) {
        let bounds = cx.bounds();
        let face = if self.pressed {
            ColorRole::Highlight
        } else {
            ColorRole::Content
        };

        // Corners outside the rounded face show the background
        cx.fill_rect(bounds, cx.color(ColorRole::Background));

        let style = PrimitiveStyleBuilder::new()
            .fill_color(cx.color(face))
            .stroke_color(cx.color(ColorRole::Frame))
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        let corner = Size::new(CORNER_RADIUS, CORNER_RADIUS);
        let Ok(()) = RoundedRectangle::with_equal_corners(bounds, corner)
            .into_styled(style)
            .draw(cx.canvas());

        draw_centered_text(cx, &self.text, self.size, ColorRole::Foreground);
    }

    fn update(&mut self, cx: &mut UpdateContext<'_>) {
        if cx.is_touch_enter() {
            self.pressed = true;
            cx.invalidate();
        } else if cx.is_touch_leave() {
            self.pressed = false;
            cx.invalidate();
        }

        if cx.is_clicked() {
            debug!("Button '{}' clicked", self.text);
            self.clicked = true;
        }
    }
}
