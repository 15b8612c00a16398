//! Text label widget
//!
//! The text is centered inside the widget's bounds, on top of the background
//! color, with an optional frame drawn around it.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, StrokeAlignment};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use super::{TEXT_CAPACITY, truncated};
use crate::ui::core::{Behavior, Canvas, DrawContext};
use crate::ui::styling::ColorRole;

/// Text size variants
///
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &embedded_graphics::mono_font::ascii::FONT_5X8,
            TextSize::Medium => &FONT_6X10,
            TextSize::Large => &embedded_graphics::mono_font::ascii::FONT_10X20,
        }
    }
}

/// Paint `text` centered in the context's bounds with the given color role.
pub(crate) fn draw_centered_text<C: Canvas>(
    cx: &mut DrawContext<'_, C>,
    text: &str,
    size: TextSize,
    role: ColorRole,
) {
    let character_style = MonoTextStyle::new(size.font(), cx.color(role));
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let center = cx.bounds().center();

    let Ok(_) =
        Text::with_text_style(text, center, character_style, text_style).draw(cx.canvas());
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: heapless::String<TEXT_CAPACITY>,
    size: TextSize,
    draw_frame: bool,
}

impl Label {
    /// Text longer than [`TEXT_CAPACITY`] bytes is truncated.
    pub fn new(text: &str) -> Self {
        Self {
            text: truncated(text),
            size: TextSize::Medium,
            draw_frame: false,
        }
    }

    pub fn with_size(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_frame(mut self, draw_frame: bool) -> Self {
        self.draw_frame = draw_frame;
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
}

impl<C: Canvas> Behavior<C> for Label {
    fn draw(&mut self, cx: &mut DrawContext<'_, C>) {
        let bounds = cx.bounds();
        let mut style =
            PrimitiveStyleBuilder::new().fill_color(cx.color(ColorRole::Background));
        if self.draw_frame {
            style = style
                .stroke_color(cx.color(ColorRole::Frame))
                .stroke_width(1)
                .stroke_alignment(StrokeAlignment::Inside);
        }
        let Ok(()) = bounds.into_styled(style.build()).draw(cx.canvas());

        draw_centered_text(cx, &self.text, self.size, ColorRole::Foreground);
    }
}
