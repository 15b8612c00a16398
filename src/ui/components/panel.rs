//! Plain background panel, usually the parent of other widgets

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, StrokeAlignment};

use crate::ui::core::{Behavior, Canvas, DrawContext};
use crate::ui::styling::ColorRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Panel {
    draw_frame: bool,
}

impl Panel {
    pub const fn new() -> Self {
        Self { draw_frame: false }
    }

    /// Outline the panel with its frame color.
    pub fn with_frame(mut self, draw_frame: bool) -> Self {
        self.draw_frame = draw_frame;
        self
    }
}

impl<C: Canvas> Behavior<C> for Panel {
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
    }
}
