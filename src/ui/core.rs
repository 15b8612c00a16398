//! Core traits and handles shared by every widget

use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use slotmap::new_key_type;

use crate::touch::TouchState;
use crate::ui::styling::{ColorRole, Palette};

new_key_type! {
    /// Stable handle to a widget registered with a [`Display`](crate::ui::Display).
    ///
    /// Handles stay valid while the tree around the widget changes and become
    /// stale once the widget is destroyed. Lookups through a stale handle fail
    /// with [`WidgetError::UnknownWidget`](crate::WidgetError::UnknownWidget).
    pub struct WidgetId;
}

/// Paint target for widgets.
///
/// Widgets draw into RAM (see [`FrameBuffer`](crate::FrameBuffer)), so the
/// target can never fail mid-frame.
pub trait Canvas: DrawTarget<Color = Rgb565, Error = Infallible> {}

impl<T> Canvas for T where T: DrawTarget<Color = Rgb565, Error = Infallible> {}

/// Which widget container an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The display's top-level container
    Root,
    /// The child container embedded in a widget
    Widget(WidgetId),
}

impl From<WidgetId> for Owner {
    fn from(id: WidgetId) -> Self {
        Owner::Widget(id)
    }
}

/// Per-kind paint and per-frame logic.
///
/// The engine decides *when* these run; implementors only decide *what* to
/// do. `draw` must paint the widget's full visible content inside
/// [`DrawContext::bounds`]. `update` runs once per tick for visible widgets
/// and should not paint.
pub trait Behavior<C: Canvas> {
    fn draw(&mut self, cx: &mut DrawContext<'_, C>);

    fn update(&mut self, _cx: &mut UpdateContext<'_>) {}
}

/// Everything a widget may touch while painting itself
pub struct DrawContext<'a, C: Canvas> {
    pub(crate) id: WidgetId,
    pub(crate) canvas: &'a mut C,
    pub(crate) bounds: Rectangle,
    pub(crate) palette: &'a Palette,
    pub(crate) pending: &'a mut Vec<WidgetId>,
}

impl<'a, C: Canvas> DrawContext<'a, C> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn palette(&self) -> &Palette {
        self.palette
    }

    pub fn color(&self, role: ColorRole) -> Rgb565 {
        self.palette.get(role)
    }

    pub fn canvas(&mut self) -> &mut C {
        self.canvas
    }

    pub fn fill_rect(&mut self, area: Rectangle, color: Rgb565) {
        let Ok(()) = self.canvas.fill_solid(&area, color);
    }

    /// Ask for another paint on the next traversal.
    ///
    /// Validation clears the invalidated flag after `draw` returns, so a
    /// direct self-invalidation here would be lost.
    pub fn request_redraw(&mut self) {
        self.pending.push(self.id);
    }

    /// Invalidate another widget on the next traversal.
    pub fn invalidate_widget(&mut self, id: WidgetId) {
        self.pending.push(id);
    }
}

/// Everything a widget may touch during its per-frame update
pub struct UpdateContext<'a> {
    pub(crate) id: WidgetId,
    pub(crate) bounds: Rectangle,
    pub(crate) palette: &'a Palette,
    pub(crate) touch: &'a TouchState,
    pub(crate) invalidated: &'a mut bool,
    pub(crate) pending: &'a mut Vec<WidgetId>,
}

impl<'a> UpdateContext<'a> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn palette(&self) -> &Palette {
        self.palette
    }

    pub fn touch(&self) -> &TouchState {
        self.touch
    }

    // Update only runs for visible widgets, so no visibility check here.

    pub fn is_touched(&self) -> bool {
        self.touch.is_touched(self.bounds)
    }

    pub fn is_touch_enter(&self) -> bool {
        self.touch.is_touch_enter(self.bounds)
    }

    pub fn is_touch_leave(&self) -> bool {
        self.touch.is_touch_leave(self.bounds)
    }

    pub fn is_clicked(&self) -> bool {
        self.touch.is_touch_clicked(self.bounds)
    }

    pub fn is_touch_change(&self) -> bool {
        self.touch.is_touch_change(self.bounds)
    }

    /// Mark this widget invalidated; the draw pass of the same tick repaints it.
    pub fn invalidate(&mut self) {
        *self.invalidated = true;
    }

    /// Invalidate another widget on the next traversal.
    pub fn invalidate_widget(&mut self, id: WidgetId) {
        self.pending.push(id);
    }
}
