//! A single node of the widget tree
//!
//! A [`Widget`] holds geometry, the visibility state machine, its palette and
//! an embedded [`WidgetContainer`] of children. What it looks like is decided
//! by its [`WidgetKind`]; when it gets repainted is decided by the container
//! traversal in [`Display`](crate::ui::Display).
//!
//! # Validation state machine
//!
//! | drawing disabled | visible | drawn | on validation                    |
//! |------------------|---------|-------|----------------------------------|
//! | yes              | any     | any   | nothing, stays invalidated       |
//! | no               | yes     | any   | paint, drawn = true              |
//! | no               | no      | yes   | erase, drawn = false             |
//! | no               | no      | no    | only clears invalidated          |

use alloc::boxed::Box;
use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

use crate::error::{WidgetError, WidgetResult};
use crate::touch::TouchState;
use crate::ui::components::{Button, Label, Panel};
use crate::ui::container::WidgetContainer;
use crate::ui::core::{Behavior, Canvas, DrawContext, UpdateContext, WidgetId};
use crate::ui::styling::{ColorRole, Palette};

/// Size of a freshly created widget.
pub const DEFAULT_WIDGET_SIZE: Size = Size::new(64, 64);

/// Visibility flags of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    /// The widget is meant to be shown
    pub visible: bool,
    /// The widget was painted by the last validation
    pub drawn: bool,
    /// Paint and erase side effects are suppressed
    pub drawing_disabled: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            visible: true,
            drawn: false,
            drawing_disabled: false,
        }
    }
}

/// What a validation pass did to a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Drawing is disabled; nothing changed
    Skipped,
    /// The draw hook ran
    Painted,
    /// The widget's bounds were filled with its background
    Erased,
    /// Hidden and already erased; only the invalidated flag was cleared
    Unchanged,
}

/// The closed set of widget kinds, plus an escape hatch for application widgets
pub enum WidgetKind<C: Canvas> {
    Panel(Panel),
    Label(Label),
    Button(Button),
    Custom(Box<dyn Behavior<C>>),
}

impl<C: Canvas> WidgetKind<C> {
    pub fn custom(behavior: impl Behavior<C> + 'static) -> Self {
        WidgetKind::Custom(Box::new(behavior))
    }

    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Panel(_) => "panel",
            WidgetKind::Label(_) => "label",
            WidgetKind::Button(_) => "button",
            WidgetKind::Custom(_) => "custom",
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            WidgetKind::Button(button) => Some(button),
            _ => None,
        }
    }
}

impl<C: Canvas> Behavior<C> for WidgetKind<C> {
    fn draw(&mut self, cx: &mut DrawContext<'_, C>) {
        match self {
            WidgetKind::Panel(panel) => panel.draw(cx),
            WidgetKind::Label(label) => label.draw(cx),
            WidgetKind::Button(button) => button.draw(cx),
            WidgetKind::Custom(behavior) => behavior.draw(cx),
        }
    }

    fn update(&mut self, cx: &mut UpdateContext<'_>) {
        match self {
            WidgetKind::Panel(panel) => Behavior::<C>::update(panel, cx),
            WidgetKind::Label(label) => Behavior::<C>::update(label, cx),
            WidgetKind::Button(button) => Behavior::<C>::update(button, cx),
            WidgetKind::Custom(behavior) => behavior.update(cx),
        }
    }
}

impl<C: Canvas> From<Panel> for WidgetKind<C> {
    fn from(panel: Panel) -> Self {
        WidgetKind::Panel(panel)
    }
}

impl<C: Canvas> From<Label> for WidgetKind<C> {
    fn from(label: Label) -> Self {
        WidgetKind::Label(label)
    }
}

impl<C: Canvas> From<Button> for WidgetKind<C> {
    fn from(button: Button) -> Self {
        WidgetKind::Button(button)
    }
}

/// A visual node with an embedded child container
pub struct Widget<C: Canvas> {
    bounds: Rectangle,
    visibility: Visibility,
    invalidated: bool,
    palette: Palette,
    pub(crate) children: WidgetContainer,
    kind: WidgetKind<C>,
}

impl<C: Canvas> Widget<C> {
    /// A visible, invalidated 64x64 widget at the origin.
    pub(crate) fn new(kind: WidgetKind<C>, palette: Palette) -> Self {
        Self {
            bounds: Rectangle::new(Point::zero(), DEFAULT_WIDGET_SIZE),
            visibility: Visibility::default(),
            invalidated: true,
            palette,
            children: WidgetContainer::new(),
            kind,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Replace the geometry. Always invalidates, even if unchanged.
    pub fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
        self.invalidate();
    }

    pub fn set_size(&mut self, size: Size) {
        self.bounds.size = size;
        self.invalidate();
    }

    pub fn set_position(&mut self, top_left: Point) {
        self.bounds.top_left = top_left;
        self.invalidate();
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Show or hide the widget on the next validation.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visibility.visible != visible {
            self.visibility.visible = visible;
            self.invalidate();
        }
    }

    /// Gate paint and erase side effects without touching the invalidated flag.
    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        self.visibility.drawing_disabled = !enabled;
    }

    pub fn is_drawing_enabled(&self) -> bool {
        !self.visibility.drawing_disabled
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.visible
    }

    pub fn is_drawn(&self) -> bool {
        self.visibility.drawn
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn color(&self, role: ColorRole) -> Rgb565 {
        self.palette.get(role)
    }

    /// Palette update without cascading; see `Display::set_color`.
    pub(crate) fn apply_color(&mut self, role: ColorRole, color: Rgb565) {
        self.palette.set(role, color);
        self.invalidate();
    }

    pub fn children(&self) -> &WidgetContainer {
        &self.children
    }

    pub fn kind(&self) -> &WidgetKind<C> {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut WidgetKind<C> {
        &mut self.kind
    }

    /// Current text of a label or button.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            WidgetKind::Label(label) => Some(label.text()),
            WidgetKind::Button(button) => Some(button.text()),
            _ => None,
        }
    }

    /// Change the text of a label or button, invalidating only on change.
    pub fn set_text(&mut self, text: &str) -> WidgetResult<()> {
        let changed = match &mut self.kind {
            WidgetKind::Label(label) => label.set_text(text),
            WidgetKind::Button(button) => button.set_text(text),
            _ => return Err(WidgetError::NoText),
        };
        if changed {
            self.invalidate();
        }
        Ok(())
    }

    // Touch queries are false while hidden and otherwise hit-test the bounds.

    pub fn is_touched(&self, touch: &TouchState) -> bool {
        self.is_visible() && touch.is_touched(self.bounds)
    }

    pub fn is_touch_enter(&self, touch: &TouchState) -> bool {
        self.is_visible() && touch.is_touch_enter(self.bounds)
    }

    pub fn is_touch_leave(&self, touch: &TouchState) -> bool {
        self.is_visible() && touch.is_touch_leave(self.bounds)
    }

    pub fn is_clicked(&self, touch: &TouchState) -> bool {
        self.is_visible() && touch.is_touch_clicked(self.bounds)
    }

    pub fn is_touch_change(&self, touch: &TouchState) -> bool {
        self.is_visible() && touch.is_touch_change(self.bounds)
    }

    /// Resolve an invalidated widget: paint it, erase it, or just mark it clean.
    pub(crate) fn draw_validate(
        &mut self,
        id: WidgetId,
        canvas: &mut C,
        pending: &mut Vec<WidgetId>,
    ) -> Validation {
        if self.visibility.drawing_disabled {
            return Validation::Skipped;
        }

        let outcome = if self.visibility.visible {
            self.visibility.drawn = true;
            let mut cx = DrawContext {
                id,
                canvas,
                bounds: self.bounds,
                palette: &self.palette,
                pending,
            };
            self.kind.draw(&mut cx);
            Validation::Painted
        } else if self.visibility.drawn {
            self.visibility.drawn = false;
            self.undraw(canvas);
            Validation::Erased
        } else {
            Validation::Unchanged
        };

        self.invalidated = false;
        trace!("Validated {} widget: {:?}", self.kind.name(), outcome);
        outcome
    }

    /// Run the per-frame update hook.
    pub(crate) fn run_update(
        &mut self,
        id: WidgetId,
        touch: &TouchState,
        pending: &mut Vec<WidgetId>,
    ) {
        let mut cx = UpdateContext {
            id,
            bounds: self.bounds,
            palette: &self.palette,
            touch,
            invalidated: &mut self.invalidated,
            pending,
        };
        self.kind.update(&mut cx);
    }

    /// Erase a painted widget that is leaving its container.
    ///
    /// The widget is left invalidated, so it gets painted again if it is
    /// still (or later) attached somewhere. Returns whether anything was
    /// erased.
    pub(crate) fn erase_if_drawn(&mut self, canvas: &mut C) -> bool {
        if self.visibility.drawn && !self.visibility.drawing_disabled {
            self.visibility.drawn = false;
            self.undraw(canvas);
            self.invalidate();
            true
        } else {
            false
        }
    }

    fn undraw(&self, canvas: &mut C) {
        let background = self.palette.get(ColorRole::Background);
        let Ok(()) = canvas.fill_solid(&self.bounds, background);
    }
}
