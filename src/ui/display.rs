//! Widget registry, top-level container and frame traversal
//!
//! The [`Display`] owns every widget (in a slotmap arena), the top-level
//! [`WidgetContainer`], the touch state and the canvas widgets paint into.
//! Containers hold [`WidgetId`] handles only, so destroying a widget can
//! always detach it from every container that still refers to it.
//!
//! # Frame traversal
//!
//! The host calls [`Display::update_widgets`] (or [`Display::tick`]) once per
//! frame:
//!
//! 1. **Update pass**: for each visible child in order, update its own
//!    children depth-first, then run its update hook. Hidden subtrees are
//!    skipped entirely.
//! 2. **Draw pass**: for each child in order, note whether it is invalidated
//!    (or a redraw is forced), bring its children up to date, then validate
//!    it. If it ends up visible, its children are repainted once more,
//!    forced, because the parent's paint may have covered them.
//!
//! Invalidations a hook requests for other widgets (and `request_redraw`
//! from a draw hook) are applied after the traversal returns, so they are
//! honored by the next call.

use alloc::vec::Vec;
use core::mem;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;
use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::config::DisplayConfig;
use crate::error::{WidgetError, WidgetResult};
use crate::touch::{TouchPoint, TouchState};
use crate::ui::container::WidgetContainer;
use crate::ui::core::{Canvas, Owner, WidgetId};
use crate::ui::styling::ColorRole;
use crate::ui::widget::{Widget, WidgetKind};

pub struct Display<C: Canvas> {
    canvas: C,
    config: DisplayConfig,
    widgets: SlotMap<WidgetId, Widget<C>>,
    root: WidgetContainer,
    touch: TouchState,
    pending: Vec<WidgetId>,
}

impl<C: Canvas> Display<C> {
    /// Create a display with the default configuration.
    pub fn new(canvas: C) -> Self {
        Self::with_config(canvas, DisplayConfig::default())
    }

    pub fn with_config(canvas: C, config: DisplayConfig) -> Self {
        let mut root = WidgetContainer::new();
        root.set_owns_widgets(config.owns_widgets);

        Self {
            canvas,
            config,
            widgets: SlotMap::with_key(),
            root,
            touch: TouchState::new(),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Full-screen bounding rectangle.
    pub fn bounds(&self) -> Rectangle {
        self.config.bounds()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Tear down the tree without painting and hand back the canvas.
    pub fn into_canvas(mut self) -> C {
        self.clear_silent();
        self.canvas
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Register a new widget: 64x64 at the origin, visible, invalidated,
    /// with the theme palette. It is not attached to any container yet.
    pub fn create_widget(&mut self, kind: impl Into<WidgetKind<C>>) -> WidgetId {
        let widget = Widget::new(kind.into(), self.config.palette());
        let name = widget.kind().name();
        let id = self.widgets.insert(widget);
        debug!("Created {} widget {:?}", name, id);
        id
    }

    /// Number of live widgets, attached or not.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn widget(&self, id: WidgetId) -> WidgetResult<&Widget<C>> {
        self.widgets.get(id).ok_or(WidgetError::UnknownWidget)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> WidgetResult<&mut Widget<C>> {
        self.widgets.get_mut(id).ok_or(WidgetError::UnknownWidget)
    }

    pub fn invalidate(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.widget_mut(id)?.invalidate();
        Ok(())
    }

    /// Invalidate every live widget, e.g. after the host cleared the screen.
    pub fn invalidate_all(&mut self) {
        for widget in self.widgets.values_mut() {
            widget.invalidate();
        }
    }

    /// Set a palette entry on a widget and, identically, on all of its
    /// descendants. Each widget touched is invalidated.
    pub fn set_color(&mut self, id: WidgetId, role: ColorRole, color: Rgb565) -> WidgetResult<()> {
        let widget = self.widget_mut(id)?;
        widget.apply_color(role, color);

        let mut index = 0;
        while let Some(child) = self.child_at(Owner::Widget(id), index) {
            index += 1;
            self.set_color(child, role, color)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Touch
    // ------------------------------------------------------------------

    /// Feed this frame's touch sample; call before [`update_widgets`](Self::update_widgets).
    pub fn set_touch(&mut self, sample: Option<TouchPoint>) {
        self.touch.feed(sample);
    }

    pub fn touch(&self) -> &TouchState {
        &self.touch
    }

    pub fn is_touched(&self, id: WidgetId) -> WidgetResult<bool> {
        Ok(self.widget(id)?.is_touched(&self.touch))
    }

    pub fn is_touch_enter(&self, id: WidgetId) -> WidgetResult<bool> {
        Ok(self.widget(id)?.is_touch_enter(&self.touch))
    }

    pub fn is_touch_leave(&self, id: WidgetId) -> WidgetResult<bool> {
        Ok(self.widget(id)?.is_touch_leave(&self.touch))
    }

    pub fn is_clicked(&self, id: WidgetId) -> WidgetResult<bool> {
        Ok(self.widget(id)?.is_clicked(&self.touch))
    }

    pub fn is_touch_change(&self, id: WidgetId) -> WidgetResult<bool> {
        Ok(self.widget(id)?.is_touch_change(&self.touch))
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    /// Read-only view of a container.
    pub fn container(&self, owner: Owner) -> WidgetResult<&WidgetContainer> {
        match owner {
            Owner::Root => Ok(&self.root),
            Owner::Widget(id) => Ok(&self.widget(id)?.children),
        }
    }

    fn container_mut(&mut self, owner: Owner) -> WidgetResult<&mut WidgetContainer> {
        match owner {
            Owner::Root => Ok(&mut self.root),
            Owner::Widget(id) => Ok(&mut self.widget_mut(id)?.children),
        }
    }

    fn child_at(&self, owner: Owner, index: usize) -> Option<WidgetId> {
        self.container(owner).ok()?.as_slice().get(index).copied()
    }

    pub fn widget_count(&self, owner: Owner) -> WidgetResult<usize> {
        Ok(self.container(owner)?.len())
    }

    pub fn capacity(&self, owner: Owner) -> WidgetResult<usize> {
        Ok(self.container(owner)?.capacity())
    }

    /// Handle at `index` of a container; fails with `IndexOutOfRange` past the end.
    pub fn widget_at(&self, owner: Owner, index: usize) -> WidgetResult<WidgetId> {
        self.container(owner)?.get(index)
    }

    pub fn set_owns_widgets(&mut self, owner: Owner, owns: bool) -> WidgetResult<()> {
        self.container_mut(owner)?.set_owns_widgets(owns);
        Ok(())
    }

    /// Append a widget to the top-level container.
    pub fn add_widget(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.add_to(Owner::Root, id)
    }

    /// Append `child` to `parent`'s embedded container.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> WidgetResult<()> {
        self.add_to(Owner::Widget(parent), child)
    }

    pub fn add_to(&mut self, owner: Owner, id: WidgetId) -> WidgetResult<()> {
        if !self.contains(id) {
            return Err(WidgetError::UnknownWidget);
        }
        if let Owner::Widget(parent) = owner
            && self.is_in_subtree(id, parent)
        {
            return Err(WidgetError::CircularParentage);
        }

        self.container_mut(owner)?.push(id)?;
        debug!("Added widget {:?} to {:?}", id, owner);
        Ok(())
    }

    /// Whether `target` is `root` or one of its descendants.
    fn is_in_subtree(&self, root: WidgetId, target: WidgetId) -> bool {
        let mut stack = Vec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if let Some(widget) = self.widgets.get(id) {
                stack.extend(widget.children.iter());
            }
        }
        false
    }

    /// Remove a widget from the top-level container.
    pub fn remove_widget(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.remove_from(Owner::Root, id)
    }

    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> WidgetResult<()> {
        self.remove_from(Owner::Widget(parent), child)
    }

    /// Remove every occurrence of `id` from a container, keeping the order
    /// of the rest, then evict it: erase it if painted, and destroy it if
    /// the container owns its widgets.
    pub fn remove_from(&mut self, owner: Owner, id: WidgetId) -> WidgetResult<()> {
        let container = self.container_mut(owner)?;
        let owns = container.owns_widgets();
        let removed = container.take_matching(id);
        if removed == 0 {
            warn!("Widget {:?} is not in {:?}", id, owner);
            return Ok(());
        }

        debug!("Removed widget {:?} from {:?} ({} occurrences)", id, owner, removed);
        self.evict(id, owns);
        Ok(())
    }

    /// Evict every widget of the top-level container.
    pub fn clear_widgets(&mut self) {
        self.clear_evicting(Owner::Root);
    }

    pub fn clear_children(&mut self, parent: WidgetId) -> WidgetResult<()> {
        if !self.contains(parent) {
            return Err(WidgetError::UnknownWidget);
        }
        self.clear_evicting(Owner::Widget(parent));
        Ok(())
    }

    fn clear_evicting(&mut self, owner: Owner) {
        let Ok(container) = self.container_mut(owner) else {
            return;
        };
        let owns = container.owns_widgets();
        let evicted = container.take_all();
        debug!("Clearing {} widgets from {:?}", evicted.len(), owner);

        for id in evicted {
            self.evict(id, owns);
        }
    }

    /// Empty the top-level container without painting, destroying owned widgets.
    ///
    /// Meant for tearing the display down, when nothing should reach the panel.
    pub fn clear_silent(&mut self) {
        self.clear_silent_in(Owner::Root);
    }

    pub fn clear_children_silent(&mut self, parent: WidgetId) -> WidgetResult<()> {
        if !self.contains(parent) {
            return Err(WidgetError::UnknownWidget);
        }
        self.clear_silent_in(Owner::Widget(parent));
        Ok(())
    }

    fn clear_silent_in(&mut self, owner: Owner) {
        let Ok(container) = self.container_mut(owner) else {
            return;
        };
        let owns = container.owns_widgets();
        let evicted = container.take_all();
        if owns {
            for id in evicted {
                self.destroy_silent(id);
            }
        }
    }

    fn evict(&mut self, id: WidgetId, owns: bool) {
        if let Some(widget) = self.widgets.get_mut(id)
            && widget.erase_if_drawn(&mut self.canvas)
        {
            trace!("Erased evicted widget {:?}", id);
        }
        if owns {
            self.destroy_silent(id);
        }
    }

    /// Destroy a widget: erase it if it is painted, destroy its owned
    /// children without painting, detach it from every container and free
    /// its handle.
    pub fn destroy_widget(&mut self, id: WidgetId) -> WidgetResult<()> {
        let widget = self.widgets.get_mut(id).ok_or(WidgetError::UnknownWidget)?;
        widget.erase_if_drawn(&mut self.canvas);
        self.destroy_silent(id);
        Ok(())
    }

    fn destroy_silent(&mut self, id: WidgetId) {
        let Some(widget) = self.widgets.get_mut(id) else {
            return;
        };
        let owns_children = widget.children.owns_widgets();
        let children = widget.children.take_all();
        if owns_children {
            for child in children {
                self.destroy_silent(child);
            }
        }

        self.detach_everywhere(id);
        self.pending.retain(|pending| *pending != id);
        if let Some(widget) = self.widgets.remove(id) {
            debug!("Destroyed {} widget {:?}", widget.kind().name(), id);
        }
    }

    /// Drop every container reference to `id`.
    fn detach_everywhere(&mut self, id: WidgetId) {
        self.root.take_matching(id);
        for widget in self.widgets.values_mut() {
            widget.children.take_matching(id);
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Update and repaint whatever changed since the last frame.
    pub fn tick(&mut self) {
        self.update_widgets(true, true, false);
    }

    /// Run the update and/or draw pass over the top-level container.
    pub fn update_widgets(&mut self, update: bool, draw: bool, force_redraw: bool) {
        self.traverse(Owner::Root, update, draw, force_redraw);
    }

    /// Run the update and/or draw pass over one widget's children only.
    pub fn update_children(
        &mut self,
        parent: WidgetId,
        update: bool,
        draw: bool,
        force_redraw: bool,
    ) -> WidgetResult<()> {
        if !self.contains(parent) {
            return Err(WidgetError::UnknownWidget);
        }
        self.traverse(Owner::Widget(parent), update, draw, force_redraw);
        Ok(())
    }

    fn traverse(&mut self, owner: Owner, update: bool, draw: bool, force_redraw: bool) {
        if update {
            self.update_pass(owner);
        }
        if draw {
            self.draw_pass(owner, force_redraw);
        }
        self.apply_pending();
    }

    fn update_pass(&mut self, owner: Owner) {
        let mut index = 0;
        while let Some(id) = self.child_at(owner, index) {
            index += 1;
            if !self.widgets.get(id).is_some_and(|w| w.is_visible()) {
                continue;
            }

            self.update_pass(Owner::Widget(id));
            if let Some(widget) = self.widgets.get_mut(id) {
                widget.run_update(id, &self.touch, &mut self.pending);
            }
        }
    }

    fn draw_pass(&mut self, owner: Owner, force_redraw: bool) {
        let mut index = 0;
        while let Some(id) = self.child_at(owner, index) {
            index += 1;
            let Some(widget) = self.widgets.get(id) else {
                continue;
            };
            let invalidated = force_redraw || widget.is_invalidated();

            // Children first, so a parent's dirty check sees them current
            self.draw_pass(Owner::Widget(id), false);

            if invalidated {
                let Some(widget) = self.widgets.get_mut(id) else {
                    continue;
                };
                widget.draw_validate(id, &mut self.canvas, &mut self.pending);
                if widget.is_visible() {
                    // The parent's paint may have covered its children
                    self.draw_pass(Owner::Widget(id), true);
                }
            }
        }
    }

    fn apply_pending(&mut self) {
        for id in mem::take(&mut self.pending) {
            if let Some(widget) = self.widgets.get_mut(id) {
                widget.invalidate();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, Log, Recorder, RecordingCanvas, new_log};
    use crate::ui::core::{Behavior, DrawContext, UpdateContext};
    use crate::ui::styling::Palette;
    use embedded_graphics::prelude::*;

    fn display() -> Display<RecordingCanvas> {
        Display::new(RecordingCanvas::new())
    }

    fn recorder(display: &mut Display<RecordingCanvas>, name: &'static str, log: &Log) -> WidgetId {
        display.create_widget(WidgetKind::custom(Recorder::new(name, log)))
    }

    fn draws(log: &Log) -> Vec<&'static str> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Draw(name) => Some(*name),
                Event::Update(_) => None,
            })
            .collect()
    }

    fn updates(log: &Log) -> Vec<&'static str> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Update(name) => Some(*name),
                Event::Draw(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_default_widget_scenario() {
        let mut display = display();
        let log = new_log();
        let w = recorder(&mut display, "w", &log);
        display.add_widget(w).unwrap();

        display.update_widgets(false, true, false);
        let widget = display.widget(w).unwrap();
        assert!(widget.is_drawn());
        assert!(!widget.is_invalidated());
        assert_eq!(draws(&log), ["w"]);

        display.widget_mut(w).unwrap().set_visible(false);
        assert!(display.widget(w).unwrap().is_invalidated());
        assert!(display.widget(w).unwrap().is_drawn());

        display.update_widgets(false, true, false);
        display.update_widgets(false, true, false);
        let widget = display.widget(w).unwrap();
        assert!(!widget.is_drawn());
        assert!(!widget.is_invalidated());
        assert_eq!(draws(&log), ["w"], "exactly one paint");

        let area = Rectangle::new(Point::zero(), Size::new(64, 64));
        assert_eq!(display.canvas().fills.len(), 1);
        assert_eq!(display.canvas().fills_of(area), 1, "exactly one erase");
    }

    #[test]
    fn test_clean_tree_is_not_repainted() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        let b = recorder(&mut display, "b", &log);
        display.add_widget(a).unwrap();
        display.add_widget(b).unwrap();

        display.tick();
        display.tick();
        display.tick();
        assert_eq!(draws(&log), ["a", "b"]);

        display.invalidate(b).unwrap();
        display.tick();
        assert_eq!(draws(&log), ["a", "b", "b"]);
    }

    #[test]
    fn test_children_drawn_before_and_after_parent() {
        let mut display = display();
        let log = new_log();
        let parent = recorder(&mut display, "parent", &log);
        let child = recorder(&mut display, "child", &log);
        let grandchild = recorder(&mut display, "grandchild", &log);
        display.add_widget(parent).unwrap();
        display.add_child(parent, child).unwrap();
        display.add_child(child, grandchild).unwrap();

        // First frame: everything is invalidated
        display.update_widgets(false, true, false);
        assert_eq!(
            draws(&log),
            ["grandchild", "child", "grandchild", "parent", "child", "grandchild"]
        );

        log.borrow_mut().clear();

        // Only the child is dirty: its children are not dirty before it, and
        // are forced after it
        display.invalidate(child).unwrap();
        display.update_widgets(false, true, false);
        assert_eq!(draws(&log), ["child", "grandchild"]);

        log.borrow_mut().clear();

        // A dirty grandchild is brought up to date before the child validates
        display.invalidate(child).unwrap();
        display.invalidate(grandchild).unwrap();
        display.update_widgets(false, true, false);
        assert_eq!(draws(&log), ["grandchild", "child", "grandchild"]);
    }

    #[test]
    fn test_hidden_parent_children_not_forced() {
        let mut display = display();
        let log = new_log();
        let parent = recorder(&mut display, "parent", &log);
        let child = recorder(&mut display, "child", &log);
        display.add_widget(parent).unwrap();
        display.add_child(parent, child).unwrap();
        display.tick();
        log.borrow_mut().clear();

        display.widget_mut(parent).unwrap().set_visible(false);
        display.tick();

        assert!(draws(&log).is_empty());
        assert!(!display.widget(parent).unwrap().is_drawn());
        assert_eq!(display.canvas().fills.len(), 1, "parent erased once");
    }

    #[test]
    fn test_update_pass_depth_first_and_skips_hidden() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        let a1 = recorder(&mut display, "a1", &log);
        let b = recorder(&mut display, "b", &log);
        let b1 = recorder(&mut display, "b1", &log);
        display.add_widget(a).unwrap();
        display.add_child(a, a1).unwrap();
        display.add_widget(b).unwrap();
        display.add_child(b, b1).unwrap();

        display.widget_mut(b).unwrap().set_visible(false);
        display.update_widgets(true, false, false);

        assert_eq!(updates(&log), ["a1", "a"]);
        assert!(draws(&log).is_empty(), "update-only traversal never paints");
    }

    #[test]
    fn test_set_color_cascades() {
        let mut display = display();
        let parent = display.create_widget(crate::ui::Panel::new());
        let children: Vec<WidgetId> = (0..3)
            .map(|_| display.create_widget(crate::ui::Panel::new()))
            .collect();
        for child in &children {
            display.add_child(parent, *child).unwrap();
        }
        let grandchild = display.create_widget(crate::ui::Panel::new());
        display.add_child(children[0], grandchild).unwrap();
        display.add_widget(parent).unwrap();
        display.tick();

        let red = Rgb565::new(31, 0, 0);
        display.set_color(parent, ColorRole::Frame, red).unwrap();

        for id in [parent, children[0], children[1], children[2], grandchild] {
            let widget = display.widget(id).unwrap();
            assert_eq!(widget.color(ColorRole::Frame), red);
            assert_eq!(
                widget.color(ColorRole::Background),
                Palette::default().get(ColorRole::Background)
            );
            assert!(widget.is_invalidated());
        }
    }

    #[test]
    fn test_capacity_tracks_length() {
        let mut display = display();
        let log = new_log();
        let ids: Vec<WidgetId> = (0..5).map(|_| recorder(&mut display, "w", &log)).collect();

        for id in &ids {
            display.add_widget(*id).unwrap();
            let root = display.container(Owner::Root).unwrap();
            assert_eq!(root.capacity(), root.len());
        }

        display.remove_widget(ids[2]).unwrap();
        display.remove_widget(ids[0]).unwrap();
        let root = display.container(Owner::Root).unwrap();
        assert_eq!(root.len(), 3);
        assert_eq!(root.capacity(), root.len());

        display.clear_widgets();
        let root = display.container(Owner::Root).unwrap();
        assert_eq!(root.len(), 0);
        assert_eq!(root.capacity(), 0);
    }

    #[test]
    fn test_remove_middle_non_owning() {
        let mut display = display();
        let log = new_log();
        let ids: Vec<WidgetId> = ["a", "b", "c"]
            .into_iter()
            .map(|name| recorder(&mut display, name, &log))
            .collect();
        for (i, id) in ids.iter().enumerate() {
            display
                .widget_mut(*id)
                .unwrap()
                .set_bounds(Rectangle::new(Point::new(i as i32 * 70, 0), Size::new(64, 64)));
            display.add_widget(*id).unwrap();
        }
        display.tick();

        display.remove_widget(ids[1]).unwrap();

        let root = display.container(Owner::Root).unwrap();
        assert_eq!(root.as_slice(), &[ids[0], ids[2]]);
        assert_eq!(display.widget_count(Owner::Root).unwrap(), 2);
        assert_eq!(
            display
                .canvas()
                .fills_of(Rectangle::new(Point::new(70, 0), Size::new(64, 64))),
            1
        );
        assert_eq!(display.canvas().fills.len(), 1);

        // Caller keeps ownership
        assert!(display.contains(ids[1]));
        assert!(!display.widget(ids[1]).unwrap().is_drawn());
    }

    #[test]
    fn test_remove_middle_owning_destroys() {
        let mut display = display();
        display.set_owns_widgets(Owner::Root, true).unwrap();
        let log = new_log();
        let ids: Vec<WidgetId> = ["a", "b", "c"]
            .into_iter()
            .map(|name| recorder(&mut display, name, &log))
            .collect();
        for id in &ids {
            display.add_widget(*id).unwrap();
        }

        // Never painted, so only the destroy side effect applies
        display.remove_widget(ids[1]).unwrap();

        assert_eq!(display.container(Owner::Root).unwrap().as_slice(), &[ids[0], ids[2]]);
        assert!(!display.contains(ids[1]));
        assert!(display.canvas().fills.is_empty());
        assert!(matches!(display.widget(ids[1]), Err(WidgetError::UnknownWidget)));
    }

    #[test]
    fn test_owning_eviction_erases_then_destroys() {
        let mut display = display();
        display.set_owns_widgets(Owner::Root, true).unwrap();
        let log = new_log();
        let ids: Vec<WidgetId> = ["a", "b", "c"]
            .into_iter()
            .map(|name| recorder(&mut display, name, &log))
            .collect();
        let areas: Vec<Rectangle> = (0..3)
            .map(|i| Rectangle::new(Point::new(i * 70, 0), Size::new(64, 64)))
            .collect();
        for (id, area) in ids.iter().zip(&areas) {
            display.widget_mut(*id).unwrap().set_bounds(*area);
            display.add_widget(*id).unwrap();
        }
        display.tick();

        display.remove_widget(ids[1]).unwrap();
        assert!(!display.contains(ids[1]));
        assert_eq!(display.canvas().fills_of(areas[1]), 1);

        display.clear_widgets();
        for (id, area) in ids.iter().zip(&areas) {
            assert!(!display.contains(*id));
            assert_eq!(display.canvas().fills_of(*area), 1, "erased exactly once");
        }
        assert_eq!(display.canvas().fills.len(), 3);
        assert!(display.is_empty());
    }

    #[test]
    fn test_readd_after_remove_repaints() {
        let mut display = display();
        let log = new_log();
        let w = recorder(&mut display, "w", &log);
        display.add_widget(w).unwrap();
        display.tick();

        display.remove_widget(w).unwrap();
        assert!(!display.widget(w).unwrap().is_drawn());

        display.add_widget(w).unwrap();
        display.tick();

        assert_eq!(draws(&log), ["w", "w"]);
        let widget = display.widget(w).unwrap();
        assert!(widget.is_drawn());
        assert!(!widget.is_invalidated());
    }

    #[test]
    fn test_shared_widget_repainted_after_removal_elsewhere() {
        let mut display = display();
        let log = new_log();
        let panel = recorder(&mut display, "panel", &log);
        let shared = recorder(&mut display, "shared", &log);
        display.add_widget(panel).unwrap();
        display.add_widget(shared).unwrap();
        display.add_child(panel, shared).unwrap();
        display.tick();
        log.borrow_mut().clear();

        display.remove_child(panel, shared).unwrap();
        assert_eq!(display.canvas().fills.len(), 1);

        display.tick();
        assert_eq!(draws(&log), ["shared"]);
        let widget = display.widget(shared).unwrap();
        assert!(widget.is_drawn(), "still attached to the root");
        assert!(!widget.is_invalidated());
    }

    #[test]
    fn test_remove_duplicates() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        let b = recorder(&mut display, "b", &log);
        for id in [a, a, b, a] {
            display.add_widget(id).unwrap();
        }
        display.tick();
        assert_eq!(draws(&log), ["a", "a", "b", "a"]);

        display.remove_widget(a).unwrap();
        assert_eq!(display.container(Owner::Root).unwrap().as_slice(), &[b]);
        assert_eq!(display.canvas().fills.len(), 1, "erased once despite duplicates");
    }

    #[test]
    fn test_remove_absent_widget_is_noop() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        let b = recorder(&mut display, "b", &log);
        display.add_widget(a).unwrap();

        display.remove_widget(b).unwrap();
        assert_eq!(display.widget_count(Owner::Root).unwrap(), 1);
    }

    #[test]
    fn test_clear_skips_erase_when_drawing_disabled() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        let b = recorder(&mut display, "b", &log);
        display.add_widget(a).unwrap();
        display.add_widget(b).unwrap();
        display.tick();

        display.widget_mut(b).unwrap().set_drawing_enabled(false);
        display.clear_widgets();

        assert_eq!(display.canvas().fills.len(), 1);
        assert_eq!(display.widget_count(Owner::Root).unwrap(), 0);
    }

    #[test]
    fn test_clear_silent_destroys_owned_without_painting() {
        let mut display = display();
        display.set_owns_widgets(Owner::Root, true).unwrap();
        let log = new_log();
        let parent = recorder(&mut display, "parent", &log);
        let child = recorder(&mut display, "child", &log);
        display.set_owns_widgets(Owner::Widget(parent), true).unwrap();
        display.add_child(parent, child).unwrap();
        display.add_widget(parent).unwrap();
        display.tick();

        display.clear_silent();

        assert!(display.is_empty());
        assert!(display.canvas().fills.is_empty());
        assert_eq!(display.container(Owner::Root).unwrap().capacity(), 0);
    }

    #[test]
    fn test_destroy_detaches_everywhere() {
        let mut display = display();
        let log = new_log();
        let panel_a = recorder(&mut display, "pa", &log);
        let panel_b = recorder(&mut display, "pb", &log);
        let shared = recorder(&mut display, "shared", &log);
        let grandchild = recorder(&mut display, "gc", &log);
        display.add_widget(panel_a).unwrap();
        display.add_widget(shared).unwrap();
        display.add_child(panel_a, shared).unwrap();
        display.add_child(panel_b, shared).unwrap();
        display.set_owns_widgets(Owner::Widget(shared), true).unwrap();
        display.add_child(shared, grandchild).unwrap();
        display.tick();
        let fills_before = display.canvas().fills.len();

        display.destroy_widget(shared).unwrap();

        assert!(!display.contains(shared));
        assert!(!display.contains(grandchild), "owned children go with it");
        assert_eq!(display.container(Owner::Root).unwrap().as_slice(), &[panel_a]);
        assert_eq!(display.widget_count(Owner::Widget(panel_a)).unwrap(), 0);
        assert_eq!(display.widget_count(Owner::Widget(panel_b)).unwrap(), 0);
        assert_eq!(display.canvas().fills.len(), fills_before + 1, "erased once");

        // The tree still traverses cleanly
        display.invalidate_all();
        display.tick();
        assert!(matches!(
            display.destroy_widget(shared),
            Err(WidgetError::UnknownWidget)
        ));
    }

    #[test]
    fn test_non_owned_children_survive_parent() {
        let mut display = display();
        let log = new_log();
        let parent = recorder(&mut display, "parent", &log);
        let child = recorder(&mut display, "child", &log);
        display.add_child(parent, child).unwrap();

        display.destroy_widget(parent).unwrap();
        assert!(display.contains(child));
        assert_eq!(display.len(), 1);
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        let b = recorder(&mut display, "b", &log);
        display.add_child(a, b).unwrap();

        assert!(matches!(display.add_child(b, a), Err(WidgetError::CircularParentage)));
        assert!(matches!(display.add_child(a, a), Err(WidgetError::CircularParentage)));
        assert_eq!(display.widget_count(Owner::Widget(b)).unwrap(), 0);
    }

    #[test]
    fn test_widget_at_bounds_checked() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        display.add_widget(a).unwrap();

        assert_eq!(display.widget_at(Owner::Root, 0).unwrap(), a);
        assert!(matches!(
            display.widget_at(Owner::Root, 3),
            Err(WidgetError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_stale_handles_rejected() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        display.destroy_widget(a).unwrap();

        assert!(matches!(display.add_widget(a), Err(WidgetError::UnknownWidget)));
        assert!(matches!(display.invalidate(a), Err(WidgetError::UnknownWidget)));
        assert!(matches!(
            display.widget_count(Owner::Widget(a)),
            Err(WidgetError::UnknownWidget)
        ));
    }

    /// Draw hook that invalidates a sibling, and itself, mid-traversal.
    struct Meddler {
        sibling: WidgetId,
        log: Log,
    }

    impl<C: Canvas> Behavior<C> for Meddler {
        fn draw(&mut self, cx: &mut DrawContext<'_, C>) {
            self.log.borrow_mut().push(Event::Draw("meddler"));
            cx.invalidate_widget(self.sibling);
            cx.request_redraw();
        }
    }

    /// Update hook that invalidates another widget.
    struct Nudger {
        target: WidgetId,
    }

    impl<C: Canvas> Behavior<C> for Nudger {
        fn draw(&mut self, _cx: &mut DrawContext<'_, C>) {}

        fn update(&mut self, cx: &mut UpdateContext<'_>) {
            cx.invalidate_widget(self.target);
        }
    }

    #[test]
    fn test_hook_invalidations_apply_next_traversal() {
        let mut display = display();
        let log = new_log();
        let sibling = recorder(&mut display, "sibling", &log);
        let meddler = display.create_widget(WidgetKind::custom(Meddler {
            sibling,
            log: log.clone(),
        }));
        display.add_widget(sibling).unwrap();
        display.add_widget(meddler).unwrap();

        display.update_widgets(false, true, false);
        assert_eq!(draws(&log), ["sibling", "meddler"]);
        assert!(display.widget(sibling).unwrap().is_invalidated());
        assert!(display.widget(meddler).unwrap().is_invalidated());

        display.update_widgets(false, true, false);
        assert_eq!(draws(&log), ["sibling", "meddler", "sibling", "meddler"]);

        // Same rule for update hooks: the target is not repainted in the
        // draw pass of the tick that invalidated it
        let mut display = Display::new(RecordingCanvas::new());
        let log = new_log();
        let target = recorder(&mut display, "target", &log);
        let nudger = display.create_widget(WidgetKind::custom(Nudger { target }));
        display.add_widget(nudger).unwrap();
        display.add_widget(target).unwrap();
        display.update_widgets(false, true, false);
        log.borrow_mut().clear();

        display.update_widgets(true, true, false);
        assert!(draws(&log).is_empty());
        assert!(display.widget(target).unwrap().is_invalidated());

        display.update_widgets(false, true, false);
        assert_eq!(draws(&log), ["target"]);
        assert!(!display.widget(target).unwrap().is_invalidated());
    }

    /// Update hook that asks for its own repaint.
    struct Ticker;

    impl<C: Canvas> Behavior<C> for Ticker {
        fn draw(&mut self, _cx: &mut DrawContext<'_, C>) {}

        fn update(&mut self, cx: &mut UpdateContext<'_>) {
            cx.invalidate();
        }
    }

    #[test]
    fn test_update_invalidation_painted_same_tick() {
        let mut display = display();
        let ticker = display.create_widget(WidgetKind::custom(Ticker));
        display.add_widget(ticker).unwrap();

        display.tick();
        assert!(!display.widget(ticker).unwrap().is_invalidated());

        display.update_widgets(true, false, false);
        assert!(display.widget(ticker).unwrap().is_invalidated());
    }

    #[test]
    fn test_force_redraw_repaints_clean_tree() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        display.add_widget(a).unwrap();
        display.tick();

        display.update_widgets(false, true, true);
        assert_eq!(draws(&log), ["a", "a"]);
    }

    #[test]
    fn test_update_children_only_touches_subtree() {
        let mut display = display();
        let log = new_log();
        let parent = recorder(&mut display, "parent", &log);
        let child = recorder(&mut display, "child", &log);
        display.add_widget(parent).unwrap();
        display.add_child(parent, child).unwrap();

        display.update_children(parent, true, true, false).unwrap();
        assert_eq!(draws(&log), ["child"]);
        assert_eq!(updates(&log), ["child"]);
        assert!(display.widget(parent).unwrap().is_invalidated());
    }

    #[test]
    fn test_touch_queries_by_handle() {
        let mut display = display();
        let log = new_log();
        let a = recorder(&mut display, "a", &log);
        display.add_widget(a).unwrap();

        display.set_touch(Some(TouchPoint::new(10, 10)));
        assert!(display.is_touched(a).unwrap());
        assert!(display.is_touch_enter(a).unwrap());
        assert!(display.is_touch_change(a).unwrap());

        display.set_touch(None);
        assert!(display.is_clicked(a).unwrap());
        assert!(display.is_touch_leave(a).unwrap());

        display.widget_mut(a).unwrap().set_visible(false);
        display.set_touch(Some(TouchPoint::new(10, 10)));
        assert!(!display.is_touched(a).unwrap());
    }

    #[test]
    fn test_config_controls_root_ownership_and_palette() {
        let config = DisplayConfig {
            theme: crate::config::ThemeKind::Light,
            owns_widgets: true,
            ..DisplayConfig::default()
        };
        let mut display = Display::with_config(RecordingCanvas::new(), config);
        let panel = display.create_widget(crate::ui::Panel::new());

        assert_eq!(display.widget(panel).unwrap().palette(), &Palette::light());
        assert!(display.container(Owner::Root).unwrap().owns_widgets());

        display.add_widget(panel).unwrap();
        display.clear_widgets();
        assert!(!display.contains(panel));
    }
}
