//! Ordered collection of widget handles
//!
//! A [`WidgetContainer`] only stores handles; the widgets themselves live in
//! the [`Display`](crate::ui::Display) registry. Structural changes go through
//! the display so that evicted widgets are erased (and destroyed, for owning
//! containers) before they disappear.
//!
//! The backing storage never carries slack: every add grows it by exactly
//! one slot and every removal shrinks it back, so `capacity() == len()`
//! after every operation. RAM on the target is tight and trees are small.

use alloc::vec::Vec;
use core::mem;

use crate::error::{WidgetError, WidgetResult};
use crate::ui::core::WidgetId;

#[derive(Debug, Default)]
pub struct WidgetContainer {
    items: Vec<WidgetId>,
    owns_widgets: bool,
}

impl WidgetContainer {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            owns_widgets: false,
        }
    }

    /// Number of handles, counting duplicates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocated slots; always equal to [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Whether evicted widgets are destroyed rather than left to the caller.
    pub fn owns_widgets(&self) -> bool {
        self.owns_widgets
    }

    pub(crate) fn set_owns_widgets(&mut self, owns: bool) {
        self.owns_widgets = owns;
    }

    /// Handle at `index`.
    pub fn get(&self, index: usize) -> WidgetResult<WidgetId> {
        self.items
            .get(index)
            .copied()
            .ok_or(WidgetError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[WidgetId] {
        &self.items
    }

    /// Append a handle, growing the storage by exactly one slot.
    pub(crate) fn push(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.items
            .try_reserve_exact(1)
            .map_err(|_| WidgetError::OutOfMemory)?;
        self.items.push(id);
        Ok(())
    }

    /// Drop every occurrence of `id`, keeping the others in order.
    ///
    /// Returns how many occurrences were dropped.
    pub(crate) fn take_matching(&mut self, id: WidgetId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| *item != id);
        let removed = before - self.items.len();
        if removed > 0 {
            self.items.shrink_to_fit();
        }
        removed
    }

    /// Empty the container and release its storage.
    pub(crate) fn take_all(&mut self) -> Vec<WidgetId> {
        mem::take(&mut self.items)
    }
}
