// src/ui/mod.rs
//! Glint UI system: a retained widget tree for small embedded displays
//!
//! This module provides:
//! - A widget registry with stable handles ([`Display`], [`WidgetId`])
//! - Ordered child containers with optional ownership of their widgets
//! - Invalidation tracking so only changed widgets are repainted
//! - Per-frame touch dispatch with enter/leave/click edges
//! - Built-in panels, labels and buttons plus custom widget behaviors

pub mod components;
pub mod container;
pub mod core;
pub mod display;
pub mod styling;
pub mod widget;

// Re-export commonly used items
pub use components::{Button, Label, Panel, TextSize};
pub use container::WidgetContainer;
pub use core::{Behavior, Canvas, DrawContext, Owner, UpdateContext, WidgetId};
pub use display::Display;
pub use styling::{ColorRole, Palette};
pub use widget::{DEFAULT_WIDGET_SIZE, Validation, Visibility, Widget, WidgetKind};
