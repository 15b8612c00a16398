//! Retained-mode widget engine for memory-constrained embedded displays
//!
//! `glint` keeps a tree of on-screen widgets, tracks which of them need to be
//! repainted and dispatches touch input to them. All painting targets a RAM
//! [`FrameBuffer`](framebuffer::FrameBuffer) (or any other infallible
//! `Rgb565` draw target), which the host flushes to the panel after each tick.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on embedded
//! targets and on desktop hosts (for the simulator and tests).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod framebuffer;
pub mod touch;
pub mod ui;

#[cfg(test)]
mod testing;

pub use config::{DisplayConfig, ThemeKind};
pub use error::{WidgetError, WidgetResult};
pub use framebuffer::FrameBuffer;
pub use touch::{TouchPoint, TouchState};
pub use ui::{
    Behavior, Button, Canvas, ColorRole, Display, DrawContext, Label, Owner, Palette, Panel,
    TextSize, UpdateContext, Validation, Visibility, Widget, WidgetContainer, WidgetId,
    WidgetKind,
};
