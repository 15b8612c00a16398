//! Styling for widgets
//!
//! - [`colors`] - RGB565 color constants
//! - [`palette`] - role-indexed palettes carried by every widget

pub mod colors;
pub mod palette;

pub use colors::{
    COLOR_ACCENT, COLOR_BACKGROUND, COLOR_STROKE, COLOR_SURFACE, DARK_GRAY, LIGHT_GRAY, WHITE,
};
pub use palette::{ColorRole, Palette};
