//! Role-indexed color palettes
//!
//! Every widget carries its own [`Palette`]: a small table mapping a
//! [`ColorRole`] to an RGB565 value. Widgets start with the palette of the
//! display's theme and can be recolored one role at a time (see
//! [`Display::set_color`](crate::ui::Display::set_color), which cascades the
//! change through a widget's children).

use embedded_graphics::pixelcolor::Rgb565;

use super::colors::{
    COLOR_ACCENT, COLOR_ACCENT_DIM, COLOR_BACKGROUND, COLOR_STROKE, COLOR_SURFACE, DARK_GRAY,
    LIGHT_GRAY, WHITE,
};

/// What a palette entry is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorRole {
    /// Fill behind the widget; also used to erase it
    Background = 0,
    /// Outlines and borders
    Frame = 1,
    /// Inner face of controls
    Content = 2,
    /// Text and glyphs
    Foreground = 3,
    /// Pressed or active state accents
    Highlight = 4,
}

impl ColorRole {
    /// Number of roles in a palette.
    pub const COUNT: usize = 5;

    pub const ALL: [ColorRole; Self::COUNT] = [
        ColorRole::Background,
        ColorRole::Frame,
        ColorRole::Content,
        ColorRole::Foreground,
        ColorRole::Highlight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Mapping from [`ColorRole`] to color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb565; ColorRole::COUNT],
}

impl Default for Palette {
    /// Returns the shared dark palette
    fn default() -> Self {
        Self::DARK
    }
}

impl Palette {
    /// Light text on dark backgrounds (the default).
    pub const DARK: Palette = Palette {
        colors: [COLOR_BACKGROUND, COLOR_STROKE, COLOR_SURFACE, WHITE, COLOR_ACCENT],
    };

    /// Dark text on light backgrounds.
    pub const LIGHT: Palette = Palette {
        colors: [WHITE, COLOR_STROKE, LIGHT_GRAY, DARK_GRAY, COLOR_ACCENT_DIM],
    };

    pub const fn dark() -> Self {
        Self::DARK
    }

    pub const fn light() -> Self {
        Self::LIGHT
    }

    #[inline]
    pub fn get(&self, role: ColorRole) -> Rgb565 {
        self.colors[role.index()]
    }

    #[inline]
    pub fn set(&mut self, role: ColorRole, color: Rgb565) {
        self.colors[role.index()] = color;
    }
}
