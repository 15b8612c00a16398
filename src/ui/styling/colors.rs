//! Color definitions
//!
//! All colors are RGB565, the native format of the 16-bit SPI panels this
//! engine targets.
//!
//! # RGB565 Format
//! - Red: 5 bits (0-31)
//! - Green: 6 bits (0-63)
//! - Blue: 5 bits (0-31)
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

// ============================================================================
// Base Colors
// ============================================================================

/// Primary background color - very dark gray-blue
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(18 >> 3, 23 >> 2, 24 >> 3);

/// Surface color for control faces - slightly lighter than background
pub const COLOR_SURFACE: Rgb565 = Rgb565::new(26 >> 3, 32 >> 2, 33 >> 3);

/// Border/stroke color - medium gray
pub const COLOR_STROKE: Rgb565 = Rgb565::new(43 >> 3, 55 >> 2, 57 >> 3);

/// Accent used for pressed or active controls - bright teal-green
pub const COLOR_ACCENT: Rgb565 = Rgb565::new(95 >> 3, 185 >> 2, 141 >> 3);

/// Softer accent for light backgrounds - moderate green
pub const COLOR_ACCENT_DIM: Rgb565 = Rgb565::new(76 >> 3, 154 >> 2, 113 >> 3);

// ============================================================================
// Text Colors
// ============================================================================

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for light-theme surfaces
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Dark gray - for subtle text
pub const DARK_GRAY: Rgb565 = Rgb565::new(10, 20, 10);
