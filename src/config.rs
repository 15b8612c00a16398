//! Display configuration
//!
//! The configuration is a small serde struct so it can be kept in flash or on
//! an SD card as a postcard blob and loaded at boot.

use alloc::vec::Vec;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};
use crate::ui::styling::Palette;

/// Default panel width in pixels.
pub const DEFAULT_WIDTH_PX: u32 = 320;

/// Default panel height in pixels.
pub const DEFAULT_HEIGHT_PX: u32 = 240;

/// Largest accepted panel width or height, in pixels.
///
/// Touch coordinates are `u16`, and a framebuffer of this size squared still
/// indexes within a 32-bit `usize`.
pub const MAX_DIMENSION_PX: u32 = 4096;

/// Which built-in palette new widgets start with
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn palette(self) -> Palette {
        match self {
            ThemeKind::Dark => Palette::dark(),
            ThemeKind::Light => Palette::light(),
        }
    }
}

/// Settings for a [`Display`](crate::ui::Display)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Palette assigned to newly created widgets
    pub theme: ThemeKind,
    /// Whether the top-level container destroys widgets it evicts
    pub owns_widgets: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH_PX,
            height: DEFAULT_HEIGHT_PX,
            theme: ThemeKind::Dark,
            owns_widgets: false,
        }
    }
}

impl DisplayConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Full-screen bounding rectangle.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size())
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    /// Check that the panel size is usable for a framebuffer.
    pub fn validate(&self) -> WidgetResult<()> {
        let in_range = |px: u32| (1..=MAX_DIMENSION_PX).contains(&px);
        if in_range(self.width) && in_range(self.height) {
            Ok(())
        } else {
            Err(WidgetError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Decode a configuration blob written by [`DisplayConfig::to_bytes`].
    ///
    /// Blobs with a zero or oversized panel are rejected.
    pub fn from_bytes(bytes: &[u8]) -> WidgetResult<Self> {
        let config: Self = postcard::from_bytes(bytes).map_err(WidgetError::Config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_bytes(&self) -> WidgetResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(WidgetError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.size(), Size::new(320, 240));
        assert_eq!(config.palette(), Palette::dark());
        assert!(!config.owns_widgets);
    }

    #[test]
    fn test_config_blob() {
        let config = DisplayConfig {
            width: 480,
            height: 272,
            theme: ThemeKind::Light,
            owns_widgets: true,
        };

        let bytes = config.to_bytes().unwrap();
        let loaded = DisplayConfig::from_bytes(&bytes).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.bounds(), Rectangle::new(Point::zero(), Size::new(480, 272)));
    }

    #[test]
    fn test_unusable_dimensions_are_rejected() {
        let unusable = [
            (0, 240),
            (320, 0),
            (MAX_DIMENSION_PX + 1, 240),
            (u32::MAX, u32::MAX),
        ];
        for (width, height) in unusable {
            let config = DisplayConfig {
                width,
                height,
                ..DisplayConfig::default()
            };
            let bytes = config.to_bytes().unwrap();

            assert!(matches!(
                DisplayConfig::from_bytes(&bytes),
                Err(WidgetError::InvalidDimensions { .. })
            ));
        }

        let largest = DisplayConfig {
            width: MAX_DIMENSION_PX,
            height: MAX_DIMENSION_PX,
            ..DisplayConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_truncated_blob_is_rejected() {
        let bytes = DisplayConfig::default().to_bytes().unwrap();
        let result = DisplayConfig::from_bytes(&bytes[..1]);
        assert!(matches!(result, Err(WidgetError::Config(_))));
    }
}
