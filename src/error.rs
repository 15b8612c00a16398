//! Error types for widget tree operations

use thiserror_no_std::Error;

/// Errors reported by the widget registry and its containers
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The handle does not refer to a live widget
    #[error("Unknown or destroyed widget")]
    UnknownWidget,

    /// Container index past the last element
    #[error("Index out of range: {index} (len: {len})")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of widgets in the container
        len: usize,
    },

    /// Growing a container's backing storage failed
    #[error("Out of memory while growing widget container")]
    OutOfMemory,

    /// Attempted to add a widget beneath itself or one of its descendants
    #[error("Cannot add a widget beneath itself or one of its descendants")]
    CircularParentage,

    /// The widget kind does not display text
    #[error("Widget kind has no text")]
    NoText,

    /// The configured panel is empty or too large for a framebuffer
    #[error("Invalid display size: {width}x{height}")]
    InvalidDimensions {
        /// Configured width in pixels
        width: u32,
        /// Configured height in pixels
        height: u32,
    },

    /// A stored display configuration could not be decoded or encoded
    #[error("Invalid display configuration: {0}")]
    Config(postcard::Error),
}

/// Result type for widget tree operations
pub type WidgetResult<T> = Result<T, WidgetError>;
