//! Error types for the color picker
//!
//! Sampling and clipboard failures are never fatal: the tracker logs them and
//! carries on. Only startup (config, window creation) propagates errors out.

use thiserror::Error;

/// Main error type for the color picker
#[derive(Debug, Error)]
pub enum PickerError {
    /// A hex color string could not be parsed
    #[error("Invalid hex color: {0:?}")]
    InvalidHexColor(String),

    /// The screen could not be captured
    /// Preserves the underlying error source for full error chain transparency
    #[error("Screen capture failed: {0}")]
    CaptureFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The capturer has no frame yet
    #[error("No screen frame available yet")]
    CaptureNotReady,

    /// The cursor is outside the captured display
    #[error("Cursor position ({x}, {y}) is outside the captured display")]
    OutsideDisplay {
        /// Horizontal screen coordinate
        x: i32,
        /// Vertical screen coordinate
        y: i32,
    },

    /// The cursor position cannot be queried (no display connection)
    #[error("Cursor position unavailable: no display connection")]
    CursorUnavailable,

    /// The clipboard could not be acquired or written
    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The global pick shortcut could not be registered
    #[error("Global hotkey error: {0}")]
    Hotkey(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for color picker operations
pub type Result<T> = std::result::Result<T, PickerError>;
