//! Screen color picker
//!
//! Samples the pixel under the cursor and shows it as hex, RGB and HSL text,
//! either once ("pick") or continuously while tracking. The color model and
//! the tracking state machine live here; the slint window and the platform
//! bindings live in the binary.

pub mod color;
pub mod config;
pub mod desktop;
pub mod error;
pub mod logging;
pub mod tracker;

// Re-export commonly used types
pub use color::Color;
pub use error::{PickerError, Result};
pub use tracker::{ColorField, Tracker, TrackingState};
