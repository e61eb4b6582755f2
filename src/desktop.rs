//! Seams between the tracker and the window system.
//!
//! The tracker never talks to a toolkit directly. The binary implements these
//! traits on top of slint, `device_query`, `scrap`, `xcap` and `arboard`; the
//! tests implement them with a recording fake.

use crate::color::Color;
use crate::error::Result;
use std::fmt;
use std::time::Duration;

/// Screen coordinates of the cursor. Negative values are valid on
/// multi-monitor layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Mouse cursor shape requested while tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Default,
    Crosshair,
}

/// Everything the presentation layer needs after a sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUpdate {
    pub color: Color,
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub position: CursorPosition,
    pub coordinates: String,
}

impl DisplayUpdate {
    pub fn new(color: Color, position: CursorPosition) -> Self {
        Self {
            color,
            hex: color.hex(),
            rgb: color.rgb_string(),
            hsl: color.hsl_string(),
            position,
            coordinates: position.to_string(),
        }
    }
}

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Identifies which transient notice a one-shot timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(pub u64);

/// Delivered back to [`crate::tracker::Tracker::on_timer`] when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SampleTick,
    NoticeExpired(NoticeId),
}

/// Reads the cursor and the pixel underneath it
pub trait ScreenSampler {
    fn cursor_position(&mut self) -> Result<CursorPosition>;
    fn pixel_color(&mut self, position: CursorPosition) -> Result<Color>;

    /// Drop any capture resources held between samples. Called whenever
    /// sampling goes quiet; the next `pixel_color` reopens them.
    fn release_capture(&mut self) {}
}

/// Best-effort clipboard write
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Presentation layer. Implementations draw the swatch, buttons and labels;
/// the tracker only says what to show.
pub trait Renderer {
    fn render_display(&mut self, update: &DisplayUpdate);
    fn set_status_text(&mut self, text: &str);
    fn set_title_text(&mut self, text: &str);
    fn set_track_button_label(&mut self, label: &str);
    fn set_pick_button_enabled(&mut self, enabled: bool);
    fn set_cursor_shape(&mut self, shape: CursorShape);
}

/// Timer service of the event loop.
///
/// When a timer fires, the implementation must hand its [`TimerEvent`] to the
/// tracker on the event-loop thread. Cancelling an unknown or already fired
/// handle is a no-op.
pub trait Scheduler {
    fn schedule_repeating(&mut self, interval: Duration, event: TimerEvent) -> TimerHandle;
    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// The full collaborator surface the tracker drives
pub trait Desktop: ScreenSampler + ClipboardSink + Renderer + Scheduler {}

impl<T: ScreenSampler + ClipboardSink + Renderer + Scheduler> Desktop for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_text() {
        assert_eq!(CursorPosition::new(10, 20).to_string(), "(10, 20)");
        assert_eq!(CursorPosition::new(-1920, 5).to_string(), "(-1920, 5)");
    }

    #[test]
    fn test_display_update_carries_all_representations() {
        let update = DisplayUpdate::new(Color::from_rgb(99, 102, 241), CursorPosition::new(3, 4));
        assert_eq!(update.hex, "#6366F1");
        assert_eq!(update.rgb, "99, 102, 241");
        assert_eq!(update.hsl, "238 deg, 84%, 67%");
        assert_eq!(update.coordinates, "(3, 4)");
    }
}
