//! Tracking state machine
//!
//! Owns the single [`TrackingSession`] and decides when to sample. All calls
//! happen on the event-loop thread; timers come back in through
//! [`Tracker::on_timer`].

use crate::color::Color;
use crate::config::Settings;
use crate::desktop::{
    CursorPosition, CursorShape, Desktop, DisplayUpdate, NoticeId, TimerEvent, TimerHandle,
};
use crate::error::PickerError;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const READY_STATUS: &str = "Ready to sample colors from your screen";
pub const TRACKING_STATUS: &str = "Move cursor to sample colors - ESC to stop";
pub const OFF_SCREEN_STATUS: &str = "Cursor is outside the capturable screen area";
pub const PICKED_STATUS: &str = "Color successfully picked!";
pub const START_LABEL: &str = "Start Tracking";
pub const STOP_LABEL: &str = "Stop Tracking";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    Idle,
    Tracking,
}

/// Which displayed representation to copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorField {
    Hex,
    Rgb,
    Hsl,
}

impl ColorField {
    pub fn text(self, color: Color) -> String {
        match self {
            Self::Hex => color.hex(),
            Self::Rgb => color.rgb_string(),
            Self::Hsl => color.hsl_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Copied,
    Picked,
}

impl NoticeKind {
    fn title_suffix(self) -> &'static str {
        match self {
            Self::Copied => "Copied!",
            Self::Picked => "Color Picked!",
        }
    }

    fn status_text(self) -> Option<&'static str> {
        match self {
            Self::Copied => None,
            Self::Picked => Some(PICKED_STATUS),
        }
    }
}

/// Temporary title/status feedback that reverts on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransientNotice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub expires_at: Instant,
    handle: TimerHandle,
}

/// Mode, last cursor position and last sampled color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingSession {
    state: TrackingState,
    last_position: CursorPosition,
    last_color: Color,
}

impl TrackingSession {
    pub fn new(initial_color: Color) -> Self {
        Self {
            state: TrackingState::Idle,
            last_position: CursorPosition::default(),
            last_color: initial_color,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn last_position(&self) -> CursorPosition {
        self.last_position
    }

    pub fn last_color(&self) -> Color {
        self.last_color
    }
}

pub struct Tracker<D> {
    desktop: D,
    settings: Settings,
    session: TrackingSession,
    /// Present iff the session is tracking
    sampling: Option<TimerHandle>,
    /// The last tick found no display under the cursor
    off_screen: bool,
    notice: Option<TransientNotice>,
    notice_counter: u64,
}

impl<D: Desktop> Tracker<D> {
    pub fn new(desktop: D, settings: Settings) -> Self {
        let session = TrackingSession::new(settings.initial_color);
        Self {
            desktop,
            settings,
            session,
            sampling: None,
            off_screen: false,
            notice: None,
            notice_counter: 0,
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn is_tracking(&self) -> bool {
        self.session.state == TrackingState::Tracking
    }

    pub fn notice(&self) -> Option<&TransientNotice> {
        self.notice.as_ref()
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut D {
        &mut self.desktop
    }

    /// Push the whole idle presentation: title, status, buttons, current color
    pub fn refresh(&mut self) {
        let tracking = self.is_tracking();
        let status = self.base_status();
        self.desktop.set_title_text(&self.settings.window_title);
        self.desktop.set_status_text(status);
        self.desktop
            .set_track_button_label(if tracking { STOP_LABEL } else { START_LABEL });
        self.desktop.set_pick_button_enabled(!tracking);
        self.desktop.render_display(&DisplayUpdate::new(
            self.session.last_color,
            self.session.last_position,
        ));
    }

    pub fn start(&mut self) {
        if self.is_tracking() {
            return;
        }
        self.session.state = TrackingState::Tracking;
        self.off_screen = false;

        let interval = self.settings.sample_interval();
        self.sampling = Some(
            self.desktop
                .schedule_repeating(interval, TimerEvent::SampleTick),
        );
        self.desktop.set_track_button_label(STOP_LABEL);
        self.desktop.set_pick_button_enabled(false);
        self.desktop.set_status_text(TRACKING_STATUS);
        self.desktop.set_cursor_shape(CursorShape::Crosshair);
        info!("Tracking started ({}ms interval)", interval.as_millis());
    }

    pub fn stop(&mut self) {
        if !self.is_tracking() {
            return;
        }
        self.session.state = TrackingState::Idle;
        self.off_screen = false;

        if let Some(handle) = self.sampling.take() {
            self.desktop.cancel(handle);
        }
        self.desktop.release_capture();
        self.desktop.set_track_button_label(START_LABEL);
        self.desktop.set_pick_button_enabled(true);
        self.desktop.set_status_text(READY_STATUS);
        self.desktop.set_cursor_shape(CursorShape::Default);
        info!("Tracking stopped");
    }

    pub fn toggle(&mut self) {
        if self.is_tracking() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// One periodic sample. Ignored while idle, which also covers a timer
    /// callback that was already queued when tracking stopped.
    ///
    /// A cursor over no capturable display switches the status line to
    /// [`OFF_SCREEN_STATUS`] until a sample succeeds again.
    pub fn tick(&mut self) {
        if !self.is_tracking() {
            debug!("Ignoring sample tick while idle");
            return;
        }
        match self.sample() {
            Ok(_) if self.off_screen => {
                self.off_screen = false;
                self.desktop.set_status_text(TRACKING_STATUS);
            }
            Ok(_) => {}
            Err(e @ PickerError::OutsideDisplay { .. }) => {
                debug!("Sample skipped: {e}");
                if !self.off_screen {
                    self.off_screen = true;
                    self.desktop.set_status_text(OFF_SCREEN_STATUS);
                }
            }
            Err(e) => debug!("Sample skipped: {e}"),
        }
    }

    /// Stop tracking if needed and take exactly one sample.
    /// Returns whether a color was sampled.
    pub fn pick_once(&mut self) -> bool {
        self.stop();
        let sampled = self.sample();
        self.desktop.release_capture();
        match sampled {
            Ok(update) => {
                info!("Picked {} at {}", update.hex, update.coordinates);
                self.raise_notice(NoticeKind::Picked);
                true
            }
            Err(e) => {
                warn!("Pick failed: {e}");
                false
            }
        }
    }

    pub fn escape(&mut self) {
        if self.is_tracking() {
            self.stop();
        }
    }

    /// Copy the displayed text of `field`. Returns `false` when the clipboard
    /// could not be written.
    pub fn copy(&mut self, field: ColorField) -> bool {
        let text = field.text(self.session.last_color);
        match self.desktop.set_text(&text) {
            Ok(()) => {
                info!("Copied {text:?} to clipboard");
                self.raise_notice(NoticeKind::Copied);
                true
            }
            Err(e) => {
                warn!("Copy failed: {e}");
                false
            }
        }
    }

    pub fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::SampleTick => self.tick(),
            TimerEvent::NoticeExpired(id) => self.expire_notice(id),
        }
    }

    /// Stop tracking and drop any pending notice; used when the window closes
    pub fn shutdown(&mut self) {
        self.stop();
        if let Some(notice) = self.notice.take() {
            self.desktop.cancel(notice.handle);
        }
    }

    fn sample(&mut self) -> crate::Result<DisplayUpdate> {
        let position = self.desktop.cursor_position()?;
        let color = self.desktop.pixel_color(position)?;

        self.session.last_position = position;
        self.session.last_color = color;

        let update = DisplayUpdate::new(color, position);
        self.desktop.render_display(&update);
        Ok(update)
    }

    fn raise_notice(&mut self, kind: NoticeKind) {
        // A newer notice supersedes the pending one, including its revert
        if let Some(previous) = self.notice.take() {
            self.desktop.cancel(previous.handle);
        }

        self.notice_counter += 1;
        let id = NoticeId(self.notice_counter);
        let delay = match kind {
            NoticeKind::Copied => self.settings.copied_notice(),
            NoticeKind::Picked => self.settings.picked_notice(),
        };

        let title = format!("{} - {}", self.settings.window_title, kind.title_suffix());
        self.desktop.set_title_text(&title);
        if let Some(status) = kind.status_text() {
            self.desktop.set_status_text(status);
        }

        let handle = self
            .desktop
            .schedule_once(delay, TimerEvent::NoticeExpired(id));
        self.notice = Some(TransientNotice {
            id,
            kind,
            expires_at: Instant::now() + delay,
            handle,
        });
    }

    fn expire_notice(&mut self, id: NoticeId) {
        match self.notice {
            Some(notice) if notice.id == id => self.notice = None,
            _ => {
                debug!("Ignoring stale notice expiry {id:?}");
                return;
            }
        }
        let status = self.base_status();
        self.desktop.set_title_text(&self.settings.window_title);
        self.desktop.set_status_text(status);
    }

    fn base_status(&self) -> &'static str {
        match self.session.state {
            TrackingState::Idle => READY_STATUS,
            TrackingState::Tracking if self.off_screen => OFF_SCREEN_STATUS,
            TrackingState::Tracking => TRACKING_STATUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_text() {
        let color = Color::from_rgb(99, 102, 241);
        assert_eq!(ColorField::Hex.text(color), "#6366F1");
        assert_eq!(ColorField::Rgb.text(color), "99, 102, 241");
        assert_eq!(ColorField::Hsl.text(color), "238 deg, 84%, 67%");
    }

    #[test]
    fn test_session_starts_idle_at_origin() {
        let session = TrackingSession::new(Color::from_rgb(1, 2, 3));
        assert_eq!(session.state(), TrackingState::Idle);
        assert_eq!(session.last_position(), CursorPosition::new(0, 0));
        assert_eq!(session.last_color(), Color::from_rgb(1, 2, 3));
    }

    #[test]
    fn test_only_picked_notice_touches_status() {
        assert_eq!(NoticeKind::Copied.status_text(), None);
        assert_eq!(NoticeKind::Picked.status_text(), Some(PICKED_STATUS));
    }
}
