//! slint-backed collaborator for the tracker
//!
//! Renders into the [`AppWindow`], runs timers on the slint event loop and
//! writes the clipboard through `arboard`.

use super::sampler::ScrapSampler;
use crate::AppWindow;
use arboard::Clipboard;
use screen_color_picker::desktop::{
    ClipboardSink, CursorPosition, CursorShape, DisplayUpdate, Renderer, Scheduler,
    ScreenSampler, TimerEvent, TimerHandle,
};
use screen_color_picker::{Color, PickerError, Result, Tracker};
use slint::{Timer, TimerMode};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::warn;

pub type SharedTracker = Rc<RefCell<Tracker<SlintDesktop>>>;
type WeakTracker = Weak<RefCell<Tracker<SlintDesktop>>>;

pub struct SlintDesktop {
    ui: slint::Weak<AppWindow>,
    sampler: ScrapSampler,
    /// Kept alive so the X11 selection stays owned after a copy
    clipboard: Option<Clipboard>,
    tracker: WeakTracker,
    timers: Rc<RefCell<HashMap<TimerHandle, Timer>>>,
    next_timer: u64,
}

impl SlintDesktop {
    pub fn new(ui: slint::Weak<AppWindow>, sampler: ScrapSampler, tracker: WeakTracker) -> Self {
        Self {
            ui,
            sampler,
            clipboard: None,
            tracker,
            timers: Rc::new(RefCell::new(HashMap::new())),
            next_timer: 0,
        }
    }

    fn schedule(&mut self, mode: TimerMode, interval: Duration, event: TimerEvent) -> TimerHandle {
        self.next_timer += 1;
        let handle = TimerHandle(self.next_timer);

        let single_shot = matches!(mode, TimerMode::SingleShot);
        let tracker = self.tracker.clone();
        let timers = Rc::downgrade(&self.timers);
        let timer = Timer::default();
        timer.start(mode, interval, move || {
            if let Some(tracker) = tracker.upgrade() {
                match tracker.try_borrow_mut() {
                    Ok(mut tracker) => tracker.on_timer(event),
                    Err(_) => warn!("Tracker busy, dropping {event:?}"),
                }
            }
            if single_shot {
                if let Some(timers) = timers.upgrade() {
                    timers.borrow_mut().remove(&handle);
                }
            }
        });

        self.timers.borrow_mut().insert(handle, timer);
        handle
    }

    fn with_ui(&self, f: impl FnOnce(&AppWindow)) {
        if let Some(ui) = self.ui.upgrade() {
            f(&ui);
        }
    }
}

impl ScreenSampler for SlintDesktop {
    fn cursor_position(&mut self) -> Result<CursorPosition> {
        self.sampler.cursor_position()
    }

    fn pixel_color(&mut self, position: CursorPosition) -> Result<Color> {
        self.sampler.pixel_color(position)
    }

    fn release_capture(&mut self) {
        self.sampler.release_capture();
    }
}

impl ClipboardSink for SlintDesktop {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(|e| PickerError::Clipboard(Box::new(e)))?,
        };
        clipboard
            .set_text(text)
            .map_err(|e| PickerError::Clipboard(Box::new(e)))?;
        // Only a handle that worked is reused; a failed one is reopened next time
        self.clipboard = Some(clipboard);
        Ok(())
    }
}

impl Renderer for SlintDesktop {
    fn render_display(&mut self, update: &DisplayUpdate) {
        self.with_ui(|ui| {
            let (r, g, b) = update.color.channels();
            ui.set_swatch_color(slint::Color::from_rgb_u8(r, g, b));
            ui.set_hex_text(update.hex.as_str().into());
            ui.set_rgb_text(update.rgb.as_str().into());
            ui.set_hsl_text(update.hsl.as_str().into());
            ui.set_coords_text(update.coordinates.as_str().into());
        });
    }

    fn set_status_text(&mut self, text: &str) {
        self.with_ui(|ui| ui.set_status_text(text.into()));
    }

    fn set_title_text(&mut self, text: &str) {
        self.with_ui(|ui| ui.set_window_title(text.into()));
    }

    fn set_track_button_label(&mut self, label: &str) {
        self.with_ui(|ui| ui.set_track_label(label.into()));
    }

    fn set_pick_button_enabled(&mut self, enabled: bool) {
        self.with_ui(|ui| ui.set_pick_enabled(enabled));
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.with_ui(|ui| ui.set_crosshair(shape == CursorShape::Crosshair));
    }
}

impl Scheduler for SlintDesktop {
    fn schedule_repeating(&mut self, interval: Duration, event: TimerEvent) -> TimerHandle {
        self.schedule(TimerMode::Repeated, interval, event)
    }

    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        self.schedule(TimerMode::SingleShot, delay, event)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(timer) = self.timers.borrow_mut().remove(&handle) {
            timer.stop();
        }
    }
}
