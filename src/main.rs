#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod gui;

use anyhow::{Context, Result};
use gui::{ScrapSampler, SharedTracker, SlintDesktop};
use screen_color_picker::config::Settings;
use screen_color_picker::{logging, ColorField, Tracker};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{error, info, warn};

fn copy_field(target: CopyTarget) -> ColorField {
    match target {
        CopyTarget::Hex => ColorField::Hex,
        CopyTarget::Rgb => ColorField::Rgb,
        CopyTarget::Hsl => ColorField::Hsl,
    }
}

/// Run `f` on the tracker if it is still alive and not already borrowed
fn with_tracker(
    tracker: &Weak<RefCell<Tracker<SlintDesktop>>>,
    f: impl FnOnce(&mut Tracker<SlintDesktop>),
) {
    let Some(tracker) = tracker.upgrade() else {
        return;
    };
    match tracker.try_borrow_mut() {
        Ok(mut tracker) => f(&mut tracker),
        Err(_) => warn!("Tracker busy, ignoring UI event"),
    };
}

fn wire_callbacks(ui: &AppWindow, tracker: &SharedTracker) {
    let weak = Rc::downgrade(tracker);
    ui.on_toggle_tracking(move || with_tracker(&weak, Tracker::toggle));

    let weak = Rc::downgrade(tracker);
    ui.on_pick_color(move || {
        with_tracker(&weak, |tracker| {
            tracker.pick_once();
        });
    });

    let weak = Rc::downgrade(tracker);
    ui.on_escape_pressed(move || with_tracker(&weak, Tracker::escape));

    let weak = Rc::downgrade(tracker);
    ui.on_copy_value(move |target| {
        with_tracker(&weak, |tracker| {
            tracker.copy(copy_field(target));
        });
    });

    let weak = Rc::downgrade(tracker);
    ui.window().on_close_requested(move || {
        with_tracker(&weak, Tracker::shutdown);
        slint::CloseRequestResponse::HideWindow
    });
}

fn main() -> Result<()> {
    logging::init_logging();
    info!("Screen Color Picker v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load();
    let ui = AppWindow::new().context("Failed to create main window")?;

    let sampler = ScrapSampler::new().context("Failed to open cursor tracking")?;
    let ui_weak = ui.as_weak();
    let tracker_settings = settings.clone();
    let tracker: SharedTracker = Rc::new_cyclic(|weak| {
        let desktop = SlintDesktop::new(ui_weak.clone(), sampler, weak.clone());
        RefCell::new(Tracker::new(desktop, tracker_settings))
    });
    tracker.borrow_mut().refresh();
    wire_callbacks(&ui, &tracker);

    let _hotkey = if settings.global_hotkey {
        match gui::hotkey::register(ui.as_weak()) {
            Ok(hotkey) => Some(hotkey),
            Err(e) => {
                error!("Pick shortcut unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    ui.run().context("Event loop failed")?;
    info!("Screen Color Picker exiting");
    Ok(())
}
