//! System-wide pick shortcut (Ctrl+Super+C)

use crate::AppWindow;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use screen_color_picker::{PickerError, Result};
use tracing::{debug, info};

/// Keeps the shortcut registered for as long as it is alive
pub struct PickHotkey {
    _manager: GlobalHotKeyManager,
}

/// Register the shortcut and forward presses to the window's pick callback.
///
/// The listener thread never touches tracker state; it only queues
/// `pick-color` on the event loop.
pub fn register(ui: slint::Weak<AppWindow>) -> Result<PickHotkey> {
    let manager = GlobalHotKeyManager::new().map_err(|e| PickerError::Hotkey(Box::new(e)))?;
    let hotkey = HotKey::new(Some(Modifiers::META | Modifiers::CONTROL), Code::KeyC);
    manager
        .register(hotkey)
        .map_err(|e| PickerError::Hotkey(Box::new(e)))?;
    let hotkey_id = hotkey.id();

    std::thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if event.id != hotkey_id || event.state != HotKeyState::Pressed {
                continue;
            }
            debug!("Pick hotkey pressed");
            let result = ui.upgrade_in_event_loop(|ui| ui.invoke_pick_color());
            if result.is_err() {
                // Event loop is gone
                break;
            }
        }
    });

    info!("Registered Ctrl+Super+C as pick shortcut");
    Ok(PickHotkey { _manager: manager })
}
