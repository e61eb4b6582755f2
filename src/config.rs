//! Runtime settings
//!
//! Read once at startup from `config.json` in the user's config directory.
//! The file is optional and never written; missing or unreadable files fall
//! back to the defaults.

use crate::color::Color;
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const APP_DIR: &str = "screen-color-picker";

/// Color shown before the first sample
pub const DEFAULT_COLOR: Color = Color::from_rgb(99, 102, 241);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Polling cadence while tracking (~30 Hz)
    pub sample_interval_ms: u64,
    pub copied_notice_ms: u64,
    pub picked_notice_ms: u64,
    pub initial_color: Color,
    pub window_title: String,
    /// Register Ctrl+Super+C as a system-wide pick shortcut
    pub global_hotkey: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_interval_ms: 33,
            copied_notice_ms: 1500,
            picked_notice_ms: 2500,
            initial_color: DEFAULT_COLOR,
            window_title: "Color Picker".to_string(),
            global_hotkey: true,
        }
    }
}

impl Settings {
    /// Load settings from the default location, using defaults on any failure
    pub fn load() -> Self {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(Some(settings)) => {
                info!("Settings loaded from {}", path.display());
                settings
            }
            Ok(None) => {
                info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Failed to read settings from {}, using defaults: {e}", path.display());
                Self::default()
            }
        }
    }

    /// `Ok(None)` when the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    pub fn sample_interval(&self) -> Duration {
        millis_at_least_one(self.sample_interval_ms)
    }

    pub fn copied_notice(&self) -> Duration {
        millis_at_least_one(self.copied_notice_ms)
    }

    pub fn picked_notice(&self) -> Duration {
        millis_at_least_one(self.picked_notice_ms)
    }
}

fn millis_at_least_one(ms: u64) -> Duration {
    Duration::from_millis(ms.max(1))
}

/// `$XDG_CONFIG_HOME/screen-color-picker/config.json`, then
/// `$HOME/.config/...`, then the working directory.
pub fn config_path() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(dir).join(APP_DIR).join("config.json");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.json");
    }
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join(APP_DIR).join("config.json");
    }
    PathBuf::from("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PickerError;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.sample_interval(), Duration::from_millis(33));
        assert_eq!(settings.copied_notice(), Duration::from_millis(1500));
        assert_eq!(settings.picked_notice(), Duration::from_millis(2500));
        assert_eq!(settings.initial_color.hex(), "#6366F1");
        assert!(settings.global_hotkey);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&dir.path().join("config.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r##"{ "sample_interval_ms": 50, "initial_color": "#112233", "global_hotkey": false }"##,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap().unwrap();
        assert_eq!(settings.sample_interval(), Duration::from_millis(50));
        assert_eq!(settings.initial_color, Color::from_rgb(0x11, 0x22, 0x33));
        assert!(!settings.global_hotkey);
        assert_eq!(settings.picked_notice_ms, 2500);
        assert_eq!(settings.window_title, "Color Picker");
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "initial_color": "purple" }"#).unwrap();

        let result = Settings::load_from(&path);
        assert!(matches!(result, Err(PickerError::JsonError(_))));
    }

    #[test]
    fn test_zero_durations_are_clamped() {
        let settings = Settings {
            sample_interval_ms: 0,
            copied_notice_ms: 0,
            ..Settings::default()
        };
        assert_eq!(settings.sample_interval(), Duration::from_millis(1));
        assert_eq!(settings.copied_notice(), Duration::from_millis(1));
    }
}
