/// Application configuration
///
/// A small JSON file holding the knobs that are not worth a settings dialog:
/// which camera to open and how fast the acquisition ticks run. Missing or
/// malformed files fall back to defaults so the app always starts.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Index of the camera device opened by the Live toggle
    pub camera_index: u32,
    /// Acquisition tick period while live, in milliseconds
    pub live_interval_ms: u64,
    /// Acquisition tick period during video playback, in milliseconds
    pub video_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            live_interval_ms: 30,
            video_interval_ms: 70,
        }
    }
}

impl AppConfig {
    /// Path of the config file:
    /// - Linux: ~/.config/barcode-reader/config.json
    /// - macOS: ~/Library/Application Support/barcode-reader/config.json
    /// - Windows: %APPDATA%\barcode-reader\config.json
    pub fn path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("barcode-reader");
        path.push("config.json");
        Some(path)
    }

    /// Load the configuration from the default location, falling back to
    /// defaults when the file is absent or unreadable.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("no config directory available, using defaults");
                Self::default()
            }
        }
    }

    fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            // Absent file is the common first-run case, not worth a warning
            Err(_) => Self::default(),
        }
    }

    /// Persist the configuration to the default location.
    pub fn save(&self) -> Result<(), Error> {
        let Some(path) = Self::path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.camera_index, 0);
        assert_eq!(config.live_interval_ms, 30);
        assert_eq!(config.video_interval_ms, 70);
    }

    #[test]
    fn test_json_round_trip() {
        let config = AppConfig {
            camera_index: 2,
            live_interval_ms: 16,
            video_interval_ms: 40,
        };

        let json = serde_json::to_string(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "camera_index": 1 }"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.camera_index, 1);
        assert_eq!(config.live_interval_ms, 30);
    }
}
