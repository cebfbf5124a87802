//! Game settings and preferences
//!
//! Stored as JSON next to the player records.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::mode::GameMode;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode started from the command line / headless runner
    pub mode: GameMode,
    /// Fixed run seed; a fresh one is drawn per session when unset
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === HUD ===
    /// Draw the jump preview while charging
    pub show_trajectory: bool,

    /// Directory holding the records file
    pub data_dir: PathBuf,
    /// Headless runs stop after this many ticks
    pub max_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            seed: None,

            master_volume: 0.8,
            music_volume: 0.5,

            show_trajectory: true,

            data_dir: PathBuf::from("data"),
            max_ticks: 60 * 60 * 5,
        }
    }
}

impl Settings {
    /// Settings file name inside the working directory
    pub const FILE_NAME: &'static str = "settings.json";

    /// Effective music volume (master applied), clamped to 0..=1
    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    /// Clamp out-of-range values from hand-edited files
    fn sanitize(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => {
                log::info!("Using default settings");
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&data) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitize()
            }
            Err(err) => {
                log::warn!("Ignoring unreadable settings at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings to `path` (write tmp, then rename)
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(Settings::FILE_NAME));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Settings::FILE_NAME);
        let settings = Settings {
            mode: GameMode::Ice,
            seed: Some(77),
            show_trajectory: false,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Settings::FILE_NAME);
        fs::write(&path, r#"{ "mode": "lava", "music_volume": 3.0 }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.mode, GameMode::Lava);
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.max_ticks, Settings::default().max_ticks);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Settings::FILE_NAME);
        fs::write(&path, "mode = lava").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_effective_music_volume() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.5,
            ..Settings::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.25);
    }
}
