use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const SETTINGS_FILE: &str = "settings.json";

/// Persistent user settings that are saved between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Last parent dataset folder that was opened
    pub last_dataset_path: Option<PathBuf>,

    /// Last target count entered
    #[serde(default)]
    pub last_target_count: Option<usize>,

    /// RNG seed for reproducible runs; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,

    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_dataset_path: None,
            last_target_count: None,
            seed: None,
            window_width: 1000.0,
            window_height: 700.0,
        }
    }
}

impl Settings {
    /// Path of the settings file in the platform config directory
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dataset-balancer")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Load settings from the platform config directory
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(config_path) => Self::load_from(&config_path),
            None => {
                warn!("Could not determine config directory. Using defaults.");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, or return defaults if the file is missing
    /// or corrupted
    pub fn load_from(path: &Path) -> Self {
        info!("Loading settings from: {:?}", path);

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(settings) => {
                    info!("Successfully loaded settings");
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings file: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!("No settings file found. Using defaults.");
                } else {
                    warn!("Failed to read settings file: {}. Using defaults.", e);
                }
                Self::default()
            }
        }
    }

    /// Save settings to the platform config directory
    pub fn save(&self) {
        match Self::get_config_path() {
            Some(config_path) => self.save_to(&config_path),
            None => warn!("Could not determine config directory. Settings not saved."),
        }
    }

    /// Save settings to `path`; failures are logged, never fatal
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => info!("Settings saved to: {:?}", path),
                Err(e) => warn!("Failed to write settings file: {}", e),
            },
            Err(e) => warn!("Failed to serialize settings: {}", e),
        }
    }
}
