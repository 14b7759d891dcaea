use std::path::PathBuf;

use crate::core::image::AugmentationConfig;

/// Application configuration containing all hardcoded values
///
/// Persisted user choices live in `Settings`; these are the values used
/// before anything has been saved.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_dataset_path: PathBuf,
    pub default_target_count: usize,
    pub window_width: f32,
    pub window_height: f32,
    pub side_panel_width: f32,
    /// Extensions counted as images (empty = every file)
    pub image_extensions: Vec<String>,
    pub augmentation: AugmentationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_dataset_path: PathBuf::from("dataset"),
            default_target_count: 100,
            window_width: 1000.0,
            window_height: 700.0,
            side_panel_width: 300.0,
            image_extensions: Vec::new(),
            augmentation: AugmentationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts_every_file() {
        let config = AppConfig::default();
        assert!(config.image_extensions.is_empty());
        assert!(config.default_target_count > 0);
        assert_eq!(config.augmentation, AugmentationConfig::default());
    }
}
