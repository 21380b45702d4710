use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::models::OrientationHint;
use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreprocessingSettings {
    pub enabled: bool,
    pub scale_factor: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub sharpness: f32,
    pub sharpen_radius: f32,
}

impl Default for PreprocessingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            scale_factor: global_constants::DEFAULT_UPSCALE_FACTOR,
            contrast: global_constants::DEFAULT_CONTRAST,
            saturation: global_constants::DEFAULT_SATURATION,
            brightness: global_constants::DEFAULT_BRIGHTNESS,
            sharpness: global_constants::DEFAULT_SHARPNESS,
            sharpen_radius: global_constants::DEFAULT_SHARPEN_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NeuralEngineSettings {
    /// Ordered by priority.
    pub recognition_languages: Vec<String>,
    pub accurate_recognition: bool,
    pub uses_language_correction: bool,
    pub automatically_detects_language: bool,
    /// Used where the platform has no native text recognizer.
    pub fallback_tesseract_language: String,
}

impl Default for NeuralEngineSettings {
    fn default() -> Self {
        Self {
            recognition_languages: global_constants::VISION_RECOGNITION_LANGUAGES
                .iter()
                .map(|language| language.to_string())
                .collect(),
            accurate_recognition: true,
            uses_language_correction: true,
            automatically_detects_language: true,
            fallback_tesseract_language: global_constants::HORIZONTAL_TESSERACT_LANGUAGE
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainableEngineSettings {
    pub language: String,
    pub page_segmentation_mode: i32,
    pub engine_mode: i32,
    pub jpeg_quality: u8,
}

impl Default for TrainableEngineSettings {
    fn default() -> Self {
        Self {
            language: global_constants::VERTICAL_TESSERACT_LANGUAGE.to_string(),
            page_segmentation_mode: global_constants::PSM_SINGLE_BLOCK_VERTICAL_TEXT,
            engine_mode: global_constants::OEM_LSTM_ONLY,
            jpeg_quality: global_constants::DEFAULT_JPEG_QUALITY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderSettings {
    pub default_orientation: OrientationHint,
    pub run_both_engines: bool,
    pub engine_timeout_seconds: u64,
    pub preprocessing: PreprocessingSettings,
    pub neural_engine: NeuralEngineSettings,
    pub trainable_engine: TrainableEngineSettings,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            default_orientation: OrientationHint::default(),
            run_both_engines: false,
            engine_timeout_seconds: global_constants::DEFAULT_ENGINE_TIMEOUT_SECONDS,
            preprocessing: PreprocessingSettings::default(),
            neural_engine: NeuralEngineSettings::default(),
            trainable_engine: TrainableEngineSettings::default(),
        }
    }
}

impl ReaderSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;
        Self::load_from_path(&settings_path)
    }

    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!(
                "{} No settings file found at {:?}, using defaults",
                global_constants::LOG_TAG_SETTINGS,
                settings_path
            );
            let default_settings = Self::default();
            default_settings.save_to_path(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)?;
        let settings: ReaderSettings = serde_json::from_str(&contents)?;

        log::info!(
            "{} Loaded settings from {:?}",
            global_constants::LOG_TAG_SETTINGS,
            settings_path
        );
        log::debug!(
            "{} Default orientation: {}, run both engines: {}, timeout: {}s",
            global_constants::LOG_TAG_SETTINGS,
            settings.default_orientation,
            settings.run_both_engines,
            settings.engine_timeout_seconds
        );

        Ok(settings)
    }

    pub fn save_to_path(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!(
            "{} Saved settings to {:?}",
            global_constants::LOG_TAG_SETTINGS,
            settings_path
        );
        Ok(())
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_seconds.max(1))
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::SETTINGS_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_settings_default_values() {
        let settings = ReaderSettings::default();

        assert_eq!(settings.default_orientation, OrientationHint::Unspecified);
        assert!(!settings.run_both_engines);
        assert_eq!(settings.engine_timeout_seconds, 30);
        assert_eq!(settings.preprocessing.scale_factor, 2.0);
        assert_eq!(settings.preprocessing.contrast, 1.5);
        assert_eq!(settings.preprocessing.saturation, 0.0);
        assert_eq!(settings.neural_engine.recognition_languages, vec!["ja", "en"]);
        assert_eq!(settings.trainable_engine.language, "jpn_vert");
        assert_eq!(settings.trainable_engine.page_segmentation_mode, 5);
        assert_eq!(settings.trainable_engine.engine_mode, 1);
    }

    #[test]
    fn test_reader_settings_deserialization_fills_missing_fields() {
        let json = r#"{
            "default_orientation": "Vertical",
            "preprocessing": { "enabled": false }
        }"#;

        let settings: ReaderSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.default_orientation, OrientationHint::Vertical);
        assert!(!settings.preprocessing.enabled);
        assert_eq!(settings.preprocessing.sharpness, 1.0);
        assert_eq!(settings.engine_timeout_seconds, 30);
        assert_eq!(settings.trainable_engine.jpeg_quality, 100);
    }

    #[test]
    fn test_engine_timeout_is_never_zero() {
        let settings = ReaderSettings {
            engine_timeout_seconds: 0,
            ..ReaderSettings::default()
        };

        assert_eq!(settings.engine_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_path_writes_defaults_when_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings_path = temp_dir.path().join("nested").join("settings.json");

        let settings = ReaderSettings::load_from_path(&settings_path).unwrap();

        assert_eq!(settings, ReaderSettings::default());
        assert!(settings_path.exists());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let mut original_settings = ReaderSettings::default();
        original_settings.default_orientation = OrientationHint::Horizontal;
        original_settings.run_both_engines = true;
        original_settings.engine_timeout_seconds = 5;
        original_settings.trainable_engine.language = "jpn".to_string();

        original_settings.save_to_path(&settings_path).unwrap();
        let loaded_settings = ReaderSettings::load_from_path(&settings_path).unwrap();

        assert_eq!(loaded_settings, original_settings);
    }

    #[test]
    fn test_load_from_path_rejects_malformed_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        std::fs::write(&settings_path, "{ not json").unwrap();

        assert!(ReaderSettings::load_from_path(&settings_path).is_err());
    }
}
