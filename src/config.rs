use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio_system::VolumeProfile;
use crate::error::ConfigError;
use crate::persistence::STORAGE_KEY;

fn default_fade_duration_ms() -> u64 {
    1000
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets").join("audio")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Music cross-fade length in milliseconds; stops use half of it
    #[serde(default = "default_fade_duration_ms")]
    pub fade_duration_ms: u64,

    /// Key the user's settings are stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Profile used when nothing (or nothing valid) was saved
    #[serde(default)]
    pub default_volumes: VolumeProfile,

    /// Directory the sound manifest paths are relative to
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fade_duration_ms: default_fade_duration_ms(),
            storage_key: default_storage_key(),
            default_volumes: VolumeProfile::default(),
            asset_root: default_asset_root(),
        }
    }
}

impl AudioConfig {
    /// Load from the platform config directory, writing defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Self::default();
            config.save_to(&path)?;
            tracing::info!("Created default audio config at: {}", path.display());
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: AudioConfig =
            serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;

        tracing::info!("Loaded audio config from: {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("GemstoneCascade").join("audio-config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        Ok(())
    }
}
