/// Audio settings persistence
///
/// Saves and loads the user's volume profile and mute flag through a
/// string key/value store.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::audio_system::VolumeProfile;
use crate::error::{AudioError, AudioResult};

/// Storage key for the persisted audio settings
pub const STORAGE_KEY: &str = "gemstone-cascade-audio";

/// Durable string key/value store
pub trait PersistenceAdapter: Send + Sync {
    fn read_string(&self, key: &str) -> AudioResult<Option<String>>;

    fn write_string(&self, key: &str, value: &str) -> AudioResult<()>;
}

/// Persisted audio settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(default)]
    pub volumes: VolumeProfile,

    #[serde(default)]
    pub muted: bool,
}

impl PersistedSettings {
    /// Load settings, falling back to `defaults` (unmuted) on any failure
    pub fn load(store: &dyn PersistenceAdapter, key: &str, defaults: VolumeProfile) -> Self {
        let fallback = Self {
            volumes: defaults,
            muted: false,
        };

        let json = match store.read_string(key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!("No saved audio settings under {}, using defaults", key);
                return fallback;
            }
            Err(e) => {
                tracing::warn!("Failed to read audio settings: {}", e);
                return fallback;
            }
        };

        match serde_json::from_str::<serde_json::Value>(&json) {
            Ok(value) => Self::from_value(value, defaults).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed audio settings: {}", e);
                fallback
            }),
            Err(e) => {
                tracing::warn!("Failed to parse audio settings: {}", e);
                fallback
            }
        }
    }

    /// Missing volume fields take the configured defaults.
    fn from_value(value: serde_json::Value, defaults: VolumeProfile) -> AudioResult<Self> {
        let mut merged = serde_json::to_value(defaults)?;
        if let (Some(base), Some(saved)) = (
            merged.as_object_mut(),
            value.get("volumes").and_then(|v| v.as_object()),
        ) {
            for (name, gain) in saved {
                base.insert(name.clone(), gain.clone());
            }
        }

        let volumes: VolumeProfile = serde_json::from_value(merged)?;
        let muted = value.get("muted").and_then(|v| v.as_bool()).unwrap_or(false);

        Ok(Self {
            volumes: volumes.sanitized(),
            muted,
        })
    }

    pub fn save(&self, store: &dyn PersistenceAdapter, key: &str) -> AudioResult<()> {
        let json = serde_json::to_string(self)?;
        store.write_string(key, &json)?;
        tracing::debug!("Saved audio settings under {}", key);
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform config directory
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("GemstoneCascade")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PersistenceAdapter for FileStore {
    fn read_string(&self, key: &str) -> AudioResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| AudioError::Persistence {
                key: key.to_string(),
                source,
            })
    }

    fn write_string(&self, key: &str, value: &str) -> AudioResult<()> {
        let to_error = |source| AudioError::Persistence {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(to_error)?;
        std::fs::write(self.path_for(key), value).map_err(to_error)
    }
}

/// Shared in-memory store.
///
/// Clones share the same entries, which lets a fresh controller load what a
/// previous one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }
}

impl PersistenceAdapter for MemoryStore {
    fn read_string(&self, key: &str) -> AudioResult<Option<String>> {
        Ok(self.get(key))
    }

    fn write_string(&self, key: &str, value: &str) -> AudioResult<()> {
        self.insert(key, value);
        Ok(())
    }
}

/// Store that keeps nothing, for hosts without a writable config directory
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl PersistenceAdapter for NullStore {
    fn read_string(&self, _key: &str) -> AudioResult<Option<String>> {
        Ok(None)
    }

    fn write_string(&self, _key: &str, _value: &str) -> AudioResult<()> {
        Ok(())
    }
}
