use thiserror::Error;

/// Errors raised by sound handles, stores and the config layer.
///
/// The controller never hands these to its callers: every failure is logged
/// and the operation degrades to a no-op. They surface only from the
/// collaborator traits and from [`crate::config::AudioConfig`].

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio asset: {path}")]
    AssetLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode audio format")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to initialize audio output stream")]
    StreamInit(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Audio playback failed: {0}")]
    Playback(String),

    #[error("Sound handle already released")]
    Released,

    #[error("Unknown volume category: {0}")]
    UnknownCategory(String),

    #[error("Persistence failed for key {key}")]
    Persistence {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize audio settings")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type AudioResult<T> = Result<T, AudioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = AudioError::UnknownCategory("voice".to_string());
        assert_eq!(err.to_string(), "Unknown volume category: voice");

        let err = AudioError::Playback("sink closed".to_string());
        assert_eq!(err.to_string(), "Audio playback failed: sink closed");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err = AudioError::Persistence {
            key: "gemstone-cascade-audio".to_string(),
            source: io_err,
        };

        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Persistence failed for key gemstone-cascade-audio"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: AudioError = parse_err.into();
        assert!(matches!(err, AudioError::Serialization(_)));
    }
}
