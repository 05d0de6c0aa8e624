//! Audio orchestration for the Gemstone Cascade match-3 game.
//!
//! Category volumes, background music cross-fades, one-shot effects, mute
//! and persisted user settings, over sound handles supplied by a playback
//! backend.

pub mod audio_system;
pub mod config;
pub mod error;
pub mod messaging;
pub mod persistence;

pub use audio_system::{AudioController, Category, MusicOptions, PlayOptions, VolumeProfile};
pub use config::AudioConfig;
pub use error::{AudioError, AudioResult, ConfigError};
