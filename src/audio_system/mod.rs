/// Audio system module
///
/// Category-based volume control, music cross-fades and one-shot playback
/// over opaque sound handles.
///
/// ## Architecture
///
/// ```text
/// AudioController
///   ├── VolumeProfile (master, music, sfx, ui)
///   ├── sounds: key -> SharedHandle (+ category, fade generation)
///   ├── PlaybackContext (TweenScheduler or host supplied)
///   └── PersistenceAdapter (FileStore, MemoryStore, NullStore)
///
/// Effective gain = category × master × per-call multiplier
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let scheduler = Arc::new(TweenScheduler::new());
/// let mut audio = AudioController::new(Arc::new(MemoryStore::new()), &AudioConfig::default());
/// audio.register_sound("menu-music", shared(HeadlessSound::new("menu-music")));
/// audio.init(scheduler.clone());
///
/// audio.play_music("menu-music", MusicOptions::default());
/// // once per frame
/// scheduler.tick(frame_time);
/// ```
pub mod category;
pub mod controller;
pub mod fade;
pub mod handle;
pub mod headless;
pub mod manifest;
pub mod mixer;
#[cfg(feature = "rodio-backend")]
pub mod player;
pub mod profile;
pub mod tween;

// Re-export commonly used types
pub use category::Category;
pub use controller::AudioController;
pub use handle::{shared, MusicOptions, PlayOptions, PlayParams, SharedHandle, SoundHandle};
pub use headless::HeadlessSound;
pub use manifest::{find_asset, SoundAsset, SoundCue, SOUND_MANIFEST};
#[cfg(feature = "rodio-backend")]
pub use player::{RodioOutput, RodioSound};
pub use profile::VolumeProfile;
pub use tween::{Interpolation, PlaybackContext, TweenScheduler};
