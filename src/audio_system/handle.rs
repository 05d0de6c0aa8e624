/// Playable sound handles
///
/// The controller never touches samples. Each registered sound is an opaque
/// handle produced by the playback backend and driven through this trait.
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::AudioResult;

/// Parameters for a single `play` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayParams {
    /// Output gain (0.0-1.0)
    pub gain: f32,

    /// Playback rate multiplier, independent of gain
    pub rate: f32,

    /// Pitch offset in cents
    pub detune: f32,

    /// Start position within the sound
    pub seek: Duration,

    /// Delay before playback starts
    pub delay: Duration,

    /// Restart from the beginning when the end is reached
    pub looped: bool,
}

impl Default for PlayParams {
    fn default() -> Self {
        Self {
            gain: 1.0,
            rate: 1.0,
            detune: 0.0,
            seek: Duration::ZERO,
            delay: Duration::ZERO,
            looped: false,
        }
    }
}

impl PlayParams {
    /// Combined speed factor: rate scaled by the detune offset.
    pub fn speed(&self) -> f32 {
        self.rate * 2f32.powf(self.detune / 1200.0)
    }
}

/// An opaque playable resource
pub trait SoundHandle: Send {
    /// Start playback from `params.seek`, replacing any current playback
    fn play(&mut self, params: PlayParams) -> AudioResult<()>;

    /// Pause, keeping the playback position
    fn pause(&mut self);

    /// Continue from the paused position
    fn resume(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self) -> AudioResult<()>;

    fn set_volume(&mut self, gain: f32);

    fn volume(&self) -> f32;

    /// True while audible output is in progress (false when paused or stopped)
    fn is_playing(&self) -> bool;

    /// Stop unconditionally and free backend resources
    fn release(&mut self);
}

/// Handle shared between the registry and in-flight interpolations
pub type SharedHandle = Arc<Mutex<dyn SoundHandle>>;

pub fn shared<H: SoundHandle + 'static>(handle: H) -> SharedHandle {
    Arc::new(Mutex::new(handle))
}

/// Options for one-shot playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    pub volume_multiplier: f32,
    pub rate: f32,
    pub detune: f32,
    pub seek: Duration,
    pub delay: Duration,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            volume_multiplier: 1.0,
            rate: 1.0,
            detune: 0.0,
            seek: Duration::ZERO,
            delay: Duration::ZERO,
        }
    }
}

impl PlayOptions {
    pub fn with_volume(mut self, multiplier: f32) -> Self {
        self.volume_multiplier = multiplier;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune = cents;
        self
    }

    pub fn with_seek(mut self, seek: Duration) -> Self {
        self.seek = seek;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Options for background music
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicOptions {
    pub volume_multiplier: f32,
    pub rate: f32,
    pub looped: bool,
}

impl Default for MusicOptions {
    fn default() -> Self {
        Self {
            volume_multiplier: 1.0,
            rate: 1.0,
            looped: true,
        }
    }
}

impl MusicOptions {
    pub fn with_volume(mut self, multiplier: f32) -> Self {
        self.volume_multiplier = multiplier;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn once(mut self) -> Self {
        self.looped = false;
        self
    }
}
