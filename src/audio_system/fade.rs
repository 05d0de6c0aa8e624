/// Music fades
///
/// Fade-in starts a handle silent and ramps it to its target gain; fade-out
/// ramps it to zero and stops it at the end. Both go through the bound
/// playback context and degrade to immediate changes when none is bound.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::handle::{PlayParams, SharedHandle};
use super::tween::{Interpolation, PlaybackContext};
use crate::error::AudioResult;

/// Per-sound fade counter.
///
/// Every fade bumps it; a completion only acts when its generation is
/// still the current one.
#[derive(Debug, Clone, Default)]
pub struct FadeGeneration(Arc<AtomicU64>);

impl FadeGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return it
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// Start `handle` at gain 0 and ramp it to `params.gain` over `duration`.
pub fn fade_in(
    context: Option<&dyn PlaybackContext>,
    handle: &SharedHandle,
    generation: &FadeGeneration,
    params: PlayParams,
    duration: Duration,
) -> AudioResult<()> {
    generation.bump();

    let Some(context) = context else {
        return handle.lock().play(params);
    };

    handle.lock().play(PlayParams { gain: 0.0, ..params })?;
    context.schedule(Interpolation::gain(
        Arc::clone(handle),
        0.0,
        params.gain,
        duration,
    ));
    Ok(())
}

/// Ramp `handle` to silence over `duration`, then stop it once.
///
/// A handle that is not audibly playing (paused or never started) is
/// stopped right away.
pub fn fade_out(
    context: Option<&dyn PlaybackContext>,
    handle: &SharedHandle,
    generation: &FadeGeneration,
    duration: Duration,
    key: &str,
) {
    let current = generation.bump();
    let (playing, from) = {
        let handle = handle.lock();
        (handle.is_playing(), handle.volume())
    };

    match context {
        Some(context) if playing => {
            let target = Arc::clone(handle);
            let generation = generation.clone();
            let key = key.to_string();
            context.schedule(
                Interpolation::gain(Arc::clone(handle), from, 0.0, duration).on_complete(
                    move || {
                        if !generation.is_current(current) {
                            tracing::debug!("Dropped stale fade-out completion for {}", key);
                            return;
                        }
                        if let Err(e) = target.lock().stop() {
                            tracing::warn!("Failed to stop {} after fade-out: {}", key, e);
                        }
                    },
                ),
            );
        }
        _ => {
            if let Some(context) = context {
                context.cancel(handle);
            }
            if let Err(e) = handle.lock().stop() {
                tracing::warn!("Failed to stop {}: {}", key, e);
            }
        }
    }
}
