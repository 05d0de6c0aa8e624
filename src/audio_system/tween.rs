//! Scheduled interpolation of sound gains.
//!
//! The controller never blocks on a fade. It registers an [`Interpolation`]
//! with the bound [`PlaybackContext`] and returns; the host advances time
//! from its update loop and completions fire on a later tick.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::handle::SharedHandle;

/// Callback run once an interpolation reaches its end value
pub type Completion = Box<dyn FnOnce() + Send>;

/// Handle property driven by an interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Gain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
}

impl Easing {
    /// Map linear progress (0.0-1.0) to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
        }
    }
}

/// A ramp of one field of a handle from `from` to `to`
pub struct Interpolation {
    pub target: SharedHandle,
    pub field: Field,
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
    pub on_complete: Option<Completion>,
}

impl Interpolation {
    /// Linear gain ramp with no completion callback
    pub fn gain(target: SharedHandle, from: f32, to: f32, duration: Duration) -> Self {
        Self {
            target,
            field: Field::Gain,
            from,
            to,
            duration,
            easing: Easing::Linear,
            on_complete: None,
        }
    }

    pub fn on_complete(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Value at `elapsed` time into the ramp
    pub fn value_at(&self, elapsed: Duration) -> f32 {
        let t = self.progress(elapsed);
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    fn apply(&self, value: f32) {
        let mut handle = self.target.lock();
        match self.field {
            Field::Gain => handle.set_volume(value),
        }
    }
}

/// Time-driven interpolation facility supplied by the host
pub trait PlaybackContext: Send + Sync {
    /// Register an interpolation. Must not block.
    fn schedule(&self, interpolation: Interpolation);

    /// Drop pending interpolations on `target` without running completions.
    fn cancel(&self, _target: &SharedHandle) {}

    /// Point a pending interpolation on `target` at a new end value, keeping
    /// its remaining time. Returns false when nothing is animating `target`.
    fn retarget(&self, _target: &SharedHandle, _to: f32) -> bool {
        false
    }
}

/// Identity comparison that ignores vtable pointers
pub fn same_handle(a: &SharedHandle, b: &SharedHandle) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

struct ActiveTween {
    interpolation: Interpolation,
    elapsed: Duration,
}

/// Tick-driven [`PlaybackContext`].
///
/// Scheduling a ramp on a handle that is already animating replaces the old
/// ramp; the replaced ramp's completion never runs.
#[derive(Default)]
pub struct TweenScheduler {
    active: Mutex<Vec<ActiveTween>>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every ramp by `dt`, returning how many finished.
    ///
    /// Completions run after the scheduler lock is released, so they may
    /// schedule new ramps.
    pub fn tick(&self, dt: Duration) -> usize {
        let mut finished = Vec::new();
        {
            let mut active = self.active.lock();
            active.retain_mut(|tween| {
                tween.elapsed += dt;
                let value = tween.interpolation.value_at(tween.elapsed);
                tween.interpolation.apply(value);

                if tween.elapsed >= tween.interpolation.duration {
                    finished.push(tween.interpolation.on_complete.take());
                    false
                } else {
                    true
                }
            });
        }

        let count = finished.len();
        for callback in finished.into_iter().flatten() {
            callback();
        }
        count
    }

    /// Run every pending ramp to its end value.
    pub fn finish_all(&self) -> usize {
        let longest = self
            .active
            .lock()
            .iter()
            .map(|tween| tween.interpolation.duration.saturating_sub(tween.elapsed))
            .max()
            .unwrap_or(Duration::ZERO);
        self.tick(longest)
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_animating(&self, target: &SharedHandle) -> bool {
        self.active
            .lock()
            .iter()
            .any(|tween| same_handle(&tween.interpolation.target, target))
    }
}

impl PlaybackContext for TweenScheduler {
    fn schedule(&self, interpolation: Interpolation) {
        let mut active = self.active.lock();
        let before = active.len();
        active.retain(|tween| !same_handle(&tween.interpolation.target, &interpolation.target));
        if active.len() != before {
            tracing::debug!("Superseded in-flight interpolation");
        }
        active.push(ActiveTween {
            interpolation,
            elapsed: Duration::ZERO,
        });
    }

    fn cancel(&self, target: &SharedHandle) {
        self.active
            .lock()
            .retain(|tween| !same_handle(&tween.interpolation.target, target));
    }

    fn retarget(&self, target: &SharedHandle, to: f32) -> bool {
        let mut active = self.active.lock();
        let Some(tween) = active
            .iter_mut()
            .find(|tween| same_handle(&tween.interpolation.target, target))
        else {
            return false;
        };

        let elapsed = tween.elapsed;
        let interpolation = &mut tween.interpolation;
        interpolation.from = interpolation.value_at(elapsed);
        interpolation.to = to;
        interpolation.duration = interpolation.duration.saturating_sub(elapsed);
        tween.elapsed = Duration::ZERO;
        true
    }
}
