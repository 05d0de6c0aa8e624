/// Headless sound handle
///
/// Keeps playback state in memory without an output device. Used by the
/// headless demo session and as a recording double in tests.
use std::time::Duration;

use super::handle::{PlayParams, SoundHandle};
use crate::error::{AudioError, AudioResult};

/// One call received by a [`HeadlessSound`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCall {
    Play(PlayParams),
    Pause,
    Resume,
    Stop,
    SetVolume(f32),
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Playing,
    Paused,
}

#[derive(Debug)]
pub struct HeadlessSound {
    name: String,
    state: State,
    volume: f32,
    position: Duration,
    released: bool,
    fail_play: bool,
    calls: Vec<SoundCall>,
}

impl HeadlessSound {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: State::Idle,
            volume: 1.0,
            position: Duration::ZERO,
            released: false,
            fail_play: false,
            calls: Vec::new(),
        }
    }

    /// A handle whose `play` always fails
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            fail_play: true,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Move the playhead forward while playing
    pub fn advance(&mut self, dt: Duration) {
        if self.state == State::Playing {
            self.position += dt;
        }
    }

    /// Simulate the sound reaching its end
    pub fn finish(&mut self) {
        self.state = State::Idle;
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_paused(&self) -> bool {
        self.state == State::Paused
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn calls(&self) -> &[SoundCall] {
        &self.calls
    }

    pub fn last_play(&self) -> Option<PlayParams> {
        self.calls.iter().rev().find_map(|call| match call {
            SoundCall::Play(params) => Some(*params),
            _ => None,
        })
    }

    pub fn play_count(&self) -> usize {
        self.count(|call| matches!(call, SoundCall::Play(_)))
    }

    pub fn stop_count(&self) -> usize {
        self.count(|call| matches!(call, SoundCall::Stop))
    }

    pub fn count(&self, predicate: impl Fn(&SoundCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl SoundHandle for HeadlessSound {
    fn play(&mut self, params: PlayParams) -> AudioResult<()> {
        self.calls.push(SoundCall::Play(params));
        if self.released {
            return Err(AudioError::Released);
        }
        if self.fail_play {
            return Err(AudioError::Playback(format!("{} refused to play", self.name)));
        }

        self.volume = params.gain;
        self.position = params.seek;
        self.state = State::Playing;
        tracing::debug!(sound = %self.name, gain = params.gain, "play");
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(SoundCall::Pause);
        if self.state == State::Playing {
            self.state = State::Paused;
        }
    }

    fn resume(&mut self) {
        self.calls.push(SoundCall::Resume);
        if self.state == State::Paused {
            self.state = State::Playing;
        }
    }

    fn stop(&mut self) -> AudioResult<()> {
        self.calls.push(SoundCall::Stop);
        self.state = State::Idle;
        self.position = Duration::ZERO;
        tracing::debug!(sound = %self.name, "stop");
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) {
        self.calls.push(SoundCall::SetVolume(gain));
        self.volume = gain;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn is_playing(&self) -> bool {
        self.state == State::Playing
    }

    fn release(&mut self) {
        self.calls.push(SoundCall::Release);
        self.state = State::Idle;
        self.released = true;
    }
}
