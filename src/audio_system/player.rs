/// Rodio playback backend
///
/// [`RodioOutput`] owns the device stream and must stay alive on the thread
/// that opened it. The [`RodioSound`] handles it creates only hold a stream
/// handle, so they can be shared with the controller.
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::handle::{shared, PlayParams, SharedHandle, SoundHandle};
use super::manifest::SoundAsset;
use crate::error::{AudioError, AudioResult};

/// The default output device
pub struct RodioOutput {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioOutput {
    pub fn open() -> AudioResult<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::StreamInit(Box::new(e)))?;
        tracing::info!("Opened default audio output");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Create a handle over encoded audio bytes
    pub fn sound(&self, key: &str, data: Vec<u8>) -> AudioResult<RodioSound> {
        RodioSound::new(key, Arc::new(data), self.stream_handle.clone())
    }

    /// Load a manifest asset from `root` into a shared handle
    pub fn load_asset(&self, asset: &SoundAsset, root: &Path) -> AudioResult<SharedHandle> {
        let data = asset.load_bytes(root)?;
        Ok(shared(self.sound(asset.key, data)?))
    }
}

pub struct RodioSound {
    key: String,
    audio_data: Arc<Vec<u8>>,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: f32,
    released: bool,
}

impl RodioSound {
    pub fn new(
        key: impl Into<String>,
        audio_data: Arc<Vec<u8>>,
        stream_handle: OutputStreamHandle,
    ) -> AudioResult<Self> {
        let key = key.into();

        // Verify the audio can be decoded
        Decoder::new(Cursor::new((*audio_data).clone()))
            .map_err(|e| AudioError::Decode(Box::new(e)))?;

        tracing::debug!("Created rodio sound {} ({} bytes)", key, audio_data.len());

        Ok(Self {
            key,
            audio_data,
            stream_handle,
            sink: None,
            volume: 1.0,
            released: false,
        })
    }

    fn build_source(&self, params: &PlayParams) -> AudioResult<Box<dyn Source<Item = i16> + Send>> {
        let cursor = Cursor::new((*self.audio_data).clone());
        let mut source: Box<dyn Source<Item = i16> + Send> = if params.looped {
            Box::new(Decoder::new_looped(cursor).map_err(|e| AudioError::Decode(Box::new(e)))?)
        } else {
            Box::new(Decoder::new(cursor).map_err(|e| AudioError::Decode(Box::new(e)))?)
        };

        if !params.seek.is_zero() {
            source = Box::new(source.skip_duration(params.seek));
        }

        let speed = params.speed();
        if (speed - 1.0).abs() > f32::EPSILON {
            source = Box::new(source.speed(speed));
        }

        if !params.delay.is_zero() {
            source = Box::new(source.delay(params.delay));
        }

        Ok(source)
    }
}

impl SoundHandle for RodioSound {
    fn play(&mut self, params: PlayParams) -> AudioResult<()> {
        if self.released {
            return Err(AudioError::Released);
        }

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let source = self.build_source(&params)?;
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::StreamInit(Box::new(e)))?;

        self.volume = params.gain.clamp(0.0, 1.0);
        sink.set_volume(self.volume);
        sink.append(source);
        sink.play();
        self.sink = Some(sink);

        tracing::debug!("Playing {} at gain {}", self.key, self.volume);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            if sink.is_paused() {
                sink.play();
            }
        }
    }

    fn stop(&mut self) -> AudioResult<()> {
        if let Some(sink) = self.sink.take() {
            tracing::debug!("Stopping {}", self.key);
            sink.stop();
        }
        Ok(())
    }

    fn set_volume(&mut self, gain: f32) {
        self.volume = gain.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|sink| !sink.empty() && !sink.is_paused())
            .unwrap_or(false)
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.released = true;
    }
}
