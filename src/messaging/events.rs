/// Audio events
///
/// Notifications of controller state changes (past tense), broadcast to
/// every subscriber so settings screens can follow the controller.
use crate::audio_system::Category;

/// Controller events
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// A category gain was stored (already clamped)
    VolumeChanged { category: Category, value: f32 },

    /// Mute was toggled
    MuteToggled { muted: bool },

    /// The current music track changed; `None` after a stop
    MusicChanged { key: Option<String> },

    /// The controller was bound to a playback context
    Initialized,

    /// The controller released its sounds
    Destroyed,
}

impl AudioEvent {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            AudioEvent::VolumeChanged { .. } => "volume_changed",
            AudioEvent::MuteToggled { .. } => "mute_toggled",
            AudioEvent::MusicChanged { .. } => "music_changed",
            AudioEvent::Initialized => "initialized",
            AudioEvent::Destroyed => "destroyed",
        }
    }
}
