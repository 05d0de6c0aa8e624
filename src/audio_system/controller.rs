/// Audio controller
///
/// Owns the volume profile, the sound registry, the current music track and
/// the mute flag. Every public method is safe to call in any state; failures
/// are logged and the call becomes a no-op.
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use super::category::Category;
use super::fade::{fade_in, fade_out, FadeGeneration};
use super::handle::{MusicOptions, PlayOptions, PlayParams, SharedHandle};
use super::manifest::{SoundAsset, SoundCue};
use super::mixer::{category_gain, effective_gain};
use super::profile::VolumeProfile;
use super::tween::{same_handle, PlaybackContext};
use crate::config::AudioConfig;
use crate::error::AudioResult;
use crate::messaging::{AudioEvent, EventBus, SubscriberId};
use crate::persistence::{FileStore, NullStore, PersistedSettings, PersistenceAdapter};

/// A registered sound
struct SoundEntry {
    handle: SharedHandle,
    category: Category,
    generation: FadeGeneration,
}

/// The background track the controller considers active
#[derive(Debug, Clone)]
struct CurrentMusic {
    key: String,
    options: MusicOptions,
    /// Selected while muted and not started yet
    pending_start: bool,
}

pub struct AudioController {
    volumes: VolumeProfile,
    sounds: HashMap<String, SoundEntry>,
    current_music: Option<CurrentMusic>,
    muted: bool,
    initialized: bool,
    context: Option<Arc<dyn PlaybackContext>>,
    store: Arc<dyn PersistenceAdapter>,
    storage_key: String,
    fade_duration: Duration,
    events: EventBus,
}

static INSTANCE: OnceLock<Mutex<AudioController>> = OnceLock::new();

impl AudioController {
    /// Create a controller, restoring saved settings from `store`.
    pub fn new(store: Arc<dyn PersistenceAdapter>, config: &AudioConfig) -> Self {
        let settings =
            PersistedSettings::load(store.as_ref(), &config.storage_key, config.default_volumes);

        tracing::debug!(
            "Audio settings restored: master={}, music={}, sfx={}, ui={}, muted={}",
            settings.volumes.master,
            settings.volumes.music,
            settings.volumes.sfx,
            settings.volumes.ui,
            settings.muted
        );

        Self {
            volumes: settings.volumes,
            sounds: HashMap::new(),
            current_music: None,
            muted: settings.muted,
            initialized: false,
            context: None,
            store,
            storage_key: config.storage_key.clone(),
            fade_duration: config.fade_duration(),
            events: EventBus::new(),
        }
    }

    /// The process-wide controller, created on first use.
    ///
    /// Backed by the platform config directory. Hosts that compose their own
    /// controller with [`AudioController::new`] should not mix the two.
    pub fn instance() -> &'static Mutex<AudioController> {
        INSTANCE.get_or_init(|| {
            let store: Arc<dyn PersistenceAdapter> = match FileStore::default_location() {
                Some(store) => Arc::new(store),
                None => {
                    tracing::warn!("No config directory, audio settings will not persist");
                    Arc::new(NullStore)
                }
            };

            let config = AudioConfig::config_path()
                .ok()
                .filter(|path| path.exists())
                .and_then(|path| match AudioConfig::load_from(&path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!("Ignoring audio config: {}", e);
                        None
                    }
                })
                .unwrap_or_default();

            Mutex::new(AudioController::new(store, &config))
        })
    }

    /// Bind the playback context used for fades and apply the current profile.
    ///
    /// Calling it again replaces the context without clearing any state.
    pub fn init(&mut self, context: Arc<dyn PlaybackContext>) {
        self.context = Some(context);
        self.apply_volume_settings();
        self.initialized = true;

        tracing::info!("Audio controller initialized ({} sounds)", self.sounds.len());
        self.events.publish(AudioEvent::Initialized);
    }

    /// Register a sound, classifying its category from the key.
    pub fn register_sound(&mut self, key: impl Into<String>, handle: SharedHandle) {
        let key = key.into();
        let category = Category::classify(&key);
        self.register_sound_with_category(key, category, handle);
    }

    /// Register a sound under an explicit category. The last registration of a key wins.
    pub fn register_sound_with_category(
        &mut self,
        key: impl Into<String>,
        category: Category,
        handle: SharedHandle,
    ) {
        let key = key.into();
        let category = if category == Category::Master {
            tracing::warn!("{} cannot use the master category, classifying by key", key);
            Category::classify(&key)
        } else {
            category
        };

        handle.lock().set_volume(category_gain(category, &self.volumes));

        let entry = SoundEntry {
            handle,
            category,
            generation: FadeGeneration::new(),
        };

        if let Some(old) = self.sounds.insert(key.clone(), entry) {
            let replaced_same = self
                .sounds
                .get(&key)
                .map(|new| same_handle(&new.handle, &old.handle))
                .unwrap_or(false);

            if !replaced_same {
                old.generation.bump();
                if let Some(context) = &self.context {
                    context.cancel(&old.handle);
                }
                old.handle.lock().release();

                if let Some(current) = self.current_music.as_mut().filter(|c| c.key == key) {
                    current.pending_start = true;
                    if !self.muted {
                        self.start_current_music();
                    }
                }
            }
            tracing::debug!("Replaced sound: {}", key);
        } else {
            tracing::debug!("Registered sound: {} ({})", key, category);
        }
    }

    /// Build and register every asset, skipping the ones the factory fails on.
    ///
    /// Returns the number of sounds registered.
    pub fn register_manifest<F>(&mut self, assets: &[SoundAsset], mut factory: F) -> usize
    where
        F: FnMut(&SoundAsset) -> AudioResult<SharedHandle>,
    {
        let mut created = 0;
        for asset in assets {
            match factory(asset) {
                Ok(handle) => {
                    self.register_sound_with_category(asset.key, asset.category, handle);
                    created += 1;
                }
                Err(e) => tracing::warn!("Failed to create sound {}: {}", asset.key, e),
            }
        }

        tracing::info!("Created {} of {} sounds", created, assets.len());
        created
    }

    /// Play a registered sound once.
    pub fn play_one_shot(&self, key: &str, options: PlayOptions) {
        if !self.initialized || self.muted {
            return;
        }

        let Some(entry) = self.sounds.get(key) else {
            tracing::warn!("Sound not found: {}", key);
            return;
        };

        let params = PlayParams {
            gain: effective_gain(entry.category, &self.volumes, options.volume_multiplier),
            rate: options.rate,
            detune: options.detune,
            seek: options.seek,
            delay: options.delay,
            looped: false,
        };

        if let Err(e) = entry.handle.lock().play(params) {
            tracing::warn!("Failed to play sound {}: {}", key, e);
        }
    }

    pub fn play_cue(&self, cue: SoundCue) {
        self.play_one_shot(cue.key(), PlayOptions::default());
    }

    /// Switch background music, cross-fading from the current track.
    ///
    /// While muted the track becomes current but only starts on unmute.
    pub fn play_music(&mut self, key: &str, options: MusicOptions) {
        if !self.initialized {
            return;
        }

        if !self.sounds.contains_key(key) {
            tracing::warn!("Music not found: {}", key);
            return;
        }

        if let Some(previous) = self.current_music.take() {
            if let Some(entry) = self.sounds.get(&previous.key) {
                fade_out(
                    self.context.as_deref(),
                    &entry.handle,
                    &entry.generation,
                    self.fade_duration,
                    &previous.key,
                );
            }
        }

        self.current_music = Some(CurrentMusic {
            key: key.to_string(),
            options,
            pending_start: self.muted,
        });

        if self.muted {
            tracing::debug!("Muted, deferring start of {}", key);
        } else {
            self.start_current_music();
        }

        tracing::debug!("Current music: {}", key);
        self.events.publish(AudioEvent::MusicChanged {
            key: Some(key.to_string()),
        });
    }

    /// Fade out the current track over half the fade duration.
    pub fn stop_music(&mut self) {
        let Some(current) = self.current_music.take() else {
            return;
        };

        if let Some(entry) = self.sounds.get(&current.key) {
            fade_out(
                self.context.as_deref(),
                &entry.handle,
                &entry.generation,
                self.fade_duration / 2,
                &current.key,
            );
        }

        tracing::debug!("Stopped music: {}", current.key);
        self.events.publish(AudioEvent::MusicChanged { key: None });
    }

    fn start_current_music(&mut self) {
        let Some(current) = self.current_music.as_mut() else {
            return;
        };
        let Some(entry) = self.sounds.get(&current.key) else {
            return;
        };

        current.pending_start = false;
        let params = PlayParams {
            gain: effective_gain(
                Category::Music,
                &self.volumes,
                current.options.volume_multiplier,
            ),
            rate: current.options.rate,
            looped: current.options.looped,
            ..Default::default()
        };

        if let Err(e) = fade_in(
            self.context.as_deref(),
            &entry.handle,
            &entry.generation,
            params,
            self.fade_duration,
        ) {
            tracing::warn!("Failed to start music {}: {}", current.key, e);
        }
    }

    /// Store a category gain (clamped), reapply it and persist.
    ///
    /// Sounds that are playing keep their gain, except the current music.
    pub fn set_volume(&mut self, category: Category, value: f32) {
        let stored = self.volumes.set(category, value);
        self.apply_volume_settings();
        self.save_settings();

        self.events.publish(AudioEvent::VolumeChanged {
            category,
            value: stored,
        });
    }

    pub fn set_volume_named(&mut self, name: &str, value: f32) {
        match name.parse::<Category>() {
            Ok(category) => self.set_volume(category, value),
            Err(e) => tracing::warn!("Ignoring volume change: {}", e),
        }
    }

    pub fn volume(&self, category: Category) -> f32 {
        self.volumes.get(category)
    }

    /// Stored gain for a category name, 0.0 for unknown names
    pub fn volume_named(&self, name: &str) -> f32 {
        self.volumes.get_named(name)
    }

    pub fn volumes(&self) -> VolumeProfile {
        self.volumes
    }

    /// Flip mute and return the new state.
    ///
    /// Muting pauses the current music; unmuting resumes it, or starts it if
    /// it was selected while muted.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;

        if let Some(current) = self.current_music.clone() {
            if self.muted {
                if let Some(entry) = self.sounds.get(&current.key) {
                    entry.handle.lock().pause();
                }
            } else if current.pending_start {
                self.start_current_music();
            } else if let Some(entry) = self.sounds.get(&current.key) {
                entry.handle.lock().resume();
            }
        }

        self.save_settings();
        tracing::debug!("Audio muted: {}", self.muted);
        self.events.publish(AudioEvent::MuteToggled { muted: self.muted });
        self.muted
    }

    /// Stop music, release every sound and return to the uninitialized state.
    ///
    /// Volumes and mute are kept.
    pub fn destroy(&mut self) {
        self.stop_music();

        for (key, entry) in self.sounds.drain() {
            entry.generation.bump();
            if let Some(context) = &self.context {
                context.cancel(&entry.handle);
            }
            entry.handle.lock().release();
            tracing::trace!("Released sound: {}", key);
        }

        self.initialized = false;
        tracing::info!("Audio controller destroyed");
        self.events.publish(AudioEvent::Destroyed);
    }

    /// Reapply category gains to idle sounds and to the current music.
    fn apply_volume_settings(&self) {
        for entry in self.sounds.values() {
            let mut handle = entry.handle.lock();
            if !handle.is_playing() {
                handle.set_volume(category_gain(entry.category, &self.volumes));
            }
        }

        if self.muted {
            return;
        }
        if let Some(current) = &self.current_music {
            if let Some(entry) = self.sounds.get(&current.key) {
                let gain = effective_gain(
                    Category::Music,
                    &self.volumes,
                    current.options.volume_multiplier,
                );

                // An in-flight fade-in owns the gain until it ends
                let ramping = self
                    .context
                    .as_ref()
                    .map(|context| context.retarget(&entry.handle, gain))
                    .unwrap_or(false);
                if !ramping {
                    entry.handle.lock().set_volume(gain);
                }
            }
        }
    }

    fn save_settings(&self) {
        let settings = PersistedSettings {
            volumes: self.volumes,
            muted: self.muted,
        };
        if let Err(e) = settings.save(self.store.as_ref(), &self.storage_key) {
            tracing::warn!("Failed to save audio settings: {}", e);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Key of the current music track
    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_ref().map(|current| current.key.as_str())
    }

    /// True when the current track was selected while muted and has not started
    pub fn music_pending_start(&self) -> bool {
        self.current_music
            .as_ref()
            .map(|current| current.pending_start)
            .unwrap_or(false)
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub fn category_of(&self, key: &str) -> Option<Category> {
        self.sounds.get(key).map(|entry| entry.category)
    }

    pub fn fade_duration(&self) -> Duration {
        self.fade_duration
    }

    pub fn subscribe(&self) -> (Receiver<AudioEvent>, SubscriberId) {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::handle::SoundHandle;
    use crate::audio_system::headless::{HeadlessSound, SoundCall};
    use crate::audio_system::tween::{Interpolation, TweenScheduler};
    use crate::persistence::MemoryStore;

    type Sound = Arc<Mutex<HeadlessSound>>;

    fn sound(name: &str) -> Sound {
        Arc::new(Mutex::new(HeadlessSound::new(name)))
    }

    fn controller() -> (AudioController, Arc<TweenScheduler>) {
        let mut controller =
            AudioController::new(Arc::new(MemoryStore::new()), &AudioConfig::default());
        let scheduler = Arc::new(TweenScheduler::new());
        controller.init(scheduler.clone());
        (controller, scheduler)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_registration_classifies_and_sets_volume() {
        let (mut controller, _) = controller();
        let click = sound("button-click");
        controller.register_sound("button-click", click.clone());

        assert_eq!(controller.category_of("button-click"), Some(Category::Ui));
        assert!(approx(click.lock().volume(), 0.6));
    }

    #[test]
    fn test_explicit_category_overrides_key() {
        let (mut controller, _) = controller();
        controller.register_sound_with_category("boss-theme", Category::Music, sound("boss"));
        assert_eq!(controller.category_of("boss-theme"), Some(Category::Music));

        controller.register_sound_with_category("gem-swap", Category::Master, sound("swap"));
        assert_eq!(controller.category_of("gem-swap"), Some(Category::Sfx));
    }

    #[test]
    fn test_reregistration_replaces_and_releases_old() {
        let (mut controller, _) = controller();
        let first = sound("first");
        let second = sound("second");
        controller.register_sound("match-3", first.clone());
        controller.register_sound("match-3", second.clone());

        assert_eq!(controller.sound_count(), 1);
        assert!(first.lock().is_released());

        controller.play_one_shot("match-3", PlayOptions::default());
        assert_eq!(first.lock().play_count(), 0);
        assert_eq!(second.lock().play_count(), 1);
    }

    #[test]
    fn test_one_shot_gain_and_params() {
        let (mut controller, _) = controller();
        let swap = sound("gem-swap");
        controller.register_sound("gem-swap", swap.clone());

        controller.play_one_shot(
            "gem-swap",
            PlayOptions::default()
                .with_volume(0.5)
                .with_rate(1.5)
                .with_detune(100.0),
        );

        let params = swap.lock().last_play().unwrap();
        assert!(approx(params.gain, 0.4));
        assert_eq!(params.rate, 1.5);
        assert_eq!(params.detune, 100.0);
        assert!(!params.looped);
    }

    #[test]
    fn test_one_shot_blocked_before_init_and_while_muted() {
        let mut controller =
            AudioController::new(Arc::new(MemoryStore::new()), &AudioConfig::default());
        let swap = sound("gem-swap");
        controller.register_sound("gem-swap", swap.clone());

        controller.play_one_shot("gem-swap", PlayOptions::default());
        assert_eq!(swap.lock().play_count(), 0);

        controller.init(Arc::new(TweenScheduler::new()));
        controller.toggle_mute();
        controller.play_one_shot("gem-swap", PlayOptions::default());
        assert_eq!(swap.lock().play_count(), 0);
    }

    #[test]
    fn test_playback_failure_is_swallowed() {
        let (mut controller, _) = controller();
        let broken = Arc::new(Mutex::new(HeadlessSound::failing("cascade")));
        controller.register_sound("cascade", broken.clone());

        controller.play_one_shot("cascade", PlayOptions::default());
        assert_eq!(broken.lock().play_count(), 1);
    }

    #[test]
    fn test_music_fades_in_to_target() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());

        controller.play_music("menu-music", MusicOptions::default());
        let started = menu.lock().last_play().unwrap();
        assert_eq!(started.gain, 0.0);
        assert!(started.looped);

        scheduler.finish_all();
        assert!(approx(menu.lock().volume(), 0.7));
    }

    #[test]
    fn test_music_multiplier() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());

        controller.play_music("menu-music", MusicOptions::default().with_volume(0.5));
        scheduler.finish_all();
        assert!(approx(menu.lock().volume(), 0.35));
    }

    #[test]
    fn test_replaying_current_track_keeps_it_playing() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());

        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();
        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();

        assert!(menu.lock().is_playing());
        assert_eq!(menu.lock().stop_count(), 0);
        assert!(approx(menu.lock().volume(), 0.7));
    }

    #[test]
    fn test_stop_music_uses_half_duration() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());
        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();

        controller.stop_music();
        assert_eq!(controller.current_music(), None);
        assert_eq!(menu.lock().stop_count(), 0);

        scheduler.tick(Duration::from_millis(499));
        assert_eq!(menu.lock().stop_count(), 0);
        scheduler.tick(Duration::from_millis(1));
        assert_eq!(menu.lock().stop_count(), 1);
    }

    #[test]
    fn test_set_volume_skips_playing_sounds() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        let swap = sound("gem-swap");
        let cascade = sound("cascade");
        controller.register_sound("menu-music", menu.clone());
        controller.register_sound("gem-swap", swap.clone());
        controller.register_sound("cascade", cascade.clone());

        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();
        controller.play_one_shot("gem-swap", PlayOptions::default());

        controller.set_volume(Category::Master, 0.5);

        assert!(approx(swap.lock().volume(), 0.8));
        assert!(approx(cascade.lock().volume(), 0.4));
        assert!(approx(menu.lock().volume(), 0.35));
    }

    #[test]
    fn test_set_volume_clamps_and_persists() {
        let store = MemoryStore::new();
        let mut controller = AudioController::new(Arc::new(store.clone()), &AudioConfig::default());

        controller.set_volume(Category::Sfx, 1.7);
        assert_eq!(controller.volume(Category::Sfx), 1.0);

        controller.set_volume_named("ui", -3.0);
        assert_eq!(controller.volume_named("ui"), 0.0);

        controller.set_volume_named("voice", 0.5);
        assert_eq!(controller.volume_named("voice"), 0.0);

        let saved = PersistedSettings::load(
            &store,
            crate::persistence::STORAGE_KEY,
            VolumeProfile::default(),
        );
        assert_eq!(saved.volumes.sfx, 1.0);
        assert_eq!(saved.volumes.ui, 0.0);
    }

    #[test]
    fn test_mute_pauses_and_resumes_music() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());
        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();

        assert!(controller.toggle_mute());
        assert!(menu.lock().is_paused());

        assert!(!controller.toggle_mute());
        assert!(menu.lock().is_playing());
        assert_eq!(menu.lock().play_count(), 1);
        assert_eq!(menu.lock().count(|call| matches!(call, SoundCall::Resume)), 1);
    }

    #[test]
    fn test_music_selected_while_muted_starts_on_unmute() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());

        controller.toggle_mute();
        controller.play_music("menu-music", MusicOptions::default());
        assert_eq!(controller.current_music(), Some("menu-music"));
        assert!(controller.music_pending_start());
        assert_eq!(menu.lock().play_count(), 0);

        controller.toggle_mute();
        assert!(!controller.music_pending_start());
        assert_eq!(menu.lock().play_count(), 1);
        scheduler.finish_all();
        assert!(approx(menu.lock().volume(), 0.7));
    }

    #[test]
    fn test_switch_from_paused_track_stops_it() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        let game = sound("game-music");
        controller.register_sound("menu-music", menu.clone());
        controller.register_sound("game-music", game.clone());

        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();
        controller.toggle_mute();
        controller.play_music("game-music", MusicOptions::default());

        assert_eq!(menu.lock().stop_count(), 1);
        assert!(controller.music_pending_start());
    }

    #[test]
    fn test_music_with_immediate_context() {
        struct NoRamp;
        impl PlaybackContext for NoRamp {
            fn schedule(&self, interpolation: Interpolation) {
                interpolation.target.lock().set_volume(interpolation.to);
                if let Some(done) = interpolation.on_complete {
                    done();
                }
            }
        }

        let mut controller =
            AudioController::new(Arc::new(MemoryStore::new()), &AudioConfig::default());
        controller.init(Arc::new(NoRamp));
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());

        controller.play_music("menu-music", MusicOptions::default());
        assert!(approx(menu.lock().volume(), 0.7));
        controller.stop_music();
        assert_eq!(menu.lock().stop_count(), 1);
    }

    #[test]
    fn test_destroy_releases_and_keeps_settings() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());
        controller.play_music("menu-music", MusicOptions::default());
        controller.set_volume(Category::Music, 0.4);

        controller.destroy();
        scheduler.finish_all();

        assert!(!controller.is_initialized());
        assert_eq!(controller.sound_count(), 0);
        assert!(menu.lock().is_released());
        assert!(!menu.lock().is_playing());
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(controller.volume(Category::Music), 0.4);
    }

    #[test]
    fn test_events_published() {
        let (mut controller, _) = controller();
        let (rx, _id) = controller.subscribe();
        controller.register_sound("menu-music", sound("menu-music"));

        controller.set_volume(Category::Ui, 0.2);
        controller.play_music("menu-music", MusicOptions::default());
        controller.toggle_mute();

        let events: Vec<AudioEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                AudioEvent::VolumeChanged {
                    category: Category::Ui,
                    value: 0.2
                },
                AudioEvent::MusicChanged {
                    key: Some("menu-music".to_string())
                },
                AudioEvent::MuteToggled { muted: true },
            ]
        );
    }

    #[test]
    fn test_volume_change_during_fade_in_moves_target() {
        let (mut controller, scheduler) = controller();
        let menu = sound("menu-music");
        controller.register_sound("menu-music", menu.clone());

        controller.play_music("menu-music", MusicOptions::default());
        scheduler.tick(Duration::from_millis(200));
        controller.set_volume(Category::Music, 0.2);
        scheduler.finish_all();

        assert_eq!(controller.volume(Category::Music), 0.2);
        assert!(approx(menu.lock().volume(), 0.2));
        assert!(menu.lock().is_playing());
    }

    #[test]
    fn test_replacing_current_music_handle_restarts_it() {
        let (mut controller, scheduler) = controller();
        let old = sound("menu-music");
        let new = sound("menu-music-remastered");
        controller.register_sound("menu-music", old.clone());
        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();

        controller.register_sound("menu-music", new.clone());
        scheduler.finish_all();

        assert!(old.lock().is_released());
        assert_eq!(controller.current_music(), Some("menu-music"));
        assert!(new.lock().is_playing());
        assert!(new.lock().last_play().unwrap().looped);
        assert!(approx(new.lock().volume(), 0.7));
    }

    #[test]
    fn test_replacing_current_music_while_muted_starts_on_unmute() {
        let (mut controller, scheduler) = controller();
        let old = sound("menu-music");
        let new = sound("menu-music-remastered");
        controller.register_sound("menu-music", old.clone());
        controller.play_music("menu-music", MusicOptions::default());
        scheduler.finish_all();

        controller.toggle_mute();
        controller.register_sound("menu-music", new.clone());
        assert!(controller.music_pending_start());
        assert_eq!(new.lock().play_count(), 0);

        controller.toggle_mute();
        scheduler.finish_all();
        assert!(new.lock().is_playing());
        assert_eq!(new.lock().play_count(), 1);
    }

    #[test]
    fn test_reinit_rebinds_context_and_keeps_state() {
        let (mut controller, first) = controller();
        let menu = sound("menu-music");
        let game = sound("game-music");
        let swap = sound("gem-swap");
        controller.register_sound("menu-music", menu.clone());
        controller.register_sound("game-music", game.clone());
        controller.register_sound("gem-swap", swap.clone());
        controller.play_music("menu-music", MusicOptions::default());
        first.finish_all();
        controller.set_volume(Category::Sfx, 0.5);

        menu.lock().set_volume(0.1);
        swap.lock().set_volume(1.0);

        let second = Arc::new(TweenScheduler::new());
        controller.init(second.clone());

        assert!(controller.is_initialized());
        assert_eq!(controller.sound_count(), 3);
        assert_eq!(controller.volume(Category::Sfx), 0.5);
        assert_eq!(controller.current_music(), Some("menu-music"));
        assert!(approx(menu.lock().volume(), 0.7));
        assert!(approx(swap.lock().volume(), 0.5));

        controller.play_music("game-music", MusicOptions::default());
        assert_eq!(first.active_count(), 0);
        assert_eq!(second.active_count(), 2);
        second.finish_all();
        assert_eq!(menu.lock().stop_count(), 1);
        assert!(approx(game.lock().volume(), 0.7));
    }

    #[test]
    fn test_volume_set_before_init_reaches_idle_sounds() {
        let mut controller =
            AudioController::new(Arc::new(MemoryStore::new()), &AudioConfig::default());
        let swap = sound("gem-swap");
        controller.register_sound("gem-swap", swap.clone());

        controller.set_volume(Category::Master, 0.5);
        swap.lock().set_volume(1.0);
        controller.init(Arc::new(TweenScheduler::new()));

        assert!(approx(swap.lock().volume(), 0.4));
    }

    #[test]
    fn test_finished_one_shot_takes_new_volume() {
        let (mut controller, _) = controller();
        let swap = sound("gem-swap");
        controller.register_sound("gem-swap", swap.clone());

        controller.play_one_shot("gem-swap", PlayOptions::default());
        controller.set_volume(Category::Sfx, 0.3);
        assert!(approx(swap.lock().volume(), 0.8));

        swap.lock().finish();
        controller.set_volume(Category::Sfx, 0.3);
        assert!(approx(swap.lock().volume(), 0.3));
        assert_eq!(swap.lock().name(), "gem-swap");
    }

    #[test]
    fn test_event_bus_reset() {
        let (controller, _) = controller();
        let (_rx, _id) = controller.subscribe();
        assert_eq!(controller.events().subscriber_count(), 1);

        controller.events().clear();
        assert_eq!(controller.events().subscriber_count(), 0);
    }

    #[test]
    fn test_instance_is_shared() {
        let first = AudioController::instance() as *const Mutex<AudioController>;
        let second = AudioController::instance() as *const Mutex<AudioController>;
        assert!(std::ptr::eq(first, second));
    }
}
