use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use cascade_audio::audio_system::{
    AudioController, Category, MusicOptions, PlayOptions, SoundCue, TweenScheduler,
    SOUND_MANIFEST,
};
use cascade_audio::config::AudioConfig;
use cascade_audio::persistence::{FileStore, NullStore, PersistenceAdapter};

const LOG_TARGET_STARTUP: &str = "cascade_audio::startup";

const FRAME: Duration = Duration::from_millis(16);

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/GemstoneCascade/logs/`, one file per day
/// named cascade-audio.YYYY-MM-DD.log. Debug builds also log to the console.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("GemstoneCascade").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "cascade-audio.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

/// Advance fades in real time for `duration`
fn run_frames(scheduler: &TweenScheduler, duration: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < duration {
        std::thread::sleep(FRAME);
        scheduler.tick(FRAME);
        elapsed += FRAME;
    }
}

fn main() -> Result<()> {
    initialize_tracing();
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting cascade-audio demo v{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::ARCH
    );

    let config = AudioConfig::load().context("Failed to load audio config")?;

    let store: Arc<dyn PersistenceAdapter> = match FileStore::default_location() {
        Some(store) => {
            tracing::info!(target: LOG_TARGET_STARTUP, "Settings directory: {}", store.dir().display());
            Arc::new(store)
        }
        None => Arc::new(NullStore),
    };

    let mut audio = AudioController::new(store, &config);
    let (events, _subscription) = audio.subscribe();

    #[cfg(feature = "rodio-backend")]
    let output = cascade_audio::audio_system::RodioOutput::open()
        .context("Failed to open audio output")?;

    #[cfg(feature = "rodio-backend")]
    let registered = audio.register_manifest(SOUND_MANIFEST, |asset| {
        output.load_asset(asset, &config.asset_root)
    });

    #[cfg(not(feature = "rodio-backend"))]
    let registered = audio.register_manifest(SOUND_MANIFEST, |asset| {
        Ok(cascade_audio::audio_system::shared(
            cascade_audio::audio_system::HeadlessSound::new(asset.key),
        ))
    });

    tracing::info!(target: LOG_TARGET_STARTUP, "Registered {} sounds", registered);

    let scheduler = Arc::new(TweenScheduler::new());
    audio.init(scheduler.clone());

    audio.play_music("menu-music", MusicOptions::default());
    run_frames(&scheduler, config.fade_duration());

    audio.play_cue(SoundCue::ButtonHover);
    audio.play_cue(SoundCue::ButtonClick);
    audio.play_cue(SoundCue::MenuTransition);

    audio.play_music("game-music", MusicOptions::default());
    run_frames(&scheduler, config.fade_duration());

    audio.play_cue(SoundCue::GemSelect);
    audio.play_cue(SoundCue::GemSwap);
    for (chain, gems) in [3u32, 4, 5].into_iter().enumerate() {
        audio.play_cue(SoundCue::for_match(gems));
        audio.play_one_shot(
            SoundCue::Cascade.key(),
            PlayOptions::default().with_detune(100.0 * chain as f32),
        );
        run_frames(&scheduler, Duration::from_millis(250));
    }

    let sfx = audio.volume(Category::Sfx);
    audio.set_volume(Category::Sfx, sfx * 0.5);
    audio.play_cue(SoundCue::PowerUp);

    audio.toggle_mute();
    run_frames(&scheduler, Duration::from_millis(500));
    audio.toggle_mute();

    audio.set_volume(Category::Sfx, sfx);
    audio.play_cue(SoundCue::LevelComplete);

    audio.stop_music();
    run_frames(&scheduler, config.fade_duration() / 2);
    audio.destroy();

    for event in events.try_iter() {
        tracing::info!("Audio event: {:?}", event);
    }

    tracing::info!("Demo session finished");
    Ok(())
}
