//! Game sound manifest and cue names.
//!
//! Lists every sound the game registers at startup, its category and the
//! encoded files that can back it (ogg first, mp3 fallback).

use std::path::{Path, PathBuf};

use super::category::Category;
use crate::error::{AudioError, AudioResult};

/// One registrable sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundAsset {
    pub key: &'static str,
    pub category: Category,
    /// Candidate files relative to the asset root, in preference order
    pub files: [&'static str; 2],
}

impl SoundAsset {
    const fn new(key: &'static str, category: Category, files: [&'static str; 2]) -> Self {
        Self {
            key,
            category,
            files,
        }
    }

    pub fn candidates<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        self.files.iter().map(move |file| root.join(file))
    }

    /// Read the first candidate file that exists.
    pub fn load_bytes(&self, root: &Path) -> AudioResult<Vec<u8>> {
        let mut last_error = None;
        for path in self.candidates(root) {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    tracing::debug!("Loaded {} from {} ({} bytes)", self.key, path.display(), bytes.len());
                    return Ok(bytes);
                }
                Err(source) => {
                    last_error = Some(AudioError::AssetLoad {
                        path: path.display().to_string(),
                        source,
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AudioError::AssetLoad {
            path: self.key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no candidate files"),
        }))
    }
}

pub const SOUND_MANIFEST: &[SoundAsset] = &[
    SoundAsset::new("menu-music", Category::Music, ["music/menu-theme.ogg", "music/menu-theme.mp3"]),
    SoundAsset::new("game-music", Category::Music, ["music/game-theme.ogg", "music/game-theme.mp3"]),
    SoundAsset::new("gem-select", Category::Sfx, ["sfx/gem-select.ogg", "sfx/gem-select.mp3"]),
    SoundAsset::new("gem-swap", Category::Sfx, ["sfx/gem-swap.ogg", "sfx/gem-swap.mp3"]),
    SoundAsset::new("match-3", Category::Sfx, ["sfx/match-3.ogg", "sfx/match-3.mp3"]),
    SoundAsset::new("match-4", Category::Sfx, ["sfx/match-4.ogg", "sfx/match-4.mp3"]),
    SoundAsset::new("match-5", Category::Sfx, ["sfx/match-5.ogg", "sfx/match-5.mp3"]),
    SoundAsset::new("cascade", Category::Sfx, ["sfx/cascade.ogg", "sfx/cascade.mp3"]),
    SoundAsset::new("achievement", Category::Sfx, ["sfx/achievement.ogg", "sfx/achievement.mp3"]),
    SoundAsset::new("power-up", Category::Sfx, ["sfx/power-up.ogg", "sfx/power-up.mp3"]),
    SoundAsset::new("level-complete", Category::Sfx, ["sfx/level-complete.ogg", "sfx/level-complete.mp3"]),
    SoundAsset::new("game-over", Category::Sfx, ["sfx/game-over.ogg", "sfx/game-over.mp3"]),
    SoundAsset::new("button-hover", Category::Ui, ["ui/button-hover.ogg", "ui/button-hover.mp3"]),
    SoundAsset::new("button-click", Category::Ui, ["ui/button-click.ogg", "ui/button-click.mp3"]),
    SoundAsset::new("menu-transition", Category::Ui, ["ui/menu-transition.ogg", "ui/menu-transition.mp3"]),
];

pub fn find_asset(key: &str) -> Option<&'static SoundAsset> {
    SOUND_MANIFEST.iter().find(|asset| asset.key == key)
}

/// Named one-shot cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    GemSelect,
    GemSwap,
    Match3,
    Match4,
    Match5,
    Cascade,
    Achievement,
    PowerUp,
    LevelComplete,
    GameOver,
    ButtonHover,
    ButtonClick,
    MenuTransition,
}

impl SoundCue {
    /// Match cue for a cleared run of `gem_count` gems
    pub fn for_match(gem_count: u32) -> Self {
        match gem_count {
            0..=3 => SoundCue::Match3,
            4 => SoundCue::Match4,
            _ => SoundCue::Match5,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SoundCue::GemSelect => "gem-select",
            SoundCue::GemSwap => "gem-swap",
            SoundCue::Match3 => "match-3",
            SoundCue::Match4 => "match-4",
            SoundCue::Match5 => "match-5",
            SoundCue::Cascade => "cascade",
            SoundCue::Achievement => "achievement",
            SoundCue::PowerUp => "power-up",
            SoundCue::LevelComplete => "level-complete",
            SoundCue::GameOver => "game-over",
            SoundCue::ButtonHover => "button-hover",
            SoundCue::ButtonClick => "button-click",
            SoundCue::MenuTransition => "menu-transition",
        }
    }
}
