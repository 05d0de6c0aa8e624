/// Volume categories
///
/// Every registered sound belongs to exactly one gain bucket. `Master` scales
/// all of them and is never the category of a sound itself.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Gain-scaling bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Scales every other category
    Master,

    /// Background music tracks
    Music,

    /// Gameplay sound effects
    Sfx,

    /// Buttons, menus and other interface cues
    Ui,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Master,
        Category::Music,
        Category::Sfx,
        Category::Ui,
    ];

    /// Classify a sound key by its name.
    ///
    /// `music` wins over the ui markers; anything unmatched is a sound effect.
    pub fn classify(key: &str) -> Self {
        if key.contains("music") {
            Category::Music
        } else if key.contains("button") || key.contains("menu") || key.contains("ui") {
            Category::Ui
        } else {
            Category::Sfx
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Master => "master",
            Category::Music => "music",
            Category::Sfx => "sfx",
            Category::Ui => "ui",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(Category::Master),
            "music" => Ok(Category::Music),
            "sfx" => Ok(Category::Sfx),
            "ui" => Ok(Category::Ui),
            other => Err(AudioError::UnknownCategory(other.to_string())),
        }
    }
}
