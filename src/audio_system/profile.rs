/// Per-category volume table
///
/// Holds the user's gain for each category. Writes are clamped to 0.0-1.0.
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Category gains (0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeProfile {
    pub master: f32,
    pub music: f32,
    pub sfx: f32,
    pub ui: f32,
}

impl Default for VolumeProfile {
    fn default() -> Self {
        Self {
            master: 1.0,
            music: 0.7,
            sfx: 0.8,
            ui: 0.6,
        }
    }
}

fn clamp_gain(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl VolumeProfile {
    /// Get the gain for a category
    pub fn get(&self, category: Category) -> f32 {
        match category {
            Category::Master => self.master,
            Category::Music => self.music,
            Category::Sfx => self.sfx,
            Category::Ui => self.ui,
        }
    }

    /// Look up a gain by category name, 0.0 for names that are not categories
    pub fn get_named(&self, name: &str) -> f32 {
        name.parse::<Category>()
            .map(|category| self.get(category))
            .unwrap_or(0.0)
    }

    /// Set the gain for a category, returning the clamped value stored
    pub fn set(&mut self, category: Category, value: f32) -> f32 {
        let clamped = clamp_gain(value);
        match category {
            Category::Master => self.master = clamped,
            Category::Music => self.music = clamped,
            Category::Sfx => self.sfx = clamped,
            Category::Ui => self.ui = clamped,
        }
        clamped
    }

    /// Clamp every field, e.g. after loading from an untrusted record
    pub fn sanitized(mut self) -> Self {
        for category in Category::ALL {
            let value = self.get(category);
            self.set(category, value);
        }
        self
    }
}
