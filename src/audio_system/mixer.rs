/// Effective gain computation
///
/// Gains multiply: request multiplier × category gain × master gain.
use super::category::Category;
use super::profile::VolumeProfile;

/// Gain for a category with no per-request multiplier.
///
/// `Master` resolves to the master gain alone.
pub fn category_gain(category: Category, profile: &VolumeProfile) -> f32 {
    match category {
        Category::Master => profile.master,
        other => profile.get(other) * profile.master,
    }
}

/// Gain for a single play request, clamped to 0.0-1.0 (NaN becomes 0.0).
pub fn effective_gain(category: Category, profile: &VolumeProfile, multiplier: f32) -> f32 {
    let gain = multiplier * category_gain(category, profile);
    if gain.is_nan() {
        0.0
    } else {
        gain.clamp(0.0, 1.0)
    }
}
