use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::OverlayKind;

/// Judge taste rolled once per garden.
///
/// `likes_overlay` and `hates_overlay` never name the same plant; both may be
/// [`OverlayKind::None`] (no strong opinion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JudgePreference {
    pub likes_overlay: OverlayKind,
    pub hates_overlay: OverlayKind,
    pub hates_pavement: bool,
}

impl JudgePreference {
    /// A judge with no opinion about overlays.
    #[must_use]
    pub const fn indifferent(hates_pavement: bool) -> Self {
        Self {
            likes_overlay: OverlayKind::None,
            hates_overlay: OverlayKind::None,
            hates_pavement,
        }
    }

    /// Returns whether the judge does not like and hate the same plant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.likes_overlay != self.hates_overlay || self.likes_overlay.is_none()
    }
}

/// Tunables of the preference roll.
///
/// Overlay opinions are drawn as an integer in `sample_min..sample_max`
/// divided by `divisor`; the quotient is a bucket mapped through
/// [`OverlayKind::from_bucket`]. The defaults give four equally likely
/// buckets: no opinion plus one per plant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceConfig {
    pub sample_min: i32,
    pub sample_max: i32,
    pub divisor: i32,
    /// The judge hates pavement with probability `1 / pavement_odds`.
    pub pavement_odds: u32,
    pub max_resamples: usize,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            sample_min: 0,
            sample_max: 40,
            divisor: 10,
            pavement_odds: 10,
            max_resamples: 10,
        }
    }
}

/// Outcome of [`PreferenceSelector::roll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceRoll {
    pub preference: JudgePreference,
    /// Number of times the hated overlay was redrawn.
    pub resamples: usize,
    /// Set when every resample collided and both opinions were dropped.
    pub fell_back: bool,
}

/// Draws judge tastes that never contradict themselves.
#[derive(Debug, Clone, Default)]
pub struct PreferenceSelector {
    config: PreferenceConfig,
}

impl PreferenceSelector {
    #[must_use]
    pub fn new(config: PreferenceConfig) -> Self {
        Self { config }
    }

    fn sample_overlay<R>(&self, rng: &mut R) -> OverlayKind
    where
        R: Rng + ?Sized,
    {
        let PreferenceConfig {
            sample_min,
            sample_max,
            divisor,
            ..
        } = self.config;
        if sample_min >= sample_max || divisor <= 0 {
            return OverlayKind::None;
        }
        let sample = rng.random_range(sample_min..sample_max);
        OverlayKind::from_bucket(sample.div_euclid(divisor))
    }

    /// Rolls a fresh judge.
    ///
    /// The hated overlay is redrawn up to `max_resamples` times while it
    /// collides with the liked one; if it still collides the judge falls
    /// back to having no overlay opinion at all.
    pub fn roll<R>(&self, rng: &mut R) -> PreferenceRoll
    where
        R: Rng + ?Sized,
    {
        let hates_pavement =
            self.config.pavement_odds > 0 && rng.random_ratio(1, self.config.pavement_odds);
        let likes_overlay = self.sample_overlay(rng);

        for resamples in 0..=self.config.max_resamples {
            let preference = JudgePreference {
                likes_overlay,
                hates_overlay: self.sample_overlay(rng),
                hates_pavement,
            };
            if preference.is_consistent() {
                return PreferenceRoll {
                    preference,
                    resamples,
                    fell_back: false,
                };
            }
        }

        PreferenceRoll {
            preference: JudgePreference::indifferent(hates_pavement),
            resamples: self.config.max_resamples,
            fell_back: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::GardenSeed;

    use super::*;

    #[test]
    fn test_ten_thousand_rolls_are_consistent() {
        let selector = PreferenceSelector::default();
        let mut rng = GardenSeed::from(7).rng();
        let mut pavement_haters = 0;
        let mut seen_likes = std::collections::HashSet::new();
        for _ in 0..10_000 {
            let roll = selector.roll(&mut rng);
            assert!(roll.preference.is_consistent(), "{roll:?}");
            assert!(!roll.fell_back || roll.resamples == 10);
            pavement_haters += usize::from(roll.preference.hates_pavement);
            seen_likes.insert(roll.preference.likes_overlay);
        }
        // Roughly one judge in ten hates pavement.
        assert!((700..1300).contains(&pavement_haters), "{pavement_haters}");
        assert_eq!(seen_likes.len(), 4);
    }

    #[test]
    fn test_single_bucket_falls_back_after_ten_resamples() {
        // Every draw lands in the "flowers" bucket, so likes == hates forever.
        let selector = PreferenceSelector::new(PreferenceConfig {
            sample_min: 10,
            sample_max: 20,
            ..PreferenceConfig::default()
        });
        let roll = selector.roll(&mut GardenSeed::from(1).rng());
        assert!(roll.fell_back);
        assert_eq!(roll.resamples, 10);
        assert_eq!(roll.preference.likes_overlay, OverlayKind::None);
        assert_eq!(roll.preference.hates_overlay, OverlayKind::None);
    }

    #[test]
    fn test_none_bucket_only_is_accepted_without_resampling() {
        let selector = PreferenceSelector::new(PreferenceConfig {
            sample_min: 0,
            sample_max: 10,
            ..PreferenceConfig::default()
        });
        let roll = selector.roll(&mut GardenSeed::from(3).rng());
        assert!(!roll.fell_back);
        assert_eq!(roll.resamples, 0);
        assert_eq!(roll.preference.likes_overlay, OverlayKind::None);
    }

    #[test]
    fn test_degenerate_config_fails_closed() {
        let selector = PreferenceSelector::new(PreferenceConfig {
            sample_min: 5,
            sample_max: 5,
            divisor: 0,
            pavement_odds: 0,
            max_resamples: 0,
        });
        let roll = selector.roll(&mut GardenSeed::from(9).rng());
        assert_eq!(roll.preference, JudgePreference::indifferent(false));
    }
}
