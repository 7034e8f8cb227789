use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Seconds a shake takes to decay to rest.
    pub duration: f32,
    /// Divides the jitter; higher is stiffer.
    pub tightness: f32,
    /// Scales the jitter; higher is wilder.
    pub elasticity: f32,
    pub angry_tightness: f32,
    pub angry_elasticity: f32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            tightness: 20.0,
            elasticity: 8.0,
            angry_tightness: 5.0,
            angry_elasticity: 5.0,
        }
    }
}

/// Camera shake kicked off by placing or resetting a tile.
///
/// # Example
///
/// ```
/// use trowel_engine::{ScreenShake, ShakeConfig};
///
/// let mut shake = ScreenShake::new(ShakeConfig::default());
/// shake.activate();
/// assert!(shake.is_active());
/// shake.tick(0.5);
/// assert!(!shake.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct ScreenShake {
    config: ShakeConfig,
    angry: bool,
    remaining: f32,
}

impl ScreenShake {
    #[must_use]
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            angry: false,
            remaining: 0.0,
        }
    }

    #[must_use]
    pub fn is_angry(&self) -> bool {
        self.angry
    }

    /// Switches to the looser "angry trowel" tuning.
    pub fn set_angry(&mut self, angry: bool) {
        self.angry = angry;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Restarts the shake at full strength.
    pub fn activate(&mut self) {
        self.remaining = self.config.duration;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    fn tuning(&self) -> (f32, f32) {
        if self.angry {
            (self.config.angry_tightness, self.config.angry_elasticity)
        } else {
            (self.config.tightness, self.config.elasticity)
        }
    }

    /// Remaining strength in `[0, 1]` scaled by elasticity.
    #[must_use]
    pub fn intensity(&self) -> f32 {
        if self.config.duration <= 0.0 {
            return 0.0;
        }
        let (_, elasticity) = self.tuning();
        (self.remaining / self.config.duration).clamp(0.0, 1.0) * elasticity
    }

    /// Random camera offset for this frame, `(0, 0)` at rest.
    pub fn offset<R>(&self, rng: &mut R) -> (f32, f32)
    where
        R: Rng + ?Sized,
    {
        let (tightness, _) = self.tuning();
        let intensity = self.intensity();
        if intensity <= 0.0 || tightness <= 0.0 {
            return (0.0, 0.0);
        }
        let amplitude = intensity / tightness;
        (
            rng.random_range(-1.0..=1.0) * amplitude,
            rng.random_range(-1.0..=1.0) * amplitude,
        )
    }
}
