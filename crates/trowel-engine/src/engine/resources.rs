use serde::{Deserialize, Serialize};

/// Session difficulty, chosen on the title screen.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Infinity,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Infinity,
    ];

    /// Seconds on the clock at the start of every garden.
    #[must_use]
    pub const fn time_limit(self) -> f32 {
        match self {
            Difficulty::Easy | Difficulty::Infinity => 60.0,
            Difficulty::Medium => 45.0,
            Difficulty::Hard => 30.0,
        }
    }

    /// Share of the base stake handed out on a fresh run.
    ///
    /// `None` for infinity mode, which gets an effectively unlimited budget.
    #[must_use]
    pub const fn budget_fraction(self) -> Option<f64> {
        match self {
            Difficulty::Easy => Some(1.0),
            Difficulty::Medium => Some(0.5),
            Difficulty::Hard => Some(0.25),
            Difficulty::Infinity => None,
        }
    }

    /// Multiplier applied to the base score threshold.
    ///
    /// `None` for infinity mode, which is never judged.
    #[must_use]
    pub const fn threshold_multiplier(self) -> Option<f64> {
        match self {
            Difficulty::Easy => Some(1.25),
            Difficulty::Medium => Some(2.0),
            Difficulty::Hard => Some(3.0),
            Difficulty::Infinity => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Budget of a fresh easy run.
    pub base_stake: f64,
    /// Score a garden must beat on a 1.0x difficulty to be a best garden.
    pub base_threshold: f64,
    pub infinity_budget: f64,
    /// Budget below which the finish narrative nags about money.
    pub low_budget: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            base_stake: 50_000.0,
            base_threshold: 10.0,
            infinity_budget: 1_000_000.0,
            low_budget: 500.0,
        }
    }
}

impl ResourceConfig {
    #[must_use]
    pub fn starting_budget(&self, difficulty: Difficulty) -> f64 {
        difficulty
            .budget_fraction()
            .map_or(self.infinity_budget, |fraction| self.base_stake * fraction)
    }

    /// The best-garden bar for `difficulty`, `None` in infinity mode.
    #[must_use]
    pub fn score_threshold(&self, difficulty: Difficulty) -> Option<f64> {
        difficulty
            .threshold_multiplier()
            .map(|multiplier| self.base_threshold * multiplier)
    }
}

/// Edge-triggered resource events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ResourceSignal {
    TimeExpired,
    BudgetExhausted,
}

/// Clock and wallet of a single garden.
///
/// Each signal fires at most once per garden. In infinity mode the clock
/// never runs and the budget never runs out.
///
/// # Example
///
/// ```
/// use trowel_engine::{Difficulty, ResourceConfig, ResourceSignal, Resources};
///
/// let config = ResourceConfig::default();
/// let mut resources = Resources::fresh(Difficulty::Hard, &config);
/// assert_eq!(resources.budget(), 12_500.0);
///
/// assert_eq!(resources.tick(29.5), None);
/// assert_eq!(resources.tick(0.5), Some(ResourceSignal::TimeExpired));
/// assert_eq!(resources.tick(0.5), None);
/// ```
#[derive(Debug, Clone)]
pub struct Resources {
    difficulty: Difficulty,
    time_remaining: f32,
    budget: f64,
    time_expired: bool,
    budget_exhausted: bool,
}

impl Resources {
    /// Resources for the first garden of a run.
    #[must_use]
    pub fn fresh(difficulty: Difficulty, config: &ResourceConfig) -> Self {
        Self {
            difficulty,
            time_remaining: difficulty.time_limit(),
            budget: config.starting_budget(difficulty),
            time_expired: false,
            budget_exhausted: false,
        }
    }

    /// Resources for the next garden in the same run.
    ///
    /// The clock resets; the budget carries over (infinity mode tops it up).
    #[must_use]
    pub fn carried_over(&self, config: &ResourceConfig) -> Self {
        let budget = if self.is_infinity() {
            config.infinity_budget
        } else {
            self.budget
        };
        Self {
            difficulty: self.difficulty,
            time_remaining: self.difficulty.time_limit(),
            budget,
            time_expired: false,
            budget_exhausted: false,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn is_infinity(&self) -> bool {
        self.difficulty.is_infinity()
    }

    #[must_use]
    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    #[must_use]
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Advances the clock by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Option<ResourceSignal> {
        if self.is_infinity() || self.time_expired {
            return None;
        }
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            self.time_expired = true;
            return Some(ResourceSignal::TimeExpired);
        }
        None
    }

    /// Returns whether nothing more can be spent. Never true in infinity mode.
    #[must_use]
    pub fn is_out_of_budget(&self) -> bool {
        !self.is_infinity() && self.budget <= 0.0
    }

    #[must_use]
    pub fn can_afford(&self, cost: f64) -> bool {
        self.is_infinity() || cost <= self.budget
    }

    /// Deducts `cost` from the budget.
    pub fn spend(&mut self, cost: f64) -> Option<ResourceSignal> {
        self.budget -= cost;
        if self.is_infinity() || self.budget_exhausted || self.budget > 0.0 {
            return None;
        }
        self.budget_exhausted = true;
        Some(ResourceSignal::BudgetExhausted)
    }
}
