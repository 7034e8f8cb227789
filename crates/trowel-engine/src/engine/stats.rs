use crate::Verdict;

/// Run statistics: how many gardens were judged and how many won.
///
/// Counters live for the lifetime of the process and are never persisted.
///
/// # Example
///
/// ```
/// use trowel_engine::{GameStats, Verdict};
///
/// let mut stats = GameStats::new();
/// stats.record_finish(Verdict::Success);
/// stats.record_finish(Verdict::Fail);
///
/// assert_eq!(stats.gardens_completed(), 2);
/// assert_eq!(stats.best_gardens(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    gardens_completed: usize,
    best_gardens: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gardens_completed: 0,
            best_gardens: 0,
        }
    }

    /// Returns the number of judged gardens.
    #[must_use]
    pub const fn gardens_completed(&self) -> usize {
        self.gardens_completed
    }

    /// Returns the number of judged gardens that beat the threshold.
    #[must_use]
    pub const fn best_gardens(&self) -> usize {
        self.best_gardens
    }

    /// Updates counters after a garden is judged.
    ///
    /// Infinity-mode gardens are never judged and must not be recorded.
    pub const fn record_finish(&mut self, verdict: Verdict) {
        self.gardens_completed += 1;
        if matches!(verdict, Verdict::Success) {
            self.best_gardens += 1;
        }
    }
}
