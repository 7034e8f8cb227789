use std::fmt;

use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use crate::{GameStats, JudgePreference, OverlayKind, Verdict};

fn lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|&line| line.to_owned()).collect()
}

/// Curated text the finish screen and judge hints are assembled from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub fail: Vec<String>,
    pub success: Vec<String>,
    /// Prefix of the "N out of M" progress line.
    pub progress: Vec<String>,
    pub keep_it_up: Vec<String>,
    pub low_budget: Vec<String>,
    pub likes_flowers: Vec<String>,
    pub likes_hedges: Vec<String>,
    pub likes_shrubs: Vec<String>,
    pub hates_flowers: Vec<String>,
    pub hates_hedges: Vec<String>,
    pub hates_shrubs: Vec<String>,
    pub hates_pavement: Vec<String>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            fail: lines(&[
                "The judge squints, sighs, and moves on.",
                "Not quite the garden of the year.",
                "A valiant effort, but the judge is unmoved.",
            ]),
            success: lines(&[
                "The judge is beaming. Best garden!",
                "A triumph of horticulture!",
                "The judge asks for your number. Best garden!",
            ]),
            progress: lines(&[
                "Best gardens so far:",
                "Your tally of award winners:",
                "Gardens that wowed the judge:",
            ]),
            keep_it_up: lines(&[
                "Keep it up!",
                "The next plot is waiting.",
                "Grab your trowel, there is more to do.",
            ]),
            low_budget: lines(&[
                "Money is running thin, spend wisely.",
                "The purse is nearly empty.",
                "Maybe skip the fancy hedges next time.",
            ]),
            likes_flowers: lines(&["The judge adores flowers.", "Word is the judge loves a bloom."]),
            likes_hedges: lines(&["The judge is fond of a neat hedge."]),
            likes_shrubs: lines(&["The judge has a soft spot for shrubs."]),
            hates_flowers: lines(&["Flowers make the judge sneeze."]),
            hates_hedges: lines(&["The judge thinks hedges are stuffy."]),
            hates_shrubs: lines(&["Shrubs? The judge would rather not."]),
            hates_pavement: lines(&["The judge cannot stand pavement.", "Keep the concrete to a minimum."]),
        }
    }
}

fn pick<R>(pool: &[String], rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    pool.choose(rng).cloned().unwrap_or_default()
}

/// Three-paragraph text shown when a garden is judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishNarrative {
    pub verdict_line: String,
    pub progress_line: String,
    pub encouragement_line: String,
}

impl fmt::Display for FinishNarrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\n{}\n\n{}",
            self.verdict_line, self.progress_line, self.encouragement_line
        )
    }
}

impl NarrativeConfig {
    /// Assembles the finish text for a judged garden.
    ///
    /// `stats` must already include this garden. The encouragement comes
    /// from the low-budget pool when `budget` is below `low_budget`.
    pub fn finish<R>(
        &self,
        verdict: Verdict,
        stats: &GameStats,
        budget: f64,
        low_budget: f64,
        rng: &mut R,
    ) -> FinishNarrative
    where
        R: Rng + ?Sized,
    {
        let verdict_pool = match verdict {
            Verdict::Success => &self.success,
            Verdict::Fail => &self.fail,
        };
        let verdict_line = pick(verdict_pool, rng);
        let progress_line = format!(
            "{} {} out of {}",
            pick(&self.progress, rng),
            stats.best_gardens(),
            stats.gardens_completed()
        );
        let encouragement_pool = if budget < low_budget {
            &self.low_budget
        } else {
            &self.keep_it_up
        };
        FinishNarrative {
            verdict_line,
            progress_line,
            encouragement_line: pick(encouragement_pool, rng),
        }
    }

    fn likes_pool(&self, overlay: OverlayKind) -> &[String] {
        match overlay {
            OverlayKind::None => &[],
            OverlayKind::Flowers => &self.likes_flowers,
            OverlayKind::Hedges => &self.likes_hedges,
            OverlayKind::Shrubs => &self.likes_shrubs,
        }
    }

    fn hates_pool(&self, overlay: OverlayKind) -> &[String] {
        match overlay {
            OverlayKind::None => &[],
            OverlayKind::Flowers => &self.hates_flowers,
            OverlayKind::Hedges => &self.hates_hedges,
            OverlayKind::Shrubs => &self.hates_shrubs,
        }
    }

    /// One hint per opinion the judge holds, in likes/hates/pavement order.
    pub fn judge_hints<R>(&self, preference: &JudgePreference, rng: &mut R) -> Vec<String>
    where
        R: Rng + ?Sized,
    {
        let mut pools = vec![
            self.likes_pool(preference.likes_overlay),
            self.hates_pool(preference.hates_overlay),
        ];
        if preference.hates_pavement {
            pools.push(&self.hates_pavement);
        }
        pools
            .into_iter()
            .filter(|pool| !pool.is_empty())
            .map(|pool| pick(pool, rng))
            .collect()
    }
}
