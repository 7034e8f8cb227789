//! Judging a finished garden.
//!
//! Every tile contributes through exactly one rule, checked in priority
//! order (first match wins):
//!
//! 1. overlay is the hated plant: `-value`
//! 2. overlay is the liked plant: `+2 * value`
//! 3. judge hates pavement and the base is pavement: `-2 * value`
//! 4. otherwise: `+value`

use crate::{BaseKind, JudgePreference, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum ScoringRule {
    HatedOverlay,
    LikedOverlay,
    HatedPavement,
    Neutral,
}

impl ScoringRule {
    pub const ALL: [ScoringRule; 4] = [
        ScoringRule::HatedOverlay,
        ScoringRule::LikedOverlay,
        ScoringRule::HatedPavement,
        ScoringRule::Neutral,
    ];

    #[must_use]
    pub fn classify(tile: &Tile, preference: &JudgePreference) -> Self {
        let overlay = tile.overlay();
        if !preference.hates_overlay.is_none() && overlay == preference.hates_overlay {
            ScoringRule::HatedOverlay
        } else if !preference.likes_overlay.is_none() && overlay == preference.likes_overlay {
            ScoringRule::LikedOverlay
        } else if preference.hates_pavement && tile.base() == BaseKind::Pavement {
            ScoringRule::HatedPavement
        } else {
            ScoringRule::Neutral
        }
    }

    /// Signed contribution of a tile worth `value` under this rule.
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            ScoringRule::HatedOverlay => -value,
            ScoringRule::LikedOverlay => 2.0 * value,
            ScoringRule::HatedPavement => -2.0 * value,
            ScoringRule::Neutral => value,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Whether the garden cleared the best-garden bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Verdict {
    Success,
    Fail,
}

impl Verdict {
    /// Success only when `score` strictly exceeds `threshold`.
    #[must_use]
    pub fn judge(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Verdict::Success
        } else {
            Verdict::Fail
        }
    }
}

/// Total score of a garden together with how many tiles hit each rule.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreCard {
    total: f64,
    rule_counts: [usize; 4],
}

impl ScoreCard {
    /// Scores a set of tiles. An empty set scores zero.
    ///
    /// # Example
    ///
    /// ```
    /// use trowel_engine::{Catalog, Grid, JudgePreference, ScoreCard, ScoringRule, TilePos};
    ///
    /// let catalog = Catalog::standard();
    /// let grass = catalog.item_at(1).unwrap();
    /// let mut grid = Grid::new(2, 2, catalog.default_base());
    /// grid.set_base(TilePos::new(0, 0), grass);
    ///
    /// let card = ScoreCard::tally(grid.tiles(), &JudgePreference::default());
    /// assert_eq!(card.total(), grass.value);
    /// assert_eq!(card.count(ScoringRule::Neutral), 4);
    /// ```
    #[must_use]
    pub fn tally<'a, I>(tiles: I, preference: &JudgePreference) -> Self
    where
        I: IntoIterator<Item = &'a Tile>,
    {
        let mut card = Self::default();
        for tile in tiles {
            let rule = ScoringRule::classify(tile, preference);
            card.total += rule.apply(tile.value());
            card.rule_counts[rule.index()] += 1;
        }
        card
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    #[must_use]
    pub fn count(&self, rule: ScoringRule) -> usize {
        self.rule_counts[rule.index()]
    }

    #[must_use]
    pub fn tiles(&self) -> usize {
        self.rule_counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Catalog, Grid, ItemKind, OverlayKind, PlaceableItem, Tile, TilePos};

    use super::*;

    fn item(catalog: &Catalog, kind: ItemKind) -> &PlaceableItem {
        catalog.iter().find(|item| item.kind == kind).unwrap()
    }

    /// A 2x2 garden: pavement, flowers on grass, hedges on pavement, dirt.
    fn sample_grid(catalog: &Catalog) -> Grid {
        let pavement = item(catalog, ItemKind::Base(BaseKind::Pavement));
        let grass = item(catalog, ItemKind::Base(BaseKind::Grass));
        let flowers = item(catalog, ItemKind::Overlay(OverlayKind::Flowers));
        let hedges = item(catalog, ItemKind::Overlay(OverlayKind::Hedges));

        let mut grid = Grid::new(2, 2, catalog.default_base());
        grid.set_base(TilePos::new(0, 0), pavement);
        grid.set_base(TilePos::new(0, 1), grass);
        grid.set_overlay(TilePos::new(0, 1), flowers, 0);
        grid.set_base(TilePos::new(1, 0), pavement);
        grid.set_overlay(TilePos::new(1, 0), hedges, 1);
        grid
    }

    #[test]
    fn test_hated_overlay_wins_over_everything() {
        let catalog = Catalog::standard();
        let grid = sample_grid(&catalog);
        let preference = JudgePreference {
            likes_overlay: OverlayKind::Flowers,
            hates_overlay: OverlayKind::Hedges,
            hates_pavement: true,
        };
        let hedge_tile = grid.tile(TilePos::new(1, 0)).unwrap();
        assert_eq!(
            ScoringRule::classify(hedge_tile, &preference),
            ScoringRule::HatedOverlay
        );

        let card = ScoreCard::tally(grid.tiles(), &preference);
        // pavement: -2*1, flowers: +2*2, hedges: -3, dirt: +0
        assert!((card.total() - (-2.0 + 4.0 - 3.0 + 0.0)).abs() < f64::EPSILON);
        for rule in ScoringRule::ALL {
            assert_eq!(card.count(rule), 1, "{rule:?}");
        }
    }

    #[test]
    fn test_none_preferences_never_match_bare_tiles() {
        let catalog = Catalog::standard();
        let grid = sample_grid(&catalog);
        let card = ScoreCard::tally(grid.tiles(), &JudgePreference::default());
        assert_eq!(card.count(ScoringRule::Neutral), 4);
        assert!((card.total() - (1.0 + 2.0 + 3.0 + 0.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exactly_one_rule_per_tile() {
        let catalog = Catalog::standard();
        let grid = sample_grid(&catalog);
        for likes in [OverlayKind::None, OverlayKind::Flowers, OverlayKind::Hedges] {
            for hates in [OverlayKind::None, OverlayKind::Hedges, OverlayKind::Shrubs] {
                for hates_pavement in [false, true] {
                    let preference = JudgePreference {
                        likes_overlay: likes,
                        hates_overlay: hates,
                        hates_pavement,
                    };
                    let card = ScoreCard::tally(grid.tiles(), &preference);
                    assert_eq!(card.tiles(), grid.tiles().len());
                    let summed: f64 = grid
                        .tiles()
                        .iter()
                        .map(|tile| ScoringRule::classify(tile, &preference).apply(tile.value()))
                        .sum();
                    assert!((card.total() - summed).abs() < f64::EPSILON);
                }
            }
        }
    }

    #[test]
    fn test_empty_garden_scores_zero() {
        let tiles: [Tile; 0] = [];
        let card = ScoreCard::tally(&tiles, &JudgePreference::default());
        assert!(card.total().abs() < f64::EPSILON);
        assert_eq!(card.tiles(), 0);
    }

    #[test]
    fn test_verdict_requires_strictly_greater() {
        assert_eq!(Verdict::judge(15.0, 12.5), Verdict::Success);
        assert_eq!(Verdict::judge(12.5, 12.5), Verdict::Fail);
        assert_eq!(Verdict::judge(10.0, 12.5), Verdict::Fail);
    }
}
