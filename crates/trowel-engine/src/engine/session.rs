use log::trace;

use crate::{
    Countdown, CountdownTick, Difficulty, GameConfig, Grid, JudgePreference, PlaceableItem,
    PlacementError, ResourceSignal, Resources, Tile, TilePos,
};

/// One garden: its plot, clock, wallet and judge.
///
/// A session is never reused. The next garden of a run is a new session built
/// with [`Session::chained`], which carries the budget over.
#[derive(Debug, Clone)]
pub struct Session {
    resources: Resources,
    threshold: Option<f64>,
    grid: Grid,
    preference: JudgePreference,
    countdown: Countdown,
    counting_down: bool,
    started: bool,
    finished: bool,
    chained: bool,
}

impl Session {
    /// First garden of a run, with a fresh budget.
    #[must_use]
    pub fn fresh(
        difficulty: Difficulty,
        config: &GameConfig,
        default_base: &PlaceableItem,
        preference: JudgePreference,
    ) -> Self {
        let resources = Resources::fresh(difficulty, &config.resources);
        Self::build(resources, config, default_base, preference, false)
    }

    /// Next garden of the same run.
    #[must_use]
    pub fn chained(
        &self,
        config: &GameConfig,
        default_base: &PlaceableItem,
        preference: JudgePreference,
    ) -> Self {
        let resources = self.resources.carried_over(&config.resources);
        Self::build(resources, config, default_base, preference, true)
    }

    fn build(
        resources: Resources,
        config: &GameConfig,
        default_base: &PlaceableItem,
        preference: JudgePreference,
        chained: bool,
    ) -> Self {
        let difficulty = resources.difficulty();
        let duration = if difficulty.is_infinity() {
            0.0
        } else if chained {
            config.countdown.chained
        } else {
            config.countdown.normal
        };
        Self {
            threshold: config.resources.score_threshold(difficulty),
            grid: Grid::new(config.grid.width, config.grid.height, default_base),
            resources,
            preference,
            countdown: Countdown::new(duration),
            counting_down: true,
            started: false,
            finished: false,
            chained,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.resources.difficulty()
    }

    #[must_use]
    pub fn is_infinity(&self) -> bool {
        self.resources.is_infinity()
    }

    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Score a garden must beat to be a best garden; `None` in infinity mode.
    #[must_use]
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn preference(&self) -> &JudgePreference {
        &self.preference
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn is_counting_down(&self) -> bool {
        self.counting_down
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_chained(&self) -> bool {
        self.chained
    }

    fn is_playing(&self) -> bool {
        self.started && !self.finished
    }

    /// Advances the countdown; a no-op once it has run out.
    pub fn tick_countdown(&mut self, dt: f32) -> CountdownTick {
        if !self.counting_down {
            return CountdownTick::default();
        }
        let tick = self.countdown.tick(dt);
        if tick.finished {
            self.counting_down = false;
        }
        tick
    }

    /// Opens the garden for placements.
    pub fn begin_play(&mut self) {
        self.counting_down = false;
        self.started = true;
    }

    /// Advances the clock while playing.
    pub fn tick_play(&mut self, dt: f32) -> Option<ResourceSignal> {
        if !self.is_playing() {
            return None;
        }
        self.resources.tick(dt)
    }

    /// Paints `item` onto a tile and pays for it.
    ///
    /// Returns the exhaustion signal if this placement emptied the budget.
    pub fn place(
        &mut self,
        pos: TilePos,
        item: &PlaceableItem,
        amount: u8,
    ) -> Result<Option<ResourceSignal>, PlacementError> {
        if !self.is_playing() {
            return Err(PlacementError::NotPlaying);
        }
        if !self.grid.contains(pos) {
            return Err(PlacementError::NoTileSelected);
        }
        if !self.grid.would_change(pos, item) {
            return Err(PlacementError::AlreadyPlaced);
        }
        if !self.resources.can_afford(item.cost) {
            return Err(PlacementError::Unaffordable);
        }
        let painted = if item.is_overlay() {
            self.grid.set_overlay(pos, item, amount)
        } else {
            self.grid.set_base(pos, item)
        };
        if !painted {
            return Err(PlacementError::AlreadyPlaced);
        }
        trace!("placed {} at {pos} for {}", item.name, item.cost);
        Ok(self.resources.spend(item.cost))
    }

    /// Strips a tile back to `default_base`, charging the base's cost.
    pub fn reset_tile(
        &mut self,
        pos: TilePos,
        default_base: &PlaceableItem,
    ) -> Result<Option<ResourceSignal>, PlacementError> {
        if !self.is_playing() {
            return Err(PlacementError::NotPlaying);
        }
        if !self.grid.contains(pos) {
            return Err(PlacementError::NoTileSelected);
        }
        if !self.resources.can_afford(default_base.cost) {
            return Err(PlacementError::Unaffordable);
        }
        self.grid.reset_tile(pos, default_base);
        trace!("reset {pos} for {}", default_base.cost);
        Ok(self.resources.spend(default_base.cost))
    }

    /// Freezes the garden. Returns `false` if it was already finished.
    pub fn finish(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        self.counting_down = false;
        true
    }

    /// Copies every tile, for judging.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Tile> {
        self.grid.tiles().to_vec()
    }

    /// Destroys the plot.
    pub fn teardown(&mut self) {
        self.grid.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::{BaseKind, Catalog, ItemKind};

    use super::*;

    fn grass(catalog: &Catalog) -> &PlaceableItem {
        catalog
            .iter()
            .find(|item| item.kind == ItemKind::Base(BaseKind::Grass))
            .unwrap()
    }

    fn playing(difficulty: Difficulty, config: &GameConfig, catalog: &Catalog) -> Session {
        let mut session = Session::fresh(
            difficulty,
            config,
            catalog.default_base(),
            JudgePreference::default(),
        );
        session.begin_play();
        session
    }

    #[test]
    fn test_easy_scenario() {
        let config = GameConfig::default();
        let catalog = Catalog::standard();
        let mut session = playing(Difficulty::Easy, &config, &catalog);
        assert!((session.resources().budget() - 50_000.0).abs() < f64::EPSILON);
        assert!((session.resources().time_remaining() - 60.0).abs() < f32::EPSILON);
        assert_eq!(session.threshold(), Some(12.5));

        let signal = session.place(TilePos::new(3, 3), grass(&catalog), 0).unwrap();
        assert_eq!(signal, None);
        assert!((session.resources().budget() - 49_900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repeat_placement_is_free_and_refused() {
        let config = GameConfig::default();
        let catalog = Catalog::standard();
        let mut session = playing(Difficulty::Easy, &config, &catalog);
        let pos = TilePos::new(0, 0);
        session.place(pos, grass(&catalog), 0).unwrap();
        let budget = session.resources().budget();
        assert_eq!(
            session.place(pos, grass(&catalog), 0),
            Err(PlacementError::AlreadyPlaced)
        );
        assert!((session.resources().budget() - budget).abs() < f64::EPSILON);
    }

    #[test]
    fn test_placement_refused_outside_play() {
        let config = GameConfig::default();
        let catalog = Catalog::standard();
        let mut session = Session::fresh(
            Difficulty::Hard,
            &config,
            catalog.default_base(),
            JudgePreference::default(),
        );
        assert!(session.is_counting_down());
        assert_eq!(
            session.place(TilePos::new(1, 1), grass(&catalog), 0),
            Err(PlacementError::NotPlaying)
        );
        session.begin_play();
        assert!(session.finish());
        assert!(!session.finish());
        assert_eq!(
            session.reset_tile(TilePos::new(1, 1), catalog.default_base()),
            Err(PlacementError::NotPlaying)
        );
    }

    #[test]
    fn test_exhausting_budget_signals() {
        let config = GameConfig {
            resources: crate::ResourceConfig {
                base_stake: 200.0,
                ..Default::default()
            },
            ..GameConfig::default()
        };
        let catalog = Catalog::standard();
        let mut session = playing(Difficulty::Easy, &config, &catalog);
        assert_eq!(session.place(TilePos::new(0, 0), grass(&catalog), 0), Ok(None));
        assert_eq!(
            session.place(TilePos::new(0, 1), grass(&catalog), 0),
            Ok(Some(ResourceSignal::BudgetExhausted))
        );
        assert_eq!(
            session.place(TilePos::new(0, 2), grass(&catalog), 0),
            Err(PlacementError::Unaffordable)
        );
    }

    #[test]
    fn test_reset_charges_default_base() {
        let config = GameConfig::default();
        let catalog = Catalog::standard();
        let mut session = playing(Difficulty::Medium, &config, &catalog);
        let pos = TilePos::new(5, 5);
        session.place(pos, grass(&catalog), 0).unwrap();
        let before = session.resources().budget();
        session.reset_tile(pos, catalog.default_base()).unwrap();
        let after = session.resources().budget();
        assert!((before - after - catalog.default_base().cost).abs() < f64::EPSILON);
        assert_eq!(session.grid().tile(pos).unwrap().base(), BaseKind::Dirt);
    }

    #[test]
    fn test_chained_session_carries_budget() {
        let config = GameConfig::default();
        let catalog = Catalog::standard();
        let mut first = playing(Difficulty::Medium, &config, &catalog);
        first.place(TilePos::new(2, 2), grass(&catalog), 0).unwrap();
        first.tick_play(10.0);
        first.finish();

        let next = first.chained(&config, catalog.default_base(), JudgePreference::default());
        assert!(next.is_chained());
        assert!((next.resources().budget() - 24_900.0).abs() < f64::EPSILON);
        assert!((next.resources().time_remaining() - 45.0).abs() < f32::EPSILON);
        assert!((next.countdown().remaining() - 3.0).abs() < f32::EPSILON);
        assert_eq!(next.grid().tiles().len(), 100);
    }

    #[test]
    fn test_infinity_countdown_is_instant() {
        let config = GameConfig::default();
        let catalog = Catalog::standard();
        let mut session = Session::fresh(
            Difficulty::Infinity,
            &config,
            catalog.default_base(),
            JudgePreference::default(),
        );
        assert_eq!(session.threshold(), None);
        let tick = session.tick_countdown(1.0 / 60.0);
        assert!(tick.finished);
        assert!(!session.is_counting_down());
    }
}
