use std::mem;

use log::{debug, info, warn};
use rand_pcg::Pcg32;

use crate::{
    Catalog, Command, CommandError, CountdownStage, Cycle, Difficulty, FinishNarrative,
    GameConfig, GameEvent, GameStats, GardenSeed, InputAdapter, InputFrame, JudgePreference,
    Persistence, PhaseError, PlaceableItem, PlacementError, PreferenceSelector, Ready,
    ResourceSignal, ScoreCard, ScreenShake, Session, SfxKind, Step, TilePos, TransitionQueue,
    TransitionTicket, UiTransition, UnlockReveal, UnlockState, Verdict,
};

/// Persistence key of the master volume, stored as a percentage.
pub const AUDIO_LEVEL_KEY: &str = "AudioLevel";

/// Volume used when nothing is stored.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Number of overlay amount steps.
const AMOUNT_STEPS: u8 = 3;

/// Where the game is in its screen flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant,
)]
pub enum Phase {
    #[display("title")]
    Title,
    #[display("difficulty select")]
    DifficultySelect,
    #[display("countdown")]
    Countdown,
    #[display("playing")]
    Playing,
    #[display("finished")]
    Finished,
    #[display("next garden")]
    NextGarden,
    #[display("to title")]
    ToTitle,
}

/// Work released by the transition queue once earlier UI steps are done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    EnterDifficultySelect,
    BeginPlay,
    Judge,
    RevealUnlocks,
    SetupNextGarden,
    ReturnToTitle,
}

/// Outcome of a finished garden.
///
/// Infinity-mode gardens are never judged: everything but the difficulty is
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishSummary {
    pub difficulty: Difficulty,
    pub score: Option<ScoreCard>,
    pub threshold: Option<f64>,
    pub verdict: Option<Verdict>,
    pub narrative: Option<FinishNarrative>,
    pub reveal: Option<UnlockReveal>,
}

/// The whole game core, driven by [`GardenGame::tick`].
///
/// The host owns the frame loop. Each frame it calls `tick` with the elapsed
/// time and the sampled input, drains [`GameEvent`]s, plays the requested
/// UI transitions and hands their tickets back through
/// [`GardenGame::complete_transition`].
///
/// # Example
///
/// ```
/// use trowel_engine::{
///     Catalog, Difficulty, GameConfig, GameEvent, GardenGame, GardenSeed, InputFrame,
///     MemoryStore, Phase,
/// };
///
/// let mut game = GardenGame::new(
///     GameConfig::default(),
///     Catalog::standard(),
///     Box::new(MemoryStore::new()),
///     GardenSeed::from(1),
/// );
///
/// // Plays every UI transition instantly.
/// fn settle(game: &mut GardenGame) {
///     loop {
///         let tickets: Vec<_> = game
///             .drain_events()
///             .into_iter()
///             .filter_map(|event| match event {
///                 GameEvent::Transition(ticket) => Some(ticket),
///                 _ => None,
///             })
///             .collect();
///         if tickets.is_empty() {
///             break;
///         }
///         for ticket in tickets {
///             game.complete_transition(ticket);
///         }
///     }
/// }
///
/// game.open_difficulty_select().unwrap();
/// settle(&mut game);
/// game.choose_difficulty(Difficulty::Infinity).unwrap();
/// game.tick(1.0 / 60.0, &InputFrame::default());
/// settle(&mut game);
/// assert_eq!(game.phase(), Phase::Playing);
/// ```
pub struct GardenGame {
    config: GameConfig,
    catalog: Catalog,
    store: Box<dyn Persistence>,
    rng: Pcg32,
    selector: PreferenceSelector,
    phase: Phase,
    session: Option<Session>,
    hints: Vec<String>,
    input: InputAdapter,
    hovered: Option<TilePos>,
    selected: usize,
    amount: u8,
    unlock: UnlockState,
    stats: GameStats,
    shake: ScreenShake,
    angry_trowel: bool,
    volume: f32,
    tutorial_open: bool,
    data_reset_open: bool,
    should_exit: bool,
    last_finish: Option<FinishSummary>,
    queue: TransitionQueue<Action>,
    events: Vec<GameEvent>,
}

fn load_volume(store: &dyn Persistence) -> f32 {
    store
        .get_int(AUDIO_LEVEL_KEY)
        .and_then(|percent| u8::try_from(percent.clamp(0, 100)).ok())
        .map_or(DEFAULT_VOLUME, |percent| f32::from(percent) / 100.0)
}

impl GardenGame {
    /// Creates a game sitting on the title screen.
    #[must_use]
    pub fn new(
        config: GameConfig,
        catalog: Catalog,
        store: Box<dyn Persistence>,
        seed: GardenSeed,
    ) -> Self {
        let unlock = UnlockState::load(store.as_ref());
        let volume = load_volume(store.as_ref());
        debug!(
            "new game: seed {seed}, unlock level {}, volume {volume}",
            unlock.level()
        );
        Self {
            selector: PreferenceSelector::new(config.preferences.clone()),
            shake: ScreenShake::new(config.shake.clone()),
            config,
            catalog,
            store,
            rng: seed.rng(),
            phase: Phase::Title,
            session: None,
            hints: vec![],
            input: InputAdapter::new(),
            hovered: None,
            selected: 0,
            amount: 0,
            unlock,
            stats: GameStats::new(),
            angry_trowel: false,
            volume,
            tutorial_open: false,
            data_reset_open: false,
            should_exit: false,
            last_finish: None,
            queue: TransitionQueue::new(),
            events: vec![],
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The live garden, from difficulty choice until returning to title.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &dyn Persistence {
        self.store.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn unlock_level(&self) -> u32 {
        self.unlock.level()
    }

    /// Hints about the current judge's tastes.
    #[must_use]
    pub fn judge_hints(&self) -> &[String] {
        &self.hints
    }

    #[must_use]
    pub fn hovered(&self) -> Option<TilePos> {
        self.hovered
    }

    /// The catalog item under the selection cursor, locked or not.
    #[must_use]
    pub fn selected_item(&self) -> Option<&PlaceableItem> {
        self.catalog.item_at(self.selected)
    }

    #[must_use]
    pub fn is_selected_unlocked(&self) -> bool {
        self.selected_item()
            .is_some_and(|item| self.catalog.is_unlocked(item.id, self.unlock.level()))
    }

    /// Overlay amount index, `0..3`.
    #[must_use]
    pub fn selected_amount(&self) -> u8 {
        self.amount
    }

    #[must_use]
    pub fn shake(&self) -> &ScreenShake {
        &self.shake
    }

    #[must_use]
    pub fn is_angry_trowel(&self) -> bool {
        self.angry_trowel
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub fn is_tutorial_open(&self) -> bool {
        self.tutorial_open
    }

    #[must_use]
    pub fn is_data_reset_open(&self) -> bool {
        self.data_reset_open
    }

    #[must_use]
    pub fn last_finish(&self) -> Option<&FinishSummary> {
        self.last_finish.as_ref()
    }

    /// Returns whether a UI transition or queued step is still pending.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.queue.is_idle()
    }

    #[must_use]
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Takes every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Reports that the shell finished playing a transition.
    ///
    /// Returns `false` for stale tickets, e.g. from a cancelled sequence.
    pub fn complete_transition(&mut self, ticket: TransitionTicket) -> bool {
        let completed = self.queue.complete(ticket);
        if completed {
            self.pump();
        } else {
            debug!("ignoring stale transition {}", ticket.transition());
        }
        completed
    }

    fn expect_phase(&self, action: &'static str, phases: &[Phase]) -> Result<(), PhaseError> {
        if phases.contains(&self.phase) && self.queue.is_idle() {
            Ok(())
        } else {
            Err(PhaseError {
                action,
                phase: self.phase,
            })
        }
    }

    fn expect_title(&self, action: &'static str) -> Result<(), PhaseError> {
        self.expect_phase(action, &[Phase::Title])?;
        if self.tutorial_open || self.data_reset_open {
            return Err(PhaseError {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!("phase {} -> {phase}", self.phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    fn enqueue<I>(&mut self, steps: I)
    where
        I: IntoIterator<Item = Step<Action>>,
    {
        self.queue.extend(steps);
        self.pump();
    }

    /// Releases queued work up to the next UI barrier.
    fn pump(&mut self) {
        while let Some(ready) = self.queue.next_ready() {
            match ready {
                Ready::Begin(ticket) => self.events.push(GameEvent::Transition(ticket)),
                Ready::Run(action) => self.run(action),
            }
        }
    }

    fn run(&mut self, action: Action) {
        match action {
            Action::EnterDifficultySelect => self.set_phase(Phase::DifficultySelect),
            Action::BeginPlay => {
                if let Some(session) = &mut self.session {
                    session.begin_play();
                }
                self.set_phase(Phase::Playing);
            }
            Action::Judge => self.judge(),
            Action::RevealUnlocks => {
                let reveal = self.last_finish.as_ref().and_then(|f| f.reveal.as_ref());
                if let Some(reveal) = reveal {
                    let event = if reveal.is_empty() {
                        GameEvent::NoNewUnlocks
                    } else {
                        GameEvent::UnlocksRevealed(reveal.items.clone())
                    };
                    self.events.push(event);
                }
            }
            Action::SetupNextGarden => self.setup_next_garden(),
            Action::ReturnToTitle => {
                if let Some(mut session) = self.session.take() {
                    session.teardown();
                }
                self.hints.clear();
                self.hovered = None;
                self.input.reset();
                self.set_phase(Phase::Title);
            }
        }
    }

    /// Title -> difficulty select.
    pub fn open_difficulty_select(&mut self) -> Result<(), PhaseError> {
        self.expect_title("open difficulty select")?;
        self.enqueue([
            Step::Ui(UiTransition::HideTitle),
            Step::Ui(UiTransition::ShowStart),
            Step::Action(Action::EnterDifficultySelect),
        ]);
        Ok(())
    }

    /// Difficulty select -> title.
    pub fn cancel_difficulty_select(&mut self) -> Result<(), PhaseError> {
        self.expect_phase("cancel difficulty select", &[Phase::DifficultySelect])?;
        self.enqueue([
            Step::Ui(UiTransition::HideStart),
            Step::Ui(UiTransition::ShowTitle),
            Step::Action(Action::ReturnToTitle),
        ]);
        Ok(())
    }

    /// Starts a fresh run: new budget, new judge, countdown.
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> Result<(), PhaseError> {
        self.expect_phase("choose difficulty", &[Phase::DifficultySelect])?;
        self.shake.set_angry(self.angry_trowel);
        let preference = self.roll_judge();
        let session = Session::fresh(
            difficulty,
            &self.config,
            self.catalog.default_base(),
            preference,
        );
        debug!(
            "{difficulty} run: budget {}, threshold {:?}",
            session.resources().budget(),
            session.threshold()
        );
        self.start_session(session);
        Ok(())
    }

    fn roll_judge(&mut self) -> JudgePreference {
        let roll = self.selector.roll(&mut self.rng);
        debug!(
            "judge likes {}, hates {}, hates pavement: {} ({} resample(s){})",
            roll.preference.likes_overlay,
            roll.preference.hates_overlay,
            roll.preference.hates_pavement,
            roll.resamples,
            if roll.fell_back { ", fell back" } else { "" }
        );
        self.hints = self
            .config
            .narrative
            .judge_hints(&roll.preference, &mut self.rng);
        roll.preference
    }

    fn start_session(&mut self, session: Session) {
        self.session = Some(session);
        self.selected = self
            .catalog
            .iter()
            .position(|item| item.id == self.catalog.default_base().id)
            .unwrap_or(0);
        self.amount = 0;
        self.hovered = None;
        self.input.reset();
        self.set_phase(Phase::Countdown);
    }

    fn setup_next_garden(&mut self) {
        let Some(mut previous) = self.session.take() else {
            return;
        };
        previous.teardown();
        let preference = self.roll_judge();
        let session = previous.chained(&self.config, self.catalog.default_base(), preference);
        self.start_session(session);
    }

    /// Angry trowel loosens the screen shake; only settable before a run.
    pub fn set_angry_trowel(&mut self, angry: bool) -> Result<(), PhaseError> {
        if !matches!(self.phase, Phase::Title | Phase::DifficultySelect) {
            return Err(PhaseError {
                action: "toggle angry trowel",
                phase: self.phase,
            });
        }
        self.angry_trowel = angry;
        Ok(())
    }

    /// Shows or hides the tutorial panel over the title.
    pub fn toggle_tutorial(&mut self, showing: bool) -> Result<(), PhaseError> {
        self.expect_phase("toggle tutorial", &[Phase::Title])?;
        if self.data_reset_open || self.tutorial_open == showing {
            return Ok(());
        }
        self.tutorial_open = showing;
        let steps = if showing {
            [UiTransition::HideTitle, UiTransition::ShowTutorial]
        } else {
            [UiTransition::HideTutorial, UiTransition::ShowTitle]
        };
        self.enqueue(steps.map(Step::Ui));
        Ok(())
    }

    /// Opens the "delete all saved data?" dialog.
    pub fn request_data_reset(&mut self) -> Result<(), PhaseError> {
        self.expect_title("reset data")?;
        self.data_reset_open = true;
        self.enqueue([
            Step::Ui(UiTransition::HideTitle),
            Step::Ui(UiTransition::ShowDataReset),
        ]);
        Ok(())
    }

    /// Closes the data reset dialog, wiping persisted data on `yes`.
    pub fn confirm_data_reset(&mut self, yes: bool) -> Result<(), PhaseError> {
        self.expect_phase("confirm data reset", &[Phase::Title])?;
        if !self.data_reset_open {
            return Err(PhaseError {
                action: "confirm data reset",
                phase: self.phase,
            });
        }
        if yes {
            if let Err(e) = self.store.delete_all() {
                warn!("failed to delete saved data: {e}");
            }
            self.unlock = UnlockState::load(self.store.as_ref());
            self.volume = load_volume(self.store.as_ref());
            self.events.push(GameEvent::VolumeChanged(self.volume));
            info!("saved data deleted");
        }
        self.data_reset_open = false;
        self.enqueue([
            Step::Ui(UiTransition::HideDataReset),
            Step::Ui(UiTransition::ShowTitle),
        ]);
        Ok(())
    }

    /// Sets and persists the master volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() {
            DEFAULT_VOLUME
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume = volume;
        #[expect(clippy::cast_possible_truncation)]
        let percent = (volume * 100.0).round() as i64;
        if let Err(e) = self.store.set_int(AUDIO_LEVEL_KEY, percent) {
            warn!("failed to persist volume: {e}");
        }
        self.events.push(GameEvent::VolumeChanged(volume));
    }

    /// Asks the driver to exit; accepted on the title and finish screens.
    pub fn quit(&mut self) -> Result<(), PhaseError> {
        if !matches!(self.phase, Phase::Title | Phase::Finished) {
            return Err(PhaseError {
                action: "quit",
                phase: self.phase,
            });
        }
        self.should_exit = true;
        Ok(())
    }

    /// Advances the game by `dt` seconds and applies `input`.
    pub fn tick(&mut self, dt: f32, input: &InputFrame) {
        self.shake.tick(dt);
        match self.phase {
            Phase::Countdown => self.tick_countdown(dt),
            Phase::Playing => {
                let signal = self.session.as_mut().and_then(|s| s.tick_play(dt));
                if signal == Some(ResourceSignal::TimeExpired) {
                    debug!("time expired");
                    self.finish();
                    return;
                }
            }
            _ => {}
        }
        let commands = self.input.translate(input, self.phase);
        for command in commands {
            _ = self.apply(command);
        }
    }

    fn tick_countdown(&mut self, dt: f32) {
        let Some(session) = &mut self.session else {
            return;
        };
        let tick = session.tick_countdown(dt);
        if let Some(stage) = tick.entered {
            debug!("countdown: {stage}");
            let sfx = if stage == CountdownStage::Go {
                SfxKind::CountdownEnd
            } else {
                SfxKind::Countdown
            };
            self.events.push(GameEvent::CountdownStage(stage));
            self.events.push(GameEvent::Sfx(sfx));
        }
        if tick.finished {
            self.enqueue([
                Step::Ui(UiTransition::HideStart),
                Step::Ui(UiTransition::ShowHud),
                Step::Action(Action::BeginPlay),
            ]);
        }
    }

    /// Applies one player command.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Hover(pos) => {
                self.expect_phase("hover", &[Phase::Playing])?;
                let grid = self.session.as_ref().map(Session::grid);
                self.hovered = pos.filter(|&pos| grid.is_some_and(|grid| grid.contains(pos)));
            }
            Command::Place => self.place_selected()?,
            Command::ResetTile => self.reset_hovered()?,
            Command::CycleItem(cycle) => {
                self.expect_phase("change item", &[Phase::Playing])?;
                self.cycle_item(cycle);
            }
            Command::CycleAmount(cycle) => {
                self.expect_phase("change amount", &[Phase::Playing])?;
                self.cycle_amount(cycle);
            }
            Command::FinishNow => self.finish_now()?,
            Command::NextGarden => self.next_garden()?,
            Command::ToTitle => self.to_title()?,
            Command::Quit => self.quit()?,
        }
        Ok(())
    }

    fn emit_selection(&mut self) {
        let Some(item) = self.selected_item().map(|item| item.id) else {
            return;
        };
        self.events.push(GameEvent::SelectionChanged {
            item,
            amount: self.amount,
        });
    }

    fn cycle_item(&mut self, cycle: Cycle) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        self.selected = match cycle {
            Cycle::Forward => (self.selected + 1) % len,
            Cycle::Backward => (self.selected + len - 1) % len,
        };
        self.amount = 0;
        let sfx = match cycle {
            Cycle::Forward => SfxKind::NextSelect,
            Cycle::Backward => SfxKind::PreviousSelect,
        };
        self.events.push(GameEvent::Sfx(sfx));
        self.emit_selection();
    }

    fn cycle_amount(&mut self, cycle: Cycle) {
        let overlay = self.selected_item().is_some_and(PlaceableItem::is_overlay);
        if !overlay || !self.is_selected_unlocked() {
            return;
        }
        let (amount, sfx) = match cycle {
            Cycle::Forward => ((self.amount + 1) % AMOUNT_STEPS, SfxKind::PlusAmount),
            Cycle::Backward => (
                (self.amount + AMOUNT_STEPS - 1) % AMOUNT_STEPS,
                SfxKind::MinusAmount,
            ),
        };
        self.amount = amount;
        self.events.push(GameEvent::Sfx(sfx));
        self.emit_selection();
    }

    /// Paints the selected item onto the hovered tile.
    ///
    /// Refusals spend nothing and fire no events.
    pub fn place_selected(&mut self) -> Result<(), CommandError> {
        self.expect_phase("place", &[Phase::Playing])?;
        if self.finish_if_broke() {
            return Ok(());
        }
        let item = self
            .catalog
            .item_at(self.selected)
            .ok_or(PlacementError::UnknownItem)?;
        if !self.catalog.is_unlocked(item.id, self.unlock.level()) {
            return Err(PlacementError::ItemLocked.into());
        }
        let pos = self.hovered.ok_or(PlacementError::NoTileSelected)?;
        let session = self.session.as_mut().ok_or(PlacementError::NotPlaying)?;
        let signal = session.place(pos, item, self.amount)?;
        let item = item.id;

        self.shake.activate();
        self.events.push(GameEvent::Sfx(SfxKind::PlaceTile));
        self.events.push(GameEvent::PlacementFeedback { pos, item });
        if signal == Some(ResourceSignal::BudgetExhausted) {
            debug!("budget exhausted");
            self.finish();
        }
        Ok(())
    }

    /// Resets the hovered tile to the default base.
    pub fn reset_hovered(&mut self) -> Result<(), CommandError> {
        self.expect_phase("reset tile", &[Phase::Playing])?;
        if self.finish_if_broke() {
            return Ok(());
        }
        let pos = self.hovered.ok_or(PlacementError::NoTileSelected)?;
        let session = self.session.as_mut().ok_or(PlacementError::NotPlaying)?;
        let signal = session.reset_tile(pos, self.catalog.default_base())?;

        self.shake.activate();
        self.events.push(GameEvent::Sfx(SfxKind::DeleteTile));
        self.events.push(GameEvent::TileReset { pos });
        if signal == Some(ResourceSignal::BudgetExhausted) {
            debug!("budget exhausted");
            self.finish();
        }
        Ok(())
    }

    /// Finishes a garden that starts with no money left, e.g. one chained
    /// after the budget ran out.
    fn finish_if_broke(&mut self) -> bool {
        let broke = self
            .session
            .as_ref()
            .is_some_and(|session| session.resources().is_out_of_budget());
        if broke {
            debug!("no budget left to spend");
            self.finish();
        }
        broke
    }

    /// Ends the garden early and has it judged.
    pub fn finish_now(&mut self) -> Result<(), PhaseError> {
        self.expect_phase("finish", &[Phase::Playing])?;
        self.finish();
        Ok(())
    }

    fn finish(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        if !session.finish() {
            return;
        }
        self.hovered = None;
        self.set_phase(Phase::Finished);
        self.enqueue([
            Step::Ui(UiTransition::ShowFinish),
            Step::Action(Action::Judge),
            Step::Ui(UiTransition::HideHud),
            Step::Action(Action::RevealUnlocks),
        ]);
    }

    fn judge(&mut self) {
        self.events.push(GameEvent::Sfx(SfxKind::FinishRound));
        let Some(session) = &self.session else {
            return;
        };
        let difficulty = session.difficulty();
        let threshold = session.threshold();
        let summary = match threshold {
            Some(threshold) if !session.is_infinity() => {
                let tiles = session.snapshot();
                let score = ScoreCard::tally(&tiles, session.preference());
                let verdict = Verdict::judge(score.total(), threshold);
                self.stats.record_finish(verdict);
                let narrative = self.config.narrative.finish(
                    verdict,
                    &self.stats,
                    session.resources().budget(),
                    self.config.resources.low_budget,
                    &mut self.rng,
                );
                let reveal = self
                    .unlock
                    .advance(verdict, self.store.as_mut(), &self.catalog);
                info!(
                    "{difficulty} garden scored {} out of {threshold}: {verdict:?}, unlock level {} -> {}",
                    score.total(),
                    reveal.previous_level,
                    reveal.level
                );
                FinishSummary {
                    difficulty,
                    score: Some(score),
                    threshold: Some(threshold),
                    verdict: Some(verdict),
                    narrative: Some(narrative),
                    reveal: Some(reveal),
                }
            }
            _ => {
                info!("{difficulty} garden finished unjudged");
                FinishSummary {
                    difficulty,
                    score: None,
                    threshold: None,
                    verdict: None,
                    narrative: None,
                    reveal: None,
                }
            }
        };
        self.last_finish = Some(summary);
    }

    /// Finished -> countdown of a chained garden.
    pub fn next_garden(&mut self) -> Result<(), PhaseError> {
        self.expect_phase("start the next garden", &[Phase::Finished])?;
        self.set_phase(Phase::NextGarden);
        self.enqueue([
            Step::Ui(UiTransition::HideFinish),
            Step::Ui(UiTransition::ShowStart),
            Step::Action(Action::SetupNextGarden),
        ]);
        Ok(())
    }

    /// Abandons the run and returns to the title.
    ///
    /// Accepted once the finish sequence has played, and while a chained
    /// garden is still being set up, which is discarded.
    pub fn to_title(&mut self) -> Result<(), PhaseError> {
        let hide = match self.phase {
            Phase::Finished if self.queue.is_idle() => UiTransition::HideFinish,
            Phase::NextGarden => {
                let dropped = self.queue.cancel();
                debug!("discarded {dropped} pending next-garden step(s)");
                UiTransition::HideStart
            }
            phase => {
                return Err(PhaseError {
                    action: "return to title",
                    phase,
                });
            }
        };
        self.set_phase(Phase::ToTitle);
        self.enqueue([
            Step::Ui(hide),
            Step::Ui(UiTransition::ShowTitle),
            Step::Action(Action::ReturnToTitle),
        ]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        BaseKind, ItemId, ItemKind, MemoryStore, OverlayKind, ResourceConfig, UNLOCK_LEVEL_KEY,
    };

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn game_with(config: GameConfig, store: MemoryStore) -> GardenGame {
        GardenGame::new(config, Catalog::standard(), Box::new(store), GardenSeed::from(42))
    }

    fn game() -> GardenGame {
        game_with(GameConfig::default(), MemoryStore::new())
    }

    /// Completes every transition instantly, returning the other events.
    fn settle(game: &mut GardenGame) -> Vec<GameEvent> {
        let mut rest = vec![];
        loop {
            let events = game.drain_events();
            if events.is_empty() {
                return rest;
            }
            for event in events {
                match event {
                    GameEvent::Transition(ticket) => {
                        assert!(game.complete_transition(ticket));
                    }
                    event => rest.push(event),
                }
            }
        }
    }

    fn transitions(events: &[GameEvent]) -> Vec<UiTransition> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Transition(ticket) => Some(ticket.transition()),
                _ => None,
            })
            .collect()
    }

    fn start(game: &mut GardenGame, difficulty: Difficulty) {
        game.open_difficulty_select().unwrap();
        settle(game);
        assert_eq!(game.phase(), Phase::DifficultySelect);
        game.choose_difficulty(difficulty).unwrap();
        while game.phase() == Phase::Countdown {
            game.tick(DT, &InputFrame::default());
            settle(game);
        }
        assert_eq!(game.phase(), Phase::Playing);
    }

    fn select(game: &mut GardenGame, kind: ItemKind) {
        while game.selected_item().unwrap().kind != kind {
            game.apply(Command::CycleItem(Cycle::Forward)).unwrap();
        }
        game.drain_events();
    }

    fn hover(game: &mut GardenGame, x: usize, y: usize) {
        game.apply(Command::Hover(Some(TilePos::new(x, y)))).unwrap();
    }

    fn grass() -> ItemKind {
        ItemKind::Base(BaseKind::Grass)
    }

    mod flow {
        use super::*;

        #[test]
        fn test_title_to_playing_sequence() {
            let mut game = game();
            game.open_difficulty_select().unwrap();
            let events = game.drain_events();
            // Only the first barrier is released until it completes.
            assert_eq!(transitions(&events), [UiTransition::HideTitle]);
            assert!(game.is_busy());
            assert!(game.open_difficulty_select().is_err());

            let GameEvent::Transition(ticket) = events[0] else {
                panic!("expected a transition");
            };
            game.complete_transition(ticket);
            assert_eq!(
                transitions(&game.drain_events()),
                [UiTransition::ShowStart]
            );
            assert_eq!(game.phase(), Phase::Title);
        }

        #[test]
        fn test_countdown_emits_stages_then_plays() {
            let mut game = game();
            game.open_difficulty_select().unwrap();
            settle(&mut game);
            game.choose_difficulty(Difficulty::Easy).unwrap();
            let mut stages = vec![];
            let mut shown = vec![];
            while game.phase() == Phase::Countdown {
                game.tick(DT, &InputFrame::default());
                let events = game.drain_events();
                shown.extend(transitions(&events));
                stages.extend(events.iter().filter_map(|event| match event {
                    GameEvent::CountdownStage(stage) => Some(*stage),
                    _ => None,
                }));
                for event in events {
                    if let GameEvent::Transition(ticket) = event {
                        game.complete_transition(ticket);
                    }
                }
                settle(&mut game);
            }
            assert_eq!(
                stages,
                [CountdownStage::Ready, CountdownStage::Set, CountdownStage::Go]
            );
            assert_eq!(shown, [UiTransition::HideStart]);
            assert!(game.session().unwrap().is_started());
        }

        #[test]
        fn test_cancel_difficulty_select_returns_to_title() {
            let mut game = game();
            game.open_difficulty_select().unwrap();
            settle(&mut game);
            game.cancel_difficulty_select().unwrap();
            settle(&mut game);
            assert_eq!(game.phase(), Phase::Title);
            assert!(game.choose_difficulty(Difficulty::Easy).is_err());
        }

        #[test]
        fn test_commands_rejected_in_wrong_phase() {
            let mut game = game();
            let err = game.choose_difficulty(Difficulty::Hard).unwrap_err();
            assert_eq!(err.phase, Phase::Title);
            assert_eq!(err.to_string(), "cannot choose difficulty during the title phase");
            assert!(matches!(
                game.apply(Command::Place),
                Err(CommandError::Phase(_))
            ));
            assert!(game.next_garden().is_err());
        }

        #[test]
        fn test_finish_sequence_order() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            game.finish_now().unwrap();
            assert_eq!(game.phase(), Phase::Finished);

            let mut order = vec![];
            loop {
                let events = game.drain_events();
                if events.is_empty() {
                    break;
                }
                for event in events {
                    match event {
                        GameEvent::Transition(ticket) => {
                            order.push(format!("{}", ticket.transition()));
                            game.complete_transition(ticket);
                        }
                        GameEvent::Sfx(SfxKind::FinishRound) => order.push("judge".into()),
                        GameEvent::NoNewUnlocks | GameEvent::UnlocksRevealed(_) => {
                            order.push("reveal".into());
                        }
                        _ => {}
                    }
                }
            }
            assert_eq!(order, ["ShowFinish", "judge", "HideHud", "reveal"]);
        }

        #[test]
        fn test_next_garden_chains_countdown_and_budget() {
            let mut game = game();
            start(&mut game, Difficulty::Medium);
            select(&mut game, grass());
            hover(&mut game, 0, 0);
            game.place_selected().unwrap();
            game.finish_now().unwrap();
            settle(&mut game);

            game.next_garden().unwrap();
            assert_eq!(game.phase(), Phase::NextGarden);
            settle(&mut game);
            assert_eq!(game.phase(), Phase::Countdown);
            let session = game.session().unwrap();
            assert!(session.is_chained());
            assert!((session.countdown().remaining() - 3.0).abs() < f32::EPSILON);
            assert!((session.resources().budget() - 24_900.0).abs() < f64::EPSILON);
            assert_eq!(
                session.grid().tile(TilePos::new(0, 0)).unwrap().base(),
                BaseKind::Dirt
            );
            assert_eq!(
                game.selected_item().unwrap().id,
                game.catalog().default_base().id
            );
        }

        #[test]
        fn test_to_title_discards_next_garden_setup() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            game.finish_now().unwrap();
            settle(&mut game);

            game.next_garden().unwrap();
            let events = game.drain_events();
            let GameEvent::Transition(stale) = events[1] else {
                panic!("expected HideFinish, got {events:?}");
            };
            game.to_title().unwrap();
            assert_eq!(game.phase(), Phase::ToTitle);
            assert!(!game.complete_transition(stale));
            settle(&mut game);

            assert_eq!(game.phase(), Phase::Title);
            assert!(game.session().is_none());
            assert!(game.judge_hints().is_empty());
        }

        #[test]
        fn test_to_title_then_fresh_run_resets_budget() {
            let mut game = game();
            start(&mut game, Difficulty::Hard);
            select(&mut game, grass());
            hover(&mut game, 1, 1);
            game.place_selected().unwrap();
            game.finish_now().unwrap();
            settle(&mut game);
            game.to_title().unwrap();
            settle(&mut game);

            start(&mut game, Difficulty::Hard);
            let budget = game.session().unwrap().resources().budget();
            assert!((budget - 12_500.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_cancel_on_finish_screen_quits() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            game.finish_now().unwrap();
            settle(&mut game);
            let cancel = InputFrame {
                cancel: true,
                ..InputFrame::default()
            };
            game.tick(DT, &cancel);
            assert!(game.should_exit());
            assert_eq!(game.phase(), Phase::Finished);
        }

        #[test]
        fn test_quit_only_from_title_or_finish() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            assert!(game.quit().is_err());
            assert!(!game.should_exit());
            game.finish_now().unwrap();
            game.quit().unwrap();
            assert!(game.should_exit());
        }
    }

    mod play {
        use super::*;

        #[test]
        fn test_easy_placement_scenario() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            let session = game.session().unwrap();
            assert!((session.resources().budget() - 50_000.0).abs() < f64::EPSILON);
            assert!((session.resources().time_remaining() - 60.0).abs() < f32::EPSILON);
            assert_eq!(session.threshold(), Some(12.5));

            select(&mut game, grass());
            hover(&mut game, 4, 4);
            game.place_selected().unwrap();
            let events = game.drain_events();
            let placements = events
                .iter()
                .filter(|event| event.is_placement_feedback())
                .count();
            assert_eq!(placements, 1);
            assert!(events.contains(&GameEvent::Sfx(SfxKind::PlaceTile)));
            assert!((game.session().unwrap().resources().budget() - 49_900.0).abs() < f64::EPSILON);
            assert!(game.shake().is_active());

            // Same material again: nothing spent, nothing fired.
            assert_eq!(
                game.place_selected(),
                Err(CommandError::Placement(PlacementError::AlreadyPlaced))
            );
            assert!(game.drain_events().is_empty());
        }

        #[test]
        fn test_locked_item_fails_closed() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            select(&mut game, ItemKind::Base(BaseKind::Moss));
            assert!(!game.is_selected_unlocked());
            hover(&mut game, 2, 2);
            let budget = game.session().unwrap().resources().budget();
            assert_eq!(
                game.place_selected(),
                Err(CommandError::Placement(PlacementError::ItemLocked))
            );
            assert!((game.session().unwrap().resources().budget() - budget).abs() < f64::EPSILON);
        }

        #[test]
        fn test_place_without_hover_is_refused() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            assert_eq!(
                game.place_selected(),
                Err(CommandError::Placement(PlacementError::NoTileSelected))
            );
            game.apply(Command::Hover(Some(TilePos::new(50, 50)))).unwrap();
            assert_eq!(game.hovered(), None);
        }

        #[test]
        fn test_budget_exhaustion_finishes_immediately() {
            let config = GameConfig {
                resources: ResourceConfig {
                    base_stake: 200.0,
                    ..ResourceConfig::default()
                },
                ..GameConfig::default()
            };
            let mut game = game_with(config, MemoryStore::new());
            start(&mut game, Difficulty::Easy);
            select(&mut game, grass());
            hover(&mut game, 0, 0);
            game.place_selected().unwrap();
            assert_eq!(game.phase(), Phase::Playing);
            hover(&mut game, 0, 1);
            game.place_selected().unwrap();
            assert_eq!(game.phase(), Phase::Finished);
            assert!(game.session().unwrap().resources().time_remaining() > 59.0);
        }

        fn broke_chained_garden() -> GardenGame {
            let config = GameConfig {
                resources: ResourceConfig {
                    base_stake: 200.0,
                    ..ResourceConfig::default()
                },
                ..GameConfig::default()
            };
            let mut game = game_with(config, MemoryStore::new());
            start(&mut game, Difficulty::Easy);
            select(&mut game, grass());
            hover(&mut game, 0, 0);
            game.place_selected().unwrap();
            hover(&mut game, 0, 1);
            game.place_selected().unwrap();
            assert_eq!(game.phase(), Phase::Finished);
            settle(&mut game);

            game.next_garden().unwrap();
            settle(&mut game);
            while game.phase() == Phase::Countdown {
                game.tick(DT, &InputFrame::default());
                settle(&mut game);
            }
            assert_eq!(game.phase(), Phase::Playing);
            assert!(game.session().unwrap().resources().budget() <= 0.0);
            game
        }

        #[test]
        fn test_placing_without_budget_finishes_chained_garden() {
            let mut game = broke_chained_garden();
            hover(&mut game, 2, 2);
            game.place_selected().unwrap();
            assert_eq!(game.phase(), Phase::Finished);
            assert!(game.session().unwrap().resources().time_remaining() > 59.0);
        }

        #[test]
        fn test_resetting_without_budget_finishes_chained_garden() {
            let mut game = broke_chained_garden();
            hover(&mut game, 2, 2);
            game.reset_hovered().unwrap();
            assert_eq!(game.phase(), Phase::Finished);
        }

        #[test]
        fn test_time_expiry_finishes() {
            let mut game = game();
            start(&mut game, Difficulty::Hard);
            for _ in 0..(31 * 60) {
                game.tick(DT, &InputFrame::default());
            }
            assert_eq!(game.phase(), Phase::Finished);
        }

        #[test]
        fn test_reset_is_debounced_through_input() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            let budget = game.session().unwrap().resources().budget();
            let held = InputFrame {
                pointer: Some(TilePos::new(3, 3)),
                secondary: true,
                ..InputFrame::default()
            };
            for _ in 0..10 {
                game.tick(DT, &held);
            }
            let spent = budget - game.session().unwrap().resources().budget();
            assert!((spent - game.catalog().default_base().cost).abs() < f64::EPSILON);
        }

        #[test]
        fn test_amount_cycles_for_unlocked_overlays_only() {
            let mut game = game();
            start(&mut game, Difficulty::Easy);
            game.apply(Command::CycleAmount(Cycle::Forward)).unwrap();
            assert_eq!(game.selected_amount(), 0);

            select(&mut game, ItemKind::Overlay(OverlayKind::Flowers));
            game.apply(Command::CycleAmount(Cycle::Backward)).unwrap();
            assert_eq!(game.selected_amount(), 2);
            game.apply(Command::CycleAmount(Cycle::Forward)).unwrap();
            assert_eq!(game.selected_amount(), 0);
            game.apply(Command::CycleAmount(Cycle::Forward)).unwrap();
            assert_eq!(
                game.drain_events(),
                [
                    GameEvent::Sfx(SfxKind::MinusAmount),
                    GameEvent::SelectionChanged {
                        item: ItemId(2),
                        amount: 2
                    },
                    GameEvent::Sfx(SfxKind::PlusAmount),
                    GameEvent::SelectionChanged {
                        item: ItemId(2),
                        amount: 0
                    },
                    GameEvent::Sfx(SfxKind::PlusAmount),
                    GameEvent::SelectionChanged {
                        item: ItemId(2),
                        amount: 1
                    },
                ]
            );

            game.apply(Command::CycleItem(Cycle::Forward)).unwrap();
            assert_eq!(game.selected_amount(), 0);
        }
    }

    mod judging {
        use super::*;

        /// Paints `count` grass tiles then finishes and settles.
        fn finish_with_grass(game: &mut GardenGame, count: usize) -> FinishSummary {
            select(game, grass());
            for i in 0..count {
                hover(game, i % 10, i / 10);
                game.place_selected().unwrap();
            }
            game.finish_now().unwrap();
            settle(game);
            game.last_finish().unwrap().clone()
        }

        fn indifferent_judge() -> GameConfig {
            let mut config = GameConfig::default();
            config.preferences.sample_max = 10;
            config.preferences.pavement_odds = 0;
            config
        }

        #[test]
        fn test_best_garden_advances_two_levels() {
            let mut game = game_with(indifferent_judge(), MemoryStore::new());
            start(&mut game, Difficulty::Easy);
            let summary = finish_with_grass(&mut game, 15);

            assert!((summary.score.unwrap().total() - 15.0).abs() < f64::EPSILON);
            assert_eq!(summary.verdict, Some(Verdict::Success));
            assert_eq!(game.unlock_level(), 3);
            assert_eq!(game.store().get_int(UNLOCK_LEVEL_KEY), Some(3));
            assert_eq!(game.stats().best_gardens(), 1);
            let narrative = summary.narrative.unwrap();
            assert!(narrative.progress_line.ends_with("1 out of 1"));
            assert_eq!(summary.reveal.unwrap().items.len(), 2);
        }

        #[test]
        fn test_plain_finish_advances_one_level() {
            let mut game = game_with(indifferent_judge(), MemoryStore::new());
            start(&mut game, Difficulty::Easy);
            let summary = finish_with_grass(&mut game, 10);

            assert_eq!(summary.verdict, Some(Verdict::Fail));
            assert_eq!(game.unlock_level(), 2);
            assert_eq!(game.stats().gardens_completed(), 1);
            assert_eq!(game.stats().best_gardens(), 0);
        }

        #[test]
        fn test_no_new_unlocks_is_signalled() {
            let mut store = MemoryStore::new();
            store.set_int(UNLOCK_LEVEL_KEY, 4).unwrap();
            let mut game = game_with(indifferent_judge(), store);
            start(&mut game, Difficulty::Easy);
            game.finish_now().unwrap();
            let events = settle(&mut game);
            assert!(events.contains(&GameEvent::NoNewUnlocks));
            assert_eq!(game.unlock_level(), 5);
        }

        #[test]
        fn test_infinity_mode_skips_judging() {
            let mut game = game();
            start(&mut game, Difficulty::Infinity);
            for _ in 0..(120 * 60) {
                game.tick(DT, &InputFrame::default());
            }
            assert_eq!(game.phase(), Phase::Playing);

            let summary = finish_with_grass(&mut game, 20);
            assert_eq!(summary.score, None);
            assert_eq!(summary.verdict, None);
            assert_eq!(game.unlock_level(), UnlockState::INITIAL_LEVEL);
            assert_eq!(game.stats().gardens_completed(), 0);
            assert_eq!(game.store().get_int(UNLOCK_LEVEL_KEY), None);
        }
    }

    mod title {
        use super::*;

        #[test]
        fn test_volume_persists_as_percent() {
            let mut game = game();
            assert!((game.volume() - DEFAULT_VOLUME).abs() < f32::EPSILON);
            game.set_volume(1.7);
            assert_eq!(game.store().get_int(AUDIO_LEVEL_KEY), Some(100));
            game.set_volume(0.25);
            assert_eq!(game.store().get_int(AUDIO_LEVEL_KEY), Some(25));
            assert_eq!(game.drain_events().last(), Some(&GameEvent::VolumeChanged(0.25)));

            let mut store = MemoryStore::new();
            store.set_int(AUDIO_LEVEL_KEY, 40).unwrap();
            let game = game_with(GameConfig::default(), store);
            assert!((game.volume() - 0.4).abs() < 1e-6);
        }

        #[test]
        fn test_data_reset_wipes_progress() {
            let mut store = MemoryStore::new();
            store.set_int(UNLOCK_LEVEL_KEY, 6).unwrap();
            store.set_int(AUDIO_LEVEL_KEY, 10).unwrap();
            let mut game = game_with(GameConfig::default(), store);
            assert_eq!(game.unlock_level(), 6);

            assert!(game.confirm_data_reset(true).is_err());
            game.request_data_reset().unwrap();
            assert_eq!(
                transitions(&game.drain_events()),
                [UiTransition::HideTitle]
            );
            settle(&mut game);
            assert!(game.is_data_reset_open());
            assert!(game.open_difficulty_select().is_err());

            game.confirm_data_reset(true).unwrap();
            settle(&mut game);
            assert!(!game.is_data_reset_open());
            assert_eq!(game.unlock_level(), 1);
            assert!((game.volume() - DEFAULT_VOLUME).abs() < f32::EPSILON);
            assert_eq!(game.store().get_int(UNLOCK_LEVEL_KEY), None);
        }

        #[test]
        fn test_declined_data_reset_keeps_progress() {
            let mut store = MemoryStore::new();
            store.set_int(UNLOCK_LEVEL_KEY, 6).unwrap();
            let mut game = game_with(GameConfig::default(), store);
            game.request_data_reset().unwrap();
            settle(&mut game);
            game.confirm_data_reset(false).unwrap();
            settle(&mut game);
            assert_eq!(game.unlock_level(), 6);
        }

        #[test]
        fn test_tutorial_toggle() {
            let mut game = game();
            game.toggle_tutorial(true).unwrap();
            assert_eq!(
                transitions(&game.drain_events()),
                [UiTransition::HideTitle]
            );
            settle(&mut game);
            assert!(game.is_tutorial_open());
            assert!(game.open_difficulty_select().is_err());
            game.toggle_tutorial(false).unwrap();
            settle(&mut game);
            assert!(!game.is_tutorial_open());
            game.open_difficulty_select().unwrap();
        }

        #[test]
        fn test_angry_trowel_only_before_a_run() {
            let mut game = game();
            game.set_angry_trowel(true).unwrap();
            start(&mut game, Difficulty::Easy);
            assert!(game.shake().is_angry());
            assert!(game.set_angry_trowel(false).is_err());
        }

        #[test]
        fn test_same_seed_same_judge() {
            let mut a = game();
            let mut b = game();
            start(&mut a, Difficulty::Easy);
            start(&mut b, Difficulty::Easy);
            assert_eq!(
                a.session().unwrap().preference(),
                b.session().unwrap().preference()
            );
            assert_eq!(a.judge_hints(), b.judge_hints());
        }
    }
}
