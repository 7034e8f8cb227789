use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{debug, info, trace};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Margin, Position, Rect},
    text::{Line, Text},
    widgets::{Block, Padding},
};
use trowel_engine::{
    CountdownStage, Difficulty, GameEvent, GardenGame, Phase, PhaseError, TilePos, dispatch,
};

use crate::{
    command::play::{
        controls::{Click, Controls},
        shell::{LogAudio, Panel, TuiShell},
        view,
    },
    tui::{App, Runtime},
    ui::widgets::{GardenDisplay, GlyphSprites, HudDisplay, KeyBindingDisplay, PanelDisplay, style},
};

const FPS: u64 = 60;

/// Seconds a painted or reset tile stays highlighted.
const FLASH_SECS: f32 = 0.2;

/// Volume change per key press.
const VOLUME_STEP: f32 = 0.1;

#[derive(Debug)]
struct Flash {
    pos: TilePos,
    remaining: f32,
}

/// Screen areas of one frame.
#[derive(Debug, Clone, Copy)]
struct PlayLayout {
    main: Rect,
    garden: Rect,
    hud: Rect,
    help: Rect,
}

/// Terminal front end of a [`GardenGame`].
pub struct PlayApp {
    game: GardenGame,
    sprites: GlyphSprites,
    shell: TuiShell,
    audio: LogAudio,
    controls: Controls,
    screen: Rect,
    countdown: Option<CountdownStage>,
    banner: Option<String>,
    flashes: Vec<Flash>,
    shake_offset: (i16, i16),
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(game: GardenGame, transition_secs: f32) -> Self {
        Self {
            sprites: GlyphSprites::new(game.catalog()),
            audio: LogAudio::new(game.volume()),
            game,
            shell: TuiShell::new(transition_secs),
            controls: Controls::new(),
            screen: Rect::default(),
            countdown: None,
            banner: None,
            flashes: vec![],
            shake_offset: (0, 0),
            is_exiting: false,
        }
    }

    fn garden_border(&self) -> Block<'static> {
        let border_style = if self.game.is_angry_trowel() {
            style::ANGRY_BORDER
        } else if self.game.phase() == Phase::Playing {
            style::DEFAULT
        } else {
            style::DIMMED
        };
        Block::bordered()
            .title(Line::from("GARDEN").centered())
            .border_style(border_style)
            .style(style::DEFAULT)
    }

    fn hud_border() -> Block<'static> {
        Block::bordered()
            .title(Line::from("HUD").centered())
            .padding(Padding::horizontal(1))
            .style(style::DEFAULT)
    }

    fn layout(&self, area: Rect) -> PlayLayout {
        let hud = HudDisplay::new(&self.game, &self.sprites).block(Self::hud_border());
        let (garden_width, garden_height) = self.game.session().map_or((0, 0), |session| {
            let garden =
                GardenDisplay::new(session.grid(), &self.sprites).block(self.garden_border());
            (garden.width(), garden.height())
        });

        let [main, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let [garden_column, hud_column] = Layout::horizontal([
            Constraint::Length(garden_width),
            Constraint::Length(hud.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main);
        let [garden] = Layout::vertical([Constraint::Length(garden_height)])
            .flex(Flex::Center)
            .areas(garden_column);
        let [hud] = Layout::vertical([Constraint::Length(hud.height())])
            .flex(Flex::Center)
            .areas(hud_column);
        PlayLayout {
            main,
            garden,
            hud,
            help,
        }
    }

    fn tile_under(&self, column: u16, row: u16) -> Option<TilePos> {
        let session = self.game.session()?;
        let inner = self.layout(self.screen).garden.inner(Margin::new(1, 1));
        GardenDisplay::pos_at(inner, session.grid(), Position::new(column, row))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = self.tile_under(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.controls.hover(pos),
            MouseEventKind::Down(button) => {
                self.controls.hover(pos);
                if let Some(click) = click_of(button) {
                    self.controls.press(click);
                }
            }
            MouseEventKind::Up(button) => {
                if let Some(click) = click_of(button) {
                    self.controls.release(click);
                }
            }
            MouseEventKind::ScrollUp => self.controls.push_vertical(1.0),
            MouseEventKind::ScrollDown => self.controls.push_vertical(-1.0),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.is_exiting = true;
            return;
        }
        let result = match key.code {
            KeyCode::Char('+' | '=') => {
                self.game.set_volume(self.game.volume() + VOLUME_STEP);
                Ok(())
            }
            KeyCode::Char('-') => {
                self.game.set_volume(self.game.volume() - VOLUME_STEP);
                Ok(())
            }
            code => match self.game.phase() {
                Phase::Title => self.handle_title_key(code),
                Phase::DifficultySelect => self.handle_difficulty_key(code),
                Phase::Playing | Phase::Finished => {
                    self.handle_play_key(code);
                    Ok(())
                }
                Phase::NextGarden if code == KeyCode::Esc => self.game.to_title(),
                Phase::Countdown | Phase::NextGarden | Phase::ToTitle => Ok(()),
            },
        };
        if let Err(e) = result {
            debug!("key {:?} ignored: {e}", key.code);
        }
    }

    fn handle_title_key(&mut self, code: KeyCode) -> Result<(), PhaseError> {
        if self.game.is_data_reset_open() {
            return match code {
                KeyCode::Char('y') => self.game.confirm_data_reset(true),
                KeyCode::Char('n') | KeyCode::Esc => self.game.confirm_data_reset(false),
                _ => Ok(()),
            };
        }
        if self.game.is_tutorial_open() {
            return match code {
                KeyCode::Char('t') | KeyCode::Esc | KeyCode::Enter => {
                    self.game.toggle_tutorial(false)
                }
                _ => Ok(()),
            };
        }
        match code {
            KeyCode::Enter => self.game.open_difficulty_select(),
            KeyCode::Char('t') => self.game.toggle_tutorial(true),
            KeyCode::Char('d') => self.game.request_data_reset(),
            KeyCode::Char('a') => self.game.set_angry_trowel(!self.game.is_angry_trowel()),
            KeyCode::Char('q') => self.game.quit(),
            _ => Ok(()),
        }
    }

    fn handle_difficulty_key(&mut self, code: KeyCode) -> Result<(), PhaseError> {
        if let KeyCode::Char(c) = code
            && let Some(difficulty) = difficulty_for_key(c)
        {
            info!("starting a {difficulty} run");
            return self.game.choose_difficulty(difficulty);
        }
        match code {
            KeyCode::Char('a') => self.game.set_angry_trowel(!self.game.is_angry_trowel()),
            KeyCode::Esc => self.game.cancel_difficulty_select(),
            _ => Ok(()),
        }
    }

    fn handle_play_key(&mut self, code: KeyCode) {
        let (width, height) = self
            .game
            .session()
            .map_or((0, 0), |s| (s.grid().width(), s.grid().height()));
        match code {
            KeyCode::Left => self.controls.push_horizontal(-1.0),
            KeyCode::Right => self.controls.push_horizontal(1.0),
            KeyCode::Up => self.controls.push_vertical(1.0),
            KeyCode::Down => self.controls.push_vertical(-1.0),
            KeyCode::Char('h') => self.controls.move_cursor(-1, 0, width, height),
            KeyCode::Char('l') => self.controls.move_cursor(1, 0, width, height),
            KeyCode::Char('k') => self.controls.move_cursor(0, 1, width, height),
            KeyCode::Char('j') => self.controls.move_cursor(0, -1, width, height),
            KeyCode::Char(' ') => self.controls.tap(Click::Primary),
            KeyCode::Char('x') => self.controls.tap(Click::Secondary),
            KeyCode::Enter => self.controls.select(),
            KeyCode::Esc => self.controls.cancel(),
            KeyCode::Char('q') => {
                if let Err(e) = self.game.quit() {
                    debug!("quit ignored: {e}");
                }
            }
            KeyCode::Char('t') => {
                if let Err(e) = self.game.to_title() {
                    debug!("return to title ignored: {e}");
                }
            }
            _ => {}
        }
    }

    /// Routes everything the game recorded since the last call.
    fn process_events(&mut self) {
        let rest = dispatch(self.game.drain_events(), &mut self.audio, &mut self.shell);
        for event in rest {
            match event {
                GameEvent::PlacementFeedback { pos, .. } | GameEvent::TileReset { pos } => {
                    self.flashes.push(Flash {
                        pos,
                        remaining: FLASH_SECS,
                    });
                }
                GameEvent::CountdownStage(stage) => self.countdown = Some(stage),
                GameEvent::PhaseChanged(phase) => self.on_phase_changed(phase),
                GameEvent::UnlocksRevealed(items) => {
                    let names: Vec<_> = items
                        .iter()
                        .filter_map(|id| self.game.catalog().get(*id))
                        .map(|item| item.name.as_str())
                        .collect();
                    self.banner = Some(format!("Unlocked: {}", names.join(", ")));
                }
                GameEvent::NoNewUnlocks => self.banner = Some("No new items this time".to_owned()),
                GameEvent::VolumeChanged(volume) => self.audio.set_volume(volume),
                GameEvent::SelectionChanged { item, amount } => {
                    trace!("selected {item} x{amount}");
                }
                GameEvent::Sfx(_) | GameEvent::Transition(_) => {}
            }
        }
    }

    fn on_phase_changed(&mut self, phase: Phase) {
        match phase {
            Phase::Countdown | Phase::NextGarden => {
                self.countdown = None;
                self.banner = None;
            }
            Phase::Title => {
                self.controls.clear();
                self.flashes.clear();
                self.banner = None;
            }
            Phase::DifficultySelect | Phase::Playing | Phase::Finished | Phase::ToTitle => {}
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn update_shake(&mut self) {
        let (dx, dy) = self.game.shake().offset(&mut rand::rng());
        self.shake_offset = (dx.round() as i16, dy.round() as i16);
    }

    fn draw_garden(&self, frame: &mut Frame, layout: &PlayLayout) {
        let Some(session) = self.game.session() else {
            return;
        };
        let flashes: Vec<_> = self.flashes.iter().map(|flash| flash.pos).collect();
        let garden = GardenDisplay::new(session.grid(), &self.sprites)
            .hovered(self.game.hovered())
            .flashes(&flashes)
            .offset(self.shake_offset)
            .block(self.garden_border());
        frame.render_widget(garden, layout.garden);

        if self.shell.is_visible(Panel::Hud) {
            let hud = HudDisplay::new(&self.game, &self.sprites).block(Self::hud_border());
            frame.render_widget(hud, layout.hud);
        }
    }

    fn draw_panels(&self, frame: &mut Frame, layout: &PlayLayout) {
        let panel = |title: &'static str, text: Text<'static>, panel: Panel| {
            PanelDisplay::new(title, text).fading(self.shell.is_fading(panel))
        };
        if self.shell.is_visible(Panel::Title) {
            frame.render_widget(
                panel("TROWEL", view::title_text(&self.game), Panel::Title),
                layout.main,
            );
        }
        if self.shell.is_visible(Panel::Tutorial) {
            frame.render_widget(
                panel("HOW TO PLAY", view::tutorial_text(), Panel::Tutorial),
                layout.main,
            );
        }
        if self.shell.is_visible(Panel::DataReset) {
            frame.render_widget(
                panel("DELETE DATA", view::data_reset_text(), Panel::DataReset)
                    .style(style::WARNING),
                layout.main,
            );
        }
        if self.shell.is_visible(Panel::Start) {
            let selecting =
                self.game.phase() == Phase::DifficultySelect || self.game.session().is_none();
            let text = if selecting {
                view::difficulty_text(&self.game)
            } else {
                let stage = self.countdown.map(|stage| stage.to_string());
                view::start_text(&self.game, stage.as_deref())
            };
            frame.render_widget(panel("START", text, Panel::Start), layout.main);
        }
        if self.shell.is_visible(Panel::Finish)
            && let Some(summary) = self.game.last_finish()
        {
            let text = view::finish_text(summary, self.banner.as_deref());
            frame.render_widget(panel("FINISH", text, Panel::Finish), layout.garden);
        }
    }
}

/// `1` to `4` pick a difficulty, in menu order.
fn difficulty_for_key(c: char) -> Option<Difficulty> {
    let index = c.to_digit(10)?.checked_sub(1)?;
    Difficulty::ALL.get(usize::try_from(index).ok()?).copied()
}

fn click_of(button: MouseButton) -> Option<Click> {
    match button {
        MouseButton::Left => Some(Click::Primary),
        MouseButton::Right => Some(Click::Secondary),
        MouseButton::Middle => None,
    }
}

impl App for PlayApp {
    #[expect(clippy::cast_precision_loss)]
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(FPS as f64);
        runtime.set_frame_rate(FPS as f64);
        if let Ok((width, height)) = crossterm::terminal::size() {
            self.screen = Rect::new(0, 0, width, height);
        }
    }

    fn should_exit(&self) -> bool {
        self.is_exiting || self.game.should_exit()
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        match event {
            Event::Resize(width, height) => self.screen = Rect::new(0, 0, width, height),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let layout = self.layout(frame.area());
        self.draw_garden(frame, &layout);
        self.draw_panels(frame, &layout);
        frame.render_widget(
            KeyBindingDisplay::new(view::key_bindings(&self.game)),
            layout.help,
        );
    }

    fn update(&mut self, _runtime: &mut Runtime, dt: Duration) {
        let dt = dt.as_secs_f32();
        let input = self.controls.take_frame();
        self.game.tick(dt, &input);
        self.process_events();
        for ticket in self.shell.tick(dt) {
            self.game.complete_transition(ticket);
            self.process_events();
        }
        self.flashes.retain_mut(|flash| {
            flash.remaining -= dt;
            flash.remaining > 0.0
        });
        self.update_shake();
    }
}
