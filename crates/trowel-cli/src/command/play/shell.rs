use std::collections::HashSet;

use log::{debug, trace};
use trowel_engine::{AudioSink, SfxKind, TransitionTicket, UiShell, UiTransition};

/// Screen regions that transitions show and hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Title,
    Start,
    Hud,
    Finish,
    Tutorial,
    DataReset,
}

impl Panel {
    /// The panel a transition acts on and whether it shows it.
    fn of(transition: UiTransition) -> (Self, bool) {
        match transition {
            UiTransition::ShowTitle => (Panel::Title, true),
            UiTransition::HideTitle => (Panel::Title, false),
            UiTransition::ShowStart => (Panel::Start, true),
            UiTransition::HideStart => (Panel::Start, false),
            UiTransition::ShowHud => (Panel::Hud, true),
            UiTransition::HideHud => (Panel::Hud, false),
            UiTransition::ShowFinish => (Panel::Finish, true),
            UiTransition::HideFinish => (Panel::Finish, false),
            UiTransition::ShowTutorial => (Panel::Tutorial, true),
            UiTransition::HideTutorial => (Panel::Tutorial, false),
            UiTransition::ShowDataReset => (Panel::DataReset, true),
            UiTransition::HideDataReset => (Panel::DataReset, false),
        }
    }
}

#[derive(Debug)]
struct Playing {
    ticket: TransitionTicket,
    elapsed: f32,
}

/// [`UiShell`] that fades panels in and out over a fixed time.
///
/// A shown panel is visible from the moment its transition begins; a hidden
/// one stays on screen until its transition completes.
#[derive(Debug)]
pub struct TuiShell {
    duration: f32,
    visible: HashSet<Panel>,
    playing: Vec<Playing>,
}

impl TuiShell {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            visible: HashSet::from([Panel::Title]),
            playing: vec![],
        }
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    /// Returns whether a transition on `panel` is still playing.
    pub fn is_fading(&self, panel: Panel) -> bool {
        self.playing
            .iter()
            .any(|p| Panel::of(p.ticket.transition()).0 == panel)
    }

    /// Advances animations by `dt` seconds and returns the tickets that
    /// finished, in the order they began.
    pub fn tick(&mut self, dt: f32) -> Vec<TransitionTicket> {
        let duration = self.duration;
        let mut done = vec![];
        self.playing.retain_mut(|playing| {
            playing.elapsed += dt;
            if playing.elapsed >= duration {
                done.push(playing.ticket);
                false
            } else {
                true
            }
        });
        for ticket in &done {
            let (panel, shown) = Panel::of(ticket.transition());
            if !shown {
                self.visible.remove(&panel);
            }
            trace!("transition {} done", ticket.transition());
        }
        done
    }
}

impl UiShell for TuiShell {
    fn begin(&mut self, ticket: TransitionTicket) {
        let (panel, shown) = Panel::of(ticket.transition());
        if shown {
            self.visible.insert(panel);
        }
        trace!("transition {} begins", ticket.transition());
        self.playing.push(Playing {
            ticket,
            elapsed: 0.0,
        });
    }
}

/// [`AudioSink`] for a terminal without sound: effects go to the log.
#[derive(Debug)]
pub struct LogAudio {
    volume: f32,
}

impl LogAudio {
    pub fn new(volume: f32) -> Self {
        Self { volume }
    }

    pub fn set_volume(&mut self, volume: f32) {
        debug!("volume set to {:.0}%", volume * 100.0);
        self.volume = volume;
    }
}

impl AudioSink for LogAudio {
    fn play_effect(&mut self, kind: SfxKind) {
        if self.volume > 0.0 {
            debug!("sfx {kind} at {:.0}%", self.volume * 100.0);
        }
    }
}
