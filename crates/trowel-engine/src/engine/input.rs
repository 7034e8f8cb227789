use arrayvec::ArrayVec;

use crate::{Phase, TilePos};

/// Axis magnitude below which the stick counts as neutral.
pub const AXIS_DEADZONE: f32 = 0.1;

/// Raw device state sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Tile under the pointer, if any.
    pub pointer: Option<TilePos>,
    /// Primary action held (place).
    pub primary: bool,
    /// Secondary action held (reset tile).
    pub secondary: bool,
    /// Horizontal axis in `[-1, 1]`; cycles the selected item.
    pub horizontal: f32,
    /// Vertical axis in `[-1, 1]`; cycles the overlay amount.
    pub vertical: f32,
    /// Select pressed this tick.
    pub select: bool,
    /// Cancel pressed this tick.
    pub cancel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Cycle {
    Forward,
    Backward,
}

impl Cycle {
    fn from_axis(value: f32) -> Option<Self> {
        if value > AXIS_DEADZONE {
            Some(Cycle::Forward)
        } else if value < -AXIS_DEADZONE {
            Some(Cycle::Backward)
        } else {
            None
        }
    }
}

/// A player intent the game can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pointer moved onto a tile, or off the grid.
    Hover(Option<TilePos>),
    /// Paint the selected item onto the hovered tile.
    Place,
    /// Reset the hovered tile to the default base.
    ResetTile,
    CycleItem(Cycle),
    CycleAmount(Cycle),
    /// End the garden early and have it judged.
    FinishNow,
    NextGarden,
    ToTitle,
    /// Leave the game from the finish screen.
    Quit,
}

/// Turns held buttons and analog axes into discrete [`Command`]s.
///
/// Holding the secondary action resets a tile once; the debounce re-arms when
/// the hovered tile changes. Axis input is edge-triggered: after firing, the
/// axis has to return to neutral before it fires again.
///
/// # Example
///
/// ```
/// use trowel_engine::{Command, Cycle, InputAdapter, InputFrame, Phase};
///
/// let mut input = InputAdapter::new();
/// let held = InputFrame { horizontal: 1.0, ..InputFrame::default() };
///
/// let commands = input.translate(&held, Phase::Playing);
/// assert_eq!(commands.as_slice(), [Command::CycleItem(Cycle::Forward)]);
/// assert!(input.translate(&held, Phase::Playing).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    hovered: Option<TilePos>,
    already_reset: bool,
    axis_in_use: bool,
}

impl InputAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<TilePos> {
        self.hovered
    }

    /// Forgets hover and edge state, e.g. when a new garden starts.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn translate(&mut self, frame: &InputFrame, phase: Phase) -> ArrayVec<Command, 3> {
        let mut commands = ArrayVec::new();
        match phase {
            Phase::Playing => {
                if frame.pointer != self.hovered {
                    self.hovered = frame.pointer;
                    self.already_reset = false;
                    commands.push(Command::Hover(frame.pointer));
                }

                if frame.primary {
                    commands.push(Command::Place);
                } else if frame.secondary && !self.already_reset && self.hovered.is_some() {
                    self.already_reset = true;
                    commands.push(Command::ResetTile);
                }

                let horizontal = Cycle::from_axis(frame.horizontal);
                let vertical = Cycle::from_axis(frame.vertical);
                if let Some(cycle) = horizontal.filter(|_| !self.axis_in_use) {
                    self.axis_in_use = true;
                    commands.push(Command::CycleItem(cycle));
                } else if let Some(cycle) = vertical.filter(|_| !self.axis_in_use) {
                    self.axis_in_use = true;
                    commands.push(Command::CycleAmount(cycle));
                } else if frame.select {
                    commands.push(Command::FinishNow);
                } else if horizontal.is_none() && vertical.is_none() {
                    self.axis_in_use = false;
                }
            }
            Phase::Finished => {
                if frame.select {
                    commands.push(Command::NextGarden);
                } else if frame.cancel {
                    commands.push(Command::Quit);
                }
            }
            _ => {}
        }
        commands
    }
}
