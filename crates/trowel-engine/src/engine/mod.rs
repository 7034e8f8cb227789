//! Game rules and the session state machine.
//!
//! - [`GardenGame`] - Screen flow, input handling and the finish sequence
//! - [`Session`] - A single garden: grid, resources, judge and countdown
//! - [`Resources`] - Clock and budget, parameterized by [`Difficulty`]
//! - [`PreferenceSelector`] - Judge taste generation
//! - [`ScoreCard`] - Scoring of a finished garden
//! - [`UnlockState`] - Persistent progression over the catalog
//! - [`InputAdapter`] - Raw input to [`Command`]s
//! - [`TransitionQueue`] - Ordering of UI barriers and game actions
//!
//! # Game Flow
//!
//! 1. Title, then difficulty select
//! 2. Countdown ("Ready", "Set", "GO"); instant in infinity mode
//! 3. Play until time runs out, the budget is spent, or the player finishes
//! 4. The garden is judged and the unlock level advances
//! 5. Next garden (budget carried over) or back to title
//!
//! Collaborators (audio, UI shell, sprites, storage) are reached through
//! the traits in this module; see [`GameEvent`] and [`dispatch`].

pub use self::{
    config::*, countdown::*, game::*, host::*, input::*, judge::*, narrative::*, resources::*,
    scoring::*, seed::*, session::*, shake::*, stats::*, transition::*, unlock::*,
};

mod config;
mod countdown;
mod game;
mod host;
mod input;
mod judge;
mod narrative;
mod resources;
mod scoring;
mod seed;
mod session;
mod shake;
mod stats;
mod transition;
mod unlock;
