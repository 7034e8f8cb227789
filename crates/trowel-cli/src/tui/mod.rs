//! Fixed-rate terminal loop for the game.
//!
//! [`Runtime`] owns the terminal (raw mode, alternate screen and mouse
//! capture) and drives an [`App`]: ticks at a fixed rate with the measured
//! elapsed time, renders at most once per frame interval, and forwards
//! crossterm events in between.

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
