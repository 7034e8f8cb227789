use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Logic update, with the time elapsed since the previous one.
    #[from(ignore)]
    Tick(Duration),
    Render,
    Crossterm(CrosstermEvent),
}
