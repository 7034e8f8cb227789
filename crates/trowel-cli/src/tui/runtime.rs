use std::{io, time::Duration};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] on the terminal.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events.set_tick_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Sets the maximum frame rate (Hz).
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events.set_frame_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Runs `app` until [`App::should_exit`] returns `true`.
    ///
    /// Mouse capture is enabled for the whole run and released afterwards,
    /// even when the loop fails.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        execute!(io::stdout(), EnableMouseCapture)?;
        let result = ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(dt) => app.update(&mut self, dt),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        });
        execute!(io::stdout(), DisableMouseCapture)?;
        result
    }
}
