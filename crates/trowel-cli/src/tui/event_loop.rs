use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Longest step handed to a single tick.
///
/// A suspended terminal must not fast-forward the game clock.
const MAX_TICK_STEP: Duration = Duration::from_millis(250);

/// Tick and render scheduling.
///
/// Ticks fire at a fixed interval and report the real elapsed time. Renders
/// happen after a state change, at most once per frame interval.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    frame_interval: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(1)).unwrap_or(now);
        Self {
            tick_interval: Duration::from_secs(1) / 60,
            frame_interval: Duration::from_secs(1) / 60,
            last_tick: now,
            last_render: past_time,
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
    }

    pub(super) fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Blocks until a tick or render is due or a crossterm event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            let since_tick = now.duration_since(self.last_tick);
            if since_tick >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(since_tick.min(MAX_TICK_STEP)));
            }

            if self.dirty && now.duration_since(self.last_render) >= self.frame_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if !event::poll(self.compute_timeout(now))? {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Duration {
        let next_tick_at = self.last_tick + self.tick_interval;
        let next_at = if self.dirty {
            next_tick_at.min(self.last_render + self.frame_interval)
        } else {
            next_tick_at
        };
        next_at.saturating_duration_since(now)
    }
}
