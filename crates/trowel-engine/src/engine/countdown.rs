use serde::{Deserialize, Serialize};

const READY_AT: f32 = 2.5;
const SET_BELOW: f32 = 1.55;
const GO_BELOW: f32 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    /// Countdown before the first garden of a run.
    pub normal: f32,
    /// Countdown before a garden chained from a finished one.
    pub chained: f32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            normal: 2.5,
            chained: 3.0,
        }
    }
}

/// Message shown while counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum CountdownStage {
    #[display("Ready")]
    Ready,
    #[display("Set")]
    Set,
    #[display("GO")]
    Go,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownTick {
    /// Stage entered during this tick, if any.
    pub entered: Option<CountdownStage>,
    /// Set on the single tick where the countdown runs out.
    pub finished: bool,
}

/// Staged "Ready / Set / GO" countdown.
///
/// Stages only move forward: `Ready` at 2.5s or more, `Set` once below 1.55s
/// after `Ready`, `GO` once below 0.5s after `Set`. A zero-length countdown
/// finishes on its first tick without showing any stage.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: f32,
    stage: Option<CountdownStage>,
    finished: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
            stage: None,
            finished: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[must_use]
    pub fn stage(&self) -> Option<CountdownStage> {
        self.stage
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tick(&mut self, dt: f32) -> CountdownTick {
        if self.finished {
            return CountdownTick::default();
        }
        if self.remaining <= 0.0 {
            self.finished = true;
            return CountdownTick {
                entered: None,
                finished: true,
            };
        }

        let next = match self.stage {
            None if self.remaining >= READY_AT => Some(CountdownStage::Ready),
            Some(CountdownStage::Ready) if self.remaining < SET_BELOW => Some(CountdownStage::Set),
            Some(CountdownStage::Set) if self.remaining < GO_BELOW => Some(CountdownStage::Go),
            _ => None,
        };
        if next.is_some() {
            self.stage = next;
        }
        self.remaining -= dt;
        CountdownTick {
            entered: next,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(duration: f32, dt: f32) -> (Vec<CountdownStage>, usize) {
        let mut countdown = Countdown::new(duration);
        let mut stages = vec![];
        let mut finishes = 0;
        for _ in 0..10_000 {
            let tick = countdown.tick(dt);
            stages.extend(tick.entered);
            finishes += usize::from(tick.finished);
        }
        (stages, finishes)
    }

    #[test]
    fn test_normal_countdown_stages_in_order() {
        let (stages, finishes) = run(2.5, 1.0 / 60.0);
        assert_eq!(
            stages,
            [CountdownStage::Ready, CountdownStage::Set, CountdownStage::Go]
        );
        assert_eq!(finishes, 1);
    }

    #[test]
    fn test_chained_countdown_shows_ready_once() {
        let (stages, _) = run(3.0, 1.0 / 60.0);
        assert_eq!(stages.first(), Some(&CountdownStage::Ready));
        assert_eq!(stages.len(), 3);
    }

    #[test]
    fn test_zero_countdown_finishes_immediately() {
        let mut countdown = Countdown::new(0.0);
        let tick = countdown.tick(1.0 / 60.0);
        assert!(tick.finished);
        assert_eq!(tick.entered, None);
        assert!(countdown.is_finished());
    }

    #[test]
    fn test_large_steps_do_not_skip_stages() {
        let mut countdown = Countdown::new(2.5);
        assert_eq!(countdown.tick(1.0).entered, Some(CountdownStage::Ready));
        // 1.5s left: below the "Set" mark.
        assert_eq!(countdown.tick(1.0).entered, Some(CountdownStage::Set));
        // 0.5s left: not yet below the "GO" mark.
        assert_eq!(countdown.tick(0.25).entered, None);
        assert_eq!(countdown.tick(0.25).entered, Some(CountdownStage::Go));
        assert!(countdown.tick(0.25).finished);
    }
}
