//! Fixed-rate frame clock
//!
//! Accumulates wall time and hands out whole simulation steps, so the update
//! loop runs at the configured rate regardless of how long a frame took.

use std::time::{Duration, Instant};

use crate::consts::MAX_SUBSTEPS;

/// Longest frame fed into the accumulator (larger gaps are dropped)
const MAX_FRAME: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct FrameClock {
    step: Duration,
    accumulator: Duration,
    max_substeps: u32,
    last: Option<Instant>,
}

impl FrameClock {
    /// Clock stepping `fps` times per second (`fps` is clamped to at least 1)
    pub fn new(fps: u32) -> Self {
        Self {
            step: Duration::from_nanos(1_000_000_000 / fps.max(1) as u64),
            accumulator: Duration::ZERO,
            max_substeps: MAX_SUBSTEPS,
            last: None,
        }
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    /// Length of one simulation step
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Feed elapsed time; returns how many steps to run now
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.min(MAX_FRAME);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Sample the wall clock and advance by the time since the previous call
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = self
            .last
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last = Some(now);
        self.advance(elapsed)
    }

    /// Time left until the next step is due
    pub fn until_next_step(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }
}
