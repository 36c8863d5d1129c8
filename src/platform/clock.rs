//! Fixed-timestep frame clock
//!
//! Real time is accumulated and paid out as whole simulation ticks, so the
//! sim always runs at `TICKS_PER_SECOND` regardless of how fast frames are
//! drawn.

use std::time::{Duration, Instant};

use crate::consts::TICKS_PER_SECOND;

/// Longest frame we account for; anything slower is treated as this long
const MAX_FRAME: Duration = Duration::from_millis(100);
/// Cap on ticks paid out per frame so a stall can't snowball
pub const MAX_SUBSTEPS: u32 = 4;

#[derive(Debug, Clone)]
pub struct FrameClock {
    step: Duration,
    accumulator: Duration,
    last: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND)
    }
}

impl FrameClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / ticks_per_second.max(1),
            accumulator: Duration::ZERO,
            last: None,
        }
    }

    /// Duration of one simulation tick
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Record a frame at `now` and return how many ticks to run.
    ///
    /// The first call only starts the clock.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last.replace(now) else {
            return 0;
        };
        self.accumulate(now.saturating_duration_since(last))
    }

    fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.min(MAX_FRAME);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            ticks += 1;
        }
        // Drop whatever the substep cap left behind
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }

    /// Time left until the next tick is due, measured from `now`
    pub fn until_next(&self, now: Instant) -> Duration {
        let since_last = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.step
            .saturating_sub(self.accumulator)
            .saturating_sub(since_last)
    }

    /// Forget accumulated time (after a blocking menu, for instance)
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.last = None;
    }
}
