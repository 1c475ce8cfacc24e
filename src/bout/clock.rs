//! Per-match countdown clock
//!
//! The clock is owned by its match and only ever mutated inside the
//! match's exclusion scope. It knows nothing about timers; a driver task
//! (or a test) feeds it ticks.

use serde::{Deserialize, Serialize};

use crate::core::types::Seconds;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Clock is paused or already expired; nothing changed
    Idle,
    /// Decremented; seconds remaining
    Running(Seconds),
    /// This tick consumed the last second
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoutClock {
    remaining: Seconds,
    running: bool,
}

impl BoutClock {
    /// A clock holding its full duration, not yet running
    pub fn new(duration: Seconds) -> Self {
        Self {
            remaining: duration,
            running: false,
        }
    }

    pub fn remaining(&self) -> Seconds {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Start or resume the countdown. Expired clocks stay stopped.
    pub fn resume(&mut self) {
        if self.remaining > 0 {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Consume one elapsed second
    pub fn tick(&mut self) -> ClockTick {
        if !self.running || self.remaining == 0 {
            return ClockTick::Idle;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.running = false;
            ClockTick::Expired
        } else {
            ClockTick::Running(self.remaining)
        }
    }
}
