use std::time::Instant;

use crate::constants::TIMER_PERIOD;

/// Delay and sound counters.
///
/// Both count down toward zero once per `TIMER_PERIOD` of wall clock time,
/// however many instructions run in between.
#[derive(Debug, Copy, Clone)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
    last_tick: Instant,
}

impl Timers {
    pub fn new() -> Self {
        Timers {
            delay: 0,
            sound: 0,
            last_tick: Instant::now(),
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Decrements both counters if a full period has passed since the last
    /// decrement. Returns whether it did.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) < TIMER_PERIOD {
            return false;
        }

        self.last_tick = now;
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        true
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}
