//! Session clock: the overall run countdown.
//!
//! Starts on the first correct quiz answer, not at game start, and then
//! burns continuously — including while a quiz is open. Decrements once
//! per accumulated second from a fixed total.

use crate::types::SESSION_TIME_LIMIT_SECS;

#[derive(Debug, Clone)]
pub struct SessionClock {
    running: bool,
    secs_remaining: u32,
    carry_ms: u32,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            running: false,
            secs_remaining: SESSION_TIME_LIMIT_SECS,
            carry_ms: 0,
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn secs_remaining(&self) -> u32 {
        self.secs_remaining
    }

    /// Start counting down. Idempotent; only the first call arms the
    /// clock.
    pub fn ensure_started(&mut self) {
        self.running = true;
    }

    /// Advance by `elapsed_ms`. Returns true exactly once, on the tick
    /// that brings the remaining time to zero.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.running || self.secs_remaining == 0 {
            return false;
        }
        self.carry_ms += elapsed_ms;
        while self.carry_ms >= 1000 && self.secs_remaining > 0 {
            self.carry_ms -= 1000;
            self.secs_remaining -= 1;
        }
        self.secs_remaining == 0
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}
