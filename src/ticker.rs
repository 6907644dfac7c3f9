//! The one recurring timer.

use std::time::{Duration, Instant};

/// Fixed-period timer identified by a fixed ID. Polled from the event loop;
/// it lives exactly as long as the loop does.
#[derive(Debug)]
pub struct Ticker {
    id: u32,
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    /// First tick is due one `period` after `now`
    pub fn new(id: u32, period: Duration, now: Instant) -> Self {
        Self {
            id,
            period,
            next_due: now + period,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// How long the loop may block before the next tick is due
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Returns the timer ID if a tick is due. A loop that fell behind gets a
    /// single tick and the schedule restarts from `now`, the way coalesced
    /// timer messages behave.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        if now < self.next_due {
            return None;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        Some(self.id)
    }
}
