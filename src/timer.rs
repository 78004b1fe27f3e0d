use std::time::{Duration, Instant};

pub const TIMER_DEC_PER_SECOND: u64 = 60;

/// 8-bit countdown, decremented once per 60 Hz tick and floored at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// Returns true while the timer is still running after the tick.
    pub fn tick(&mut self) -> bool {
        self.count = self.count.saturating_sub(1);
        self.count > 0
    }
}

/// Wall clock for the host loop: tells it how many 60 Hz ticks are due.
#[derive(Debug)]
pub struct TickClock {
    last_updated: Instant,
    period: Duration,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            last_updated: Instant::now(),
            period: Duration::from_nanos(1_000_000_000 / TIMER_DEC_PER_SECOND),
        }
    }

    pub fn due_ticks(&mut self) -> u32 {
        let mut ticks = 0;
        while self.last_updated.elapsed() >= self.period {
            // past deadline
            self.last_updated += self.period;
            ticks += 1;
        }
        ticks
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
