use std::time::{Duration, Instant};

const BASE_INTERVAL_MS: u64 = 400;
const INTERVAL_FLOOR_MS: u64 = 25;
/// Score at which the interval bottoms out.
const MAX_SPEED_SCORE: u64 = 10;

/// `max(400 * (1 - score / 10), 0) + 25` milliseconds.
pub fn tick_interval(score: u64) -> Duration {
    let scaled = BASE_INTERVAL_MS.saturating_sub(BASE_INTERVAL_MS.saturating_mul(score) / MAX_SPEED_SCORE);
    Duration::from_millis(scaled + INTERVAL_FLOOR_MS)
}

/// Decides when the next move is committed. Driven by a monotonic clock, the
/// caller passes in `now` so the schedule can be tested without sleeping.
pub struct GameClock {
    last_tick: Instant,
}

impl GameClock {
    pub fn new(now: Instant) -> Self {
        GameClock { last_tick: now }
    }

    pub fn elapsed_since_tick(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_tick)
    }

    pub fn is_due(&self, now: Instant, score: u64) -> bool {
        self.elapsed_since_tick(now) >= tick_interval(score)
    }

    /// Time left before the next tick; zero once it is due.
    pub fn remaining(&self, now: Instant, score: u64) -> Duration {
        tick_interval(score).saturating_sub(self.elapsed_since_tick(now))
    }

    pub fn reset(&mut self, now: Instant) {
        self.last_tick = now;
    }
}
