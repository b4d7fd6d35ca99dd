//! Tick timing.
//!
//! Wall-clock by default; a fixed delta makes runs deterministic for tests
//! and replays.

use std::time::Instant;

/// Tracks elapsed and per-tick delta time.
#[derive(Debug)]
pub struct TickClock {
    start: Instant,
    last_tick: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    tick_count: u64,
    fixed_delta: Option<f32>,
}

impl TickClock {
    /// Wall-clock driven clock.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            tick_count: 0,
            fixed_delta: None,
        }
    }

    /// Clock that advances by exactly `delta` seconds per tick.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.fixed_delta = Some(delta);
        clock
    }

    /// Advance one tick; returns `(delta_secs, elapsed_secs)`.
    pub fn tick(&mut self) -> (f32, f32) {
        match self.fixed_delta {
            Some(delta) => {
                self.delta_secs = delta;
                self.elapsed_secs += delta;
            }
            None => {
                let now = Instant::now();
                self.delta_secs = now.duration_since(self.last_tick).as_secs_f32();
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
                self.last_tick = now;
            }
        }
        self.tick_count += 1;
        (self.delta_secs, self.elapsed_secs)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.tick_count
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
