use std::time::{Duration, Instant};

/// Wall-clock delta source for the render loop
#[derive(Debug)]
pub struct Clock {
    started: Instant,
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
        }
    }

    /// Seconds since the previous tick; advances the clock
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Time since the clock was created
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
