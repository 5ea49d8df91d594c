//! Accumulating timers driven by frame deltas (seconds)

/// Fires at most once per interval
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: f32,
    accumulator: f32,
}

impl FixedInterval {
    /// Timer that first fires after one full interval
    pub fn new(seconds: f32) -> Self {
        Self {
            interval: seconds,
            accumulator: 0.0,
        }
    }

    /// Timer that fires on its first tick
    pub fn primed(seconds: f32) -> Self {
        Self {
            interval: seconds,
            accumulator: seconds,
        }
    }

    /// Add delta, returns true if the interval has elapsed.
    ///
    /// Long stalls fire once, not once per missed interval.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;

        if self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            if self.accumulator >= self.interval {
                self.accumulator = 0.0;
            }
            true
        } else {
            false
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }
}

/// Counts rendered frames and reports a rate once per second
#[derive(Debug, Clone)]
pub struct FrameStats {
    total: u64,
    window_frames: u32,
    window: FixedInterval,
    window_time: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            total: 0,
            window_frames: 0,
            window: FixedInterval::new(1.0),
            window_time: 0.0,
        }
    }

    /// Record one frame, returns frames per second when a window closes
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.total += 1;
        self.window_frames += 1;
        self.window_time += delta;

        if self.window.tick(delta) {
            let fps = self.window_frames as f32 / self.window_time.max(f32::EPSILON);
            self.window_frames = 0;
            self.window_time = 0.0;
            Some(fps)
        } else {
            None
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_after_elapsed() {
        let mut timer = FixedInterval::new(0.5);
        assert!(!timer.tick(0.2));
        assert!(!timer.tick(0.2));
        assert!(timer.tick(0.2));
        assert!(!timer.tick(0.2));
    }

    #[test]
    fn primed_interval_fires_immediately() {
        let mut timer = FixedInterval::primed(0.5);
        assert!(timer.tick(0.0));
        assert!(!timer.tick(0.1));
    }

    #[test]
    fn long_stall_fires_once() {
        let mut timer = FixedInterval::new(0.1);
        assert!(timer.tick(10.0));
        assert!(!timer.tick(0.0));
        assert!(!timer.tick(0.05));
        assert!(timer.tick(0.05));
    }

    #[test]
    fn stats_report_once_per_second() {
        let mut stats = FrameStats::new();
        let mut reports = Vec::new();
        for _ in 0..150 {
            if let Some(fps) = stats.record(1.0 / 60.0) {
                reports.push(fps);
            }
        }

        assert_eq!(stats.total(), 150);
        assert_eq!(reports.len(), 2);
        assert!((reports[0] - 60.0).abs() < 1.5);
    }
}
