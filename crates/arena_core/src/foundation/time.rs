//! Time management utilities

use std::time::{Duration, Instant};

/// Wall-clock frame timer
///
/// Measures the duration between consecutive `tick` calls. The performance
/// governor feeds these durations into its rolling history.
pub struct FrameClock {
    last_frame: Option<Instant>,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock; the first tick only starts timing
    pub fn new() -> Self {
        Self {
            last_frame: None,
            frame_count: 0,
        }
    }

    /// Mark the start of a new frame and return the previous frame's duration
    ///
    /// Returns `None` on the very first tick since there is no previous frame.
    pub fn tick(&mut self) -> Option<Duration> {
        let now = Instant::now();
        let elapsed = self.last_frame.map(|last| now.duration_since(last));
        self.last_frame = Some(now);
        self.frame_count += 1;
        elapsed
    }

    /// Number of ticks observed
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Forget the previous frame so the next tick starts a fresh measurement
    pub fn reset(&mut self) {
        self.last_frame = None;
        self.frame_count = 0;
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
