//! Adaptive quality controller
//!
//! Keeps a rolling window of frame durations, estimates FPS from its average,
//! and every `adaptive_interval` frames decides whether to move one rung on the
//! quality ladder. Two thresholds form a hysteresis band:
//!
//! ```text
//!   fps
//!    ^
//!    |  ---- target * upgrade_ratio   (whole window above + no spike -> step up)
//!    |        no change
//!    |  ---- target * downgrade_ratio (whole window below -> step down)
//!    +-----------------------------------------------------------> frames
//! ```

use std::collections::VecDeque;

use log::{debug, info};

use crate::core::config::{DeviceClass, PerformanceConfig};
use crate::foundation::time::FrameClock;
use crate::performance::quality::{QualityLevel, QualityProfile};

/// Outcome of one ladder evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Window stayed inside the hysteresis band (or at a ladder end)
    Unchanged,
    /// Moved one rung down
    SteppedDown {
        /// Rung before the change
        from: QualityLevel,
        /// Rung after the change
        to: QualityLevel,
    },
    /// Moved one rung up
    SteppedUp {
        /// Rung before the change
        from: QualityLevel,
        /// Rung after the change
        to: QualityLevel,
    },
    /// Already at `low`: particle limit and draw distance were shrunk instead
    ShrunkAtFloor,
}

/// Per-window bookkeeping, reset after each evaluation
#[derive(Debug, Clone, Copy)]
struct WindowState {
    frames: u32,
    all_below: bool,
    all_above: bool,
    worst_frame_ms: f32,
}

impl WindowState {
    fn new() -> Self {
        Self {
            frames: 0,
            all_below: true,
            all_above: true,
            worst_frame_ms: 0.0,
        }
    }
}

/// Frame-rate driven quality governor
pub struct PerformanceGovernor {
    config: PerformanceConfig,
    target_fps: f32,
    initial_level: QualityLevel,
    profile: QualityProfile,
    history: VecDeque<f32>,
    fps: f32,
    window: WindowState,
    clock: FrameClock,
}

impl PerformanceGovernor {
    /// Create a governor seeded from the device class
    ///
    /// Constrained devices start at `low`, capable ones at `high`.
    pub fn new(config: PerformanceConfig, device_class: DeviceClass, target_fps: u32) -> Self {
        let initial_level = match device_class {
            DeviceClass::Constrained => QualityLevel::Low,
            DeviceClass::Capable => QualityLevel::High,
        };
        let target_fps = target_fps.max(1) as f32;
        info!(
            "Performance governor starting at '{}' ({:?}, target {} fps)",
            initial_level, device_class, target_fps
        );

        Self {
            history: VecDeque::with_capacity(config.history_size.max(1)),
            config,
            target_fps,
            initial_level,
            profile: QualityProfile::for_level(initial_level),
            fps: target_fps,
            window: WindowState::new(),
            clock: FrameClock::new(),
        }
    }

    /// Sample the wall clock and account for the frame that just ended
    ///
    /// The first call only starts the clock.
    pub fn update(&mut self) -> Option<Adjustment> {
        let elapsed = self.clock.tick()?;
        self.record_frame_time(elapsed.as_secs_f32() * 1000.0)
    }

    /// Account for one frame of the given duration in milliseconds
    ///
    /// Returns `Some` on frames where the ladder was evaluated. Non-finite or
    /// non-positive durations are ignored.
    pub fn record_frame_time(&mut self, frame_time_ms: f32) -> Option<Adjustment> {
        if !(frame_time_ms.is_finite() && frame_time_ms > 0.0) {
            debug!("Ignoring invalid frame time sample {}", frame_time_ms);
            return None;
        }

        if self.history.len() >= self.config.history_size.max(1) {
            self.history.pop_front();
        }
        self.history.push_back(frame_time_ms);
        self.fps = 1000.0 / self.average_frame_time_ms();

        self.window.frames += 1;
        self.window.all_below &= self.fps < self.target_fps * self.config.downgrade_ratio;
        self.window.all_above &= self.fps > self.target_fps * self.config.upgrade_ratio;
        self.window.worst_frame_ms = self.window.worst_frame_ms.max(frame_time_ms);

        if self.window.frames < self.config.adaptive_interval.max(1) {
            return None;
        }

        let adjustment = self.evaluate();
        self.window = WindowState::new();
        Some(adjustment)
    }

    fn evaluate(&mut self) -> Adjustment {
        let window = self.window;
        let current = self.profile.level;

        if window.all_below {
            return match current.step_down() {
                Some(lower) => {
                    self.profile = QualityProfile::for_level(lower);
                    info!("Quality {} -> {} ({:.1} fps)", current, lower, self.fps);
                    Adjustment::SteppedDown { from: current, to: lower }
                }
                None => {
                    self.shrink_at_floor();
                    Adjustment::ShrunkAtFloor
                }
            };
        }

        if window.all_above && window.worst_frame_ms <= self.config.spike_threshold_ms {
            if let Some(higher) = current.step_up() {
                self.profile = QualityProfile::for_level(higher);
                info!("Quality {} -> {} ({:.1} fps)", current, higher, self.fps);
                return Adjustment::SteppedUp { from: current, to: higher };
            }
        }

        Adjustment::Unchanged
    }

    fn shrink_at_floor(&mut self) {
        let factor = self.config.floor_shrink_factor;
        let particle_limit = ((self.profile.particle_limit as f32) * factor) as usize;
        self.profile.particle_limit = particle_limit.max(self.config.min_particle_limit);
        self.profile.draw_distance = (self.profile.draw_distance * factor).max(self.config.min_draw_distance);
        info!(
            "Quality floor reached, particle limit {} draw distance {:.1}",
            self.profile.particle_limit, self.profile.draw_distance
        );
    }

    /// Current immutable profile snapshot
    pub fn get_profile(&self) -> QualityProfile {
        self.profile
    }

    /// Current quality rung
    pub fn level(&self) -> QualityLevel {
        self.profile.level
    }

    /// FPS estimate from the rolling average (target FPS before any sample)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Mean of the rolling history in milliseconds
    pub fn average_frame_time_ms(&self) -> f32 {
        if self.history.is_empty() {
            return 1000.0 / self.target_fps;
        }
        self.history.iter().sum::<f32>() / self.history.len() as f32
    }

    /// Number of samples currently in the history
    pub fn sample_count(&self) -> usize {
        self.history.len()
    }

    /// Frame rate the governor tries to hold
    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }

    /// Change the target frame rate; the current window restarts
    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1) as f32;
        self.window = WindowState::new();
    }

    /// Jump straight to a rung (debug override); the current window restarts
    pub fn force_level(&mut self, level: QualityLevel) {
        debug!("Quality forced to '{}'", level);
        self.profile = QualityProfile::for_level(level);
        self.window = WindowState::new();
    }

    /// Back to the seeded rung with an empty history, for a new session
    pub fn reset(&mut self) {
        self.profile = QualityProfile::for_level(self.initial_level);
        self.history.clear();
        self.fps = self.target_fps;
        self.window = WindowState::new();
        self.clock.reset();
    }
}
