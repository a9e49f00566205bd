//! # Simulation Configuration
//!
//! Session setup for the three frame-loop components. Everything here is read
//! once when a `Simulation` is built; per-frame tuning flows through the
//! governor's `QualityProfile` instead.
//!
//! ## Configuration Categories
//!
//! - **Device**: capability hint and target frame rate (seeds the governor)
//! - **Collision**: spatial hash cell size and mask overrides
//! - **Particles**: pool size and playable volume
//! - **Performance**: rolling window and hysteresis thresholds

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Device capability hint used to seed the initial quality rung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Mobile or otherwise constrained hardware (starts at `low`)
    Constrained,
    /// Desktop-class hardware (starts at `high`)
    #[default]
    Capable,
}

impl DeviceClass {
    /// Map a "is this a mobile device" hint to a device class
    pub fn from_mobile_hint(is_mobile: bool) -> Self {
        if is_mobile { Self::Constrained } else { Self::Capable }
    }
}

/// # Device Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Capability hint
    pub device_class: DeviceClass,
    /// Frame rate the governor tries to hold
    pub target_fps: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_class: DeviceClass::Capable,
            target_fps: 60,
        }
    }
}

/// # Collision Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of one spatial hash cell, in world units
    pub cell_size: f32,

    /// Mask replacements applied over the default matrix, keyed by group name
    ///
    /// ```toml
    /// [collision.mask_overrides]
    /// pickup = []
    /// skill = ["enemy", "environment"]
    /// ```
    ///
    /// Unrecognized names resolve to the environment group.
    pub mask_overrides: BTreeMap<String, Vec<String>>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            mask_overrides: BTreeMap::new(),
        }
    }
}

/// # Particle Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of slots allocated up front (also the initial spawn cap)
    pub pool_capacity: usize,
    /// Particles farther than this from the origin on the X/Z plane are retired
    pub playable_radius: f32,
    /// Particles above this elevation are retired
    pub height_ceiling: f32,
    /// RNG seed for explosion spread; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 500,
            playable_radius: 100.0,
            height_ceiling: 50.0,
            seed: None,
        }
    }
}

/// # Performance Governor Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of frame durations kept in the rolling history
    pub history_size: usize,
    /// Frames between two ladder evaluations
    pub adaptive_interval: u32,
    /// Step down when FPS stays below `target * downgrade_ratio`
    pub downgrade_ratio: f32,
    /// Step up when FPS stays above `target * upgrade_ratio`
    pub upgrade_ratio: f32,
    /// A single frame longer than this (ms) blocks stepping up
    pub spike_threshold_ms: f32,
    /// Multiplier applied to particle limit and draw distance when already at `low`
    pub floor_shrink_factor: f32,
    /// Hard lower bound for the particle limit at the floor
    pub min_particle_limit: usize,
    /// Hard lower bound for the draw distance at the floor
    pub min_draw_distance: f32,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            history_size: 60,
            adaptive_interval: 180,
            downgrade_ratio: 0.8,
            upgrade_ratio: 0.95,
            spike_threshold_ms: 50.0,
            floor_shrink_factor: 0.8,
            min_particle_limit: 50,
            min_draw_distance: 30.0,
        }
    }
}

/// # Complete Simulation Configuration
///
/// Top-level configuration for one game session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    /// Device hint and target frame rate
    pub device: DeviceConfig,
    /// Collision engine settings
    pub collision: CollisionConfig,
    /// Particle pool settings
    pub particles: ParticleConfig,
    /// Governor settings
    pub performance: PerformanceConfig,
}

impl SimulationConfig {
    /// Set the device class
    pub fn with_device_class(mut self, device_class: DeviceClass) -> Self {
        self.device.device_class = device_class;
        self
    }

    /// Set the target frame rate
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.device.target_fps = fps;
        self
    }

    /// Set the spatial hash cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.collision.cell_size = cell_size;
        self
    }

    /// Set the particle pool capacity
    pub fn with_particle_capacity(mut self, capacity: usize) -> Self {
        self.particles.pool_capacity = capacity;
        self
    }

    /// Set a fixed particle RNG seed
    pub fn with_particle_seed(mut self, seed: u64) -> Self {
        self.particles.seed = Some(seed);
        self
    }

    /// Set the governor's evaluation interval in frames
    pub fn with_adaptive_interval(mut self, frames: u32) -> Self {
        self.performance.adaptive_interval = frames;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".to_string()));
        }

        if !(self.collision.cell_size.is_finite() && self.collision.cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be a positive number, got {}",
                self.collision.cell_size
            )));
        }

        if self.particles.pool_capacity == 0 {
            return Err(ConfigError::Invalid("particle pool_capacity must be at least 1".to_string()));
        }

        if !(self.particles.playable_radius > 0.0 && self.particles.height_ceiling.is_finite()) {
            return Err(ConfigError::Invalid("particle playable volume must be non-empty".to_string()));
        }

        let perf = &self.performance;
        if perf.history_size == 0 {
            return Err(ConfigError::Invalid("history_size must be at least 1".to_string()));
        }

        if perf.adaptive_interval == 0 {
            return Err(ConfigError::Invalid("adaptive_interval must be at least 1".to_string()));
        }

        if !(perf.upgrade_ratio.is_finite() && perf.upgrade_ratio > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "upgrade_ratio must be a positive number, got {}",
                perf.upgrade_ratio
            )));
        }

        if !(perf.downgrade_ratio > 0.0 && perf.downgrade_ratio < perf.upgrade_ratio) {
            return Err(ConfigError::Invalid(format!(
                "downgrade_ratio ({}) must be positive and below upgrade_ratio ({})",
                perf.downgrade_ratio, perf.upgrade_ratio
            )));
        }

        if !(perf.floor_shrink_factor > 0.0 && perf.floor_shrink_factor < 1.0) {
            return Err(ConfigError::Invalid("floor_shrink_factor must be in (0, 1)".to_string()));
        }

        if !(perf.spike_threshold_ms.is_finite() && perf.spike_threshold_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spike_threshold_ms must be a positive number, got {}",
                perf.spike_threshold_ms
            )));
        }

        if !(perf.min_draw_distance.is_finite() && perf.min_draw_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_draw_distance must be a positive number, got {}",
                perf.min_draw_distance
            )));
        }

        Ok(())
    }
}

impl Config for SimulationConfig {}
