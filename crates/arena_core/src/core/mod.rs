//! # Core Module
//!
//! Shared configuration used to construct the frame-loop components.

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    SimulationConfig,
    DeviceClass,
    DeviceConfig,
    CollisionConfig,
    ParticleConfig,
    PerformanceConfig,
    Config,
    ConfigError,
};
