//! # Arena Core
//!
//! Frame-budget-aware simulation core for a real-time arena action game.
//!
//! ## Features
//!
//! - **Collision**: spatial hash broad phase with group/mask filtering and
//!   vertical span narrow phase
//! - **Particles**: fixed-capacity pool with per-type batches for instanced rendering
//! - **Adaptive Quality**: hysteretic FPS governor driving a four-rung quality ladder
//! - **Configuration**: TOML or RON session settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arena_core::prelude::*;
//!
//! # fn frame<P: Player, E: Enemy, B: Projectile, S: AreaSkill, K: Pickup>(
//! #     player: &mut P, enemies: &mut [E], bullets: &mut [B], skills: &mut [S], pickups: &mut [K],
//! # ) -> Result<(), ConfigError> {
//! let mut sim = Simulation::new(&SimulationConfig::default())?;
//!
//! let profile = sim.begin_frame(16.7);
//! // gameplay moves entities and spawns particles under `profile`
//! let mut ctx = FrameContext::new(Some(player), enemies, bullets, skills, pickups);
//! let report = sim.finish_frame(&mut ctx);
//! // gameplay removes `report.collisions.removed_bullets` etc.
//! # let _ = (profile, report);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;
pub mod foundation;

// Frame-loop components
pub mod entity;
pub mod spatial;
pub mod physics;
pub mod particles;
pub mod performance;

mod simulation;

#[cfg(test)]
mod test_support;

pub use simulation::{FrameReport, Simulation, SimulationStats};

/// Common imports for core users
pub mod prelude {
    pub use crate::{
        FrameReport, Simulation, SimulationStats,
        core::config::{Config, ConfigError, DeviceClass, SimulationConfig},
        entity::{AreaSkill, Collidable, Damageable, Enemy, Pickup, Player, Positioned, Projectile, SkillCategory},
        foundation::math::Vec3,
        particles::{ParticleOptions, ParticleSystem, ParticleType},
        performance::{Adjustment, PerformanceGovernor, QualityLevel, QualityProfile},
        physics::{
            CollisionEngine, CollisionGroup, CollisionMask, CollisionReport, EntityHandle, EntityKind,
            FrameContext,
        },
    };
}
