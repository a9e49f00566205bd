//! Pooled visual particles
//!
//! A fixed set of particle slots is reused for every impact, death and skill
//! effect. Survivors are grouped by type each tick for instanced rendering.

pub mod particle;
pub mod particle_system;

pub use particle::{Particle, ParticleOptions, ParticleTemplate, ParticleType};
pub use particle_system::{ParticleInstance, ParticleStats, ParticleSystem};
