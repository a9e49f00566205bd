//! Fixed-capacity particle pool
//!
//! Slots are allocated up front and reused; spawning never allocates unless
//! the quality profile raises the cap past the current storage. The logical
//! cap gates new spawns only, so lowering it lets live particles finish their
//! lives naturally.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::config::ParticleConfig;
use crate::foundation::math::constants::TAU;
use crate::foundation::math::utils::{all_finite, planar_distance_squared};
use crate::foundation::math::Vec3;
use crate::particles::particle::{Particle, ParticleOptions, ParticleType};
use crate::performance::quality::QualityProfile;

/// Per-instance record for instanced particle rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World position
    pub position: [f32; 3],
    /// Current size
    pub size: f32,
    /// RGB color plus alpha
    pub color: [f32; 4],
    /// Rotation in radians
    pub rotation: f32,
    /// Keeps the record a multiple of 16 bytes
    pub _padding: [f32; 3],
}

impl From<&Particle> for ParticleInstance {
    fn from(particle: &Particle) -> Self {
        Self {
            position: [particle.position.x, particle.position.y, particle.position.z],
            size: particle.size,
            color: [particle.color.x, particle.color.y, particle.color.z, particle.alpha],
            rotation: particle.rotation,
            _padding: [0.0; 3],
        }
    }
}

/// Pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleStats {
    /// Live particles
    pub active: usize,
    /// Allocated slots
    pub total: usize,
    /// Current spawn cap
    pub cap: usize,
}

/// Pooled particle emitter and integrator
pub struct ParticleSystem {
    particles: Vec<Particle>,
    active_count: usize,
    cap: usize,
    playable_radius: f32,
    height_ceiling: f32,
    batches: HashMap<ParticleType, Vec<usize>>,
    rng: StdRng,
}

impl ParticleSystem {
    /// Allocate `pool_capacity` inactive slots
    pub fn new(config: &ParticleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            particles: vec![Particle::inactive(); config.pool_capacity],
            active_count: 0,
            cap: config.pool_capacity,
            playable_radius: config.playable_radius,
            height_ceiling: config.height_ceiling,
            batches: HashMap::new(),
            rng,
        }
    }

    /// Restart the random sequence used by explosions
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Adopt the profile's particle limit, growing storage if needed
    pub fn apply_profile(&mut self, profile: &QualityProfile) {
        self.set_cap(profile.particle_limit);
    }

    /// Set the spawn cap; storage grows to fit but never shrinks
    pub fn set_cap(&mut self, cap: usize) {
        if cap == self.cap {
            return;
        }
        if cap > self.particles.len() {
            debug!("Growing particle pool from {} to {} slots", self.particles.len(), cap);
            self.particles.resize(cap, Particle::inactive());
        }
        self.cap = cap;
    }

    /// Spawn one particle
    ///
    /// Returns `None` without side effects when the pool is at its cap, no
    /// inactive slot exists, or the position is not finite.
    pub fn create_particle(
        &mut self,
        particle_type: ParticleType,
        x: f32,
        y: f32,
        z: f32,
        options: &ParticleOptions,
    ) -> Option<&Particle> {
        let slot = self.spawn(particle_type, Vec3::new(x, y, z), options)?;
        Some(&self.particles[slot])
    }

    /// Spawn up to `count` particles flying outward from a point
    ///
    /// Each gets a random planar heading and an upward bias. Without an
    /// explicit lifespan, lifespans are jittered by up to 20% either way.
    pub fn create_particle_explosion(
        &mut self,
        particle_type: ParticleType,
        x: f32,
        y: f32,
        z: f32,
        count: usize,
        options: &ParticleOptions,
    ) -> Vec<&Particle> {
        let origin = Vec3::new(x, y, z);
        let template = particle_type.template();
        let speed = options.speed.unwrap_or(template.speed);
        let budget = count.min(self.cap.saturating_sub(self.active_count));

        let mut spawned = Vec::with_capacity(budget);
        for _ in 0..budget {
            let angle = self.rng.gen_range(0.0..TAU);
            let lift = self.rng.gen_range(0.2..1.0);
            let mut per_particle = ParticleOptions {
                velocity: Some(Vec3::new(angle.cos() * speed, lift * speed, angle.sin() * speed)),
                ..*options
            };
            if options.lifespan.is_none() {
                let jitter = self.rng.gen_range(0.8..=1.2);
                per_particle.lifespan = Some(((template.lifespan as f32 * jitter).round() as u32).max(1));
            }

            match self.spawn(particle_type, origin, &per_particle) {
                Some(slot) => spawned.push(slot),
                None => break,
            }
        }

        trace!("Explosion of {} spawned {} of {} particles", particle_type, spawned.len(), count);
        spawned.into_iter().map(|slot| &self.particles[slot]).collect()
    }

    fn spawn(&mut self, particle_type: ParticleType, position: Vec3, options: &ParticleOptions) -> Option<usize> {
        if self.active_count >= self.cap || !all_finite(position.as_slice()) {
            return None;
        }
        let slot = self.particles.iter().position(|particle| !particle.active)?;

        self.particles[slot].activate(particle_type, position, &particle_type.template(), options);
        self.active_count += 1;
        self.batches.entry(particle_type).or_default().push(slot);
        Some(slot)
    }

    /// Advance every live particle by one tick and rebuild the batches
    pub fn update(&mut self) {
        for batch in self.batches.values_mut() {
            batch.clear();
        }

        let radius_squared = self.playable_radius * self.playable_radius;
        for (slot, particle) in self.particles.iter_mut().enumerate() {
            if !particle.active {
                continue;
            }

            particle.lifespan = particle.lifespan.saturating_sub(1);
            if particle.lifespan == 0 {
                particle.deactivate();
                self.active_count -= 1;
                continue;
            }

            particle.velocity += particle.acceleration;
            particle.velocity.y += particle.gravity;
            particle.position += particle.velocity;
            particle.rotation += particle.rotation_speed;

            let ratio = particle.life_ratio();
            particle.size = particle.particle_type.size_at(particle.initial_size, ratio);
            particle.alpha = ratio;

            let position = particle.position;
            let outside = !all_finite(position.as_slice())
                || planar_distance_squared(position.x, position.z, 0.0, 0.0) > radius_squared
                || position.y > self.height_ceiling;
            if outside {
                particle.deactivate();
                self.active_count -= 1;
                continue;
            }

            self.batches.entry(particle.particle_type).or_default().push(slot);
        }
    }

    /// Live particles grouped by type, as of the last `update`
    pub fn get_batches(&self) -> HashMap<ParticleType, Vec<&Particle>> {
        self.batches
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(&particle_type, slots)| {
                let particles = slots.iter().map(|&slot| &self.particles[slot]).collect();
                (particle_type, particles)
            })
            .collect()
    }

    /// One type's batch packed for instanced upload
    pub fn instance_data(&self, particle_type: ParticleType) -> Vec<ParticleInstance> {
        self.batches
            .get(&particle_type)
            .map(|slots| slots.iter().map(|&slot| ParticleInstance::from(&self.particles[slot])).collect())
            .unwrap_or_default()
    }

    /// Slot contents by index
    pub fn particle(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    /// Number of live particles
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Current spawn cap
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Allocated slots
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Active and total counts
    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            active: self.active_count,
            total: self.particles.len(),
            cap: self.cap,
        }
    }

    /// Deactivate every particle, keeping storage and cap
    pub fn clear(&mut self) {
        for particle in &mut self.particles {
            particle.deactivate();
        }
        self.active_count = 0;
        self.batches.clear();
    }
}
