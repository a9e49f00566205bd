//! Per-frame orchestration of the governor, collision engine and particle pool

use log::info;

use crate::core::config::{ConfigError, SimulationConfig};
use crate::entity::{AreaSkill, Enemy, Pickup, Player, Projectile};
use crate::particles::{ParticleStats, ParticleSystem};
use crate::performance::{Adjustment, PerformanceGovernor, QualityLevel, QualityProfile};
use crate::physics::{CollisionEngine, CollisionReport, CollisionStats, FrameContext};

/// Everything the host needs after a frame's mutation phase
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Profile the frame ran under
    pub profile: QualityProfile,
    /// Ladder decision taken at the start of the frame, if one was evaluated
    pub adjustment: Option<Adjustment>,
    /// Collision outcomes gameplay must apply
    pub collisions: CollisionReport,
    /// Pool occupancy after the particle update
    pub particles: ParticleStats,
}

/// Read-only diagnostics across all three components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStats {
    /// Frames finished since the last reset
    pub frame: u64,
    /// Collision counters
    pub collision: CollisionStats,
    /// Particle counts
    pub particles: ParticleStats,
    /// Current FPS estimate
    pub fps: f32,
    /// Current quality rung
    pub level: QualityLevel,
}

/// One game session's simulation core
///
/// Each tick runs in a fixed order:
///
/// ```text
/// begin_frame()  -> governor samples the frame time, profile is published
/// (gameplay updates entities and spawns particles)
/// finish_frame() -> collision resolution, then particle integration
/// ```
pub struct Simulation {
    governor: PerformanceGovernor,
    collision: CollisionEngine,
    particles: ParticleSystem,
    profile: QualityProfile,
    last_adjustment: Option<Adjustment>,
    frame: u64,
}

impl Simulation {
    /// Build a session from a validated configuration
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!("Initializing simulation...");

        let governor = PerformanceGovernor::new(
            config.performance.clone(),
            config.device.device_class,
            config.device.target_fps,
        );
        let profile = governor.get_profile();
        let mut particles = ParticleSystem::new(&config.particles);
        particles.apply_profile(&profile);

        Ok(Self {
            governor,
            collision: CollisionEngine::new(&config.collision),
            particles,
            profile,
            last_adjustment: None,
            frame: 0,
        })
    }

    /// Start a frame with an externally measured duration of the previous one
    pub fn begin_frame(&mut self, frame_time_ms: f32) -> QualityProfile {
        let adjustment = self.governor.record_frame_time(frame_time_ms);
        self.publish(adjustment)
    }

    /// Start a frame, measuring the previous one with the wall clock
    pub fn begin_frame_timed(&mut self) -> QualityProfile {
        let adjustment = self.governor.update();
        self.publish(adjustment)
    }

    fn publish(&mut self, adjustment: Option<Adjustment>) -> QualityProfile {
        self.last_adjustment = adjustment;
        self.profile = self.governor.get_profile();
        self.particles.apply_profile(&self.profile);
        self.profile
    }

    /// Resolve collisions and advance particles for the current frame
    pub fn finish_frame<P, E, B, S, K>(&mut self, ctx: &mut FrameContext<'_, P, E, B, S, K>) -> FrameReport
    where
        P: Player,
        E: Enemy,
        B: Projectile,
        S: AreaSkill,
        K: Pickup,
    {
        let collisions = self.collision.process(ctx, &self.profile);
        self.particles.update();
        self.frame += 1;

        FrameReport {
            profile: self.profile,
            adjustment: self.last_adjustment.take(),
            collisions,
            particles: self.particles.stats(),
        }
    }

    /// Profile published by the last `begin_frame`
    pub fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    /// Diagnostics snapshot
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            frame: self.frame,
            collision: self.collision.stats(),
            particles: self.particles.stats(),
            fps: self.governor.fps(),
            level: self.governor.level(),
        }
    }

    /// Start a new session: empty grid and pool, governor back at its seed rung
    pub fn reset(&mut self) {
        info!("Resetting simulation after {} frames", self.frame);
        self.governor.reset();
        self.collision.clear();
        self.particles.clear();
        self.profile = self.governor.get_profile();
        self.particles.apply_profile(&self.profile);
        self.last_adjustment = None;
        self.frame = 0;
    }

    /// Get the governor
    pub fn governor(&self) -> &PerformanceGovernor {
        &self.governor
    }

    /// Get mutable access to the governor
    pub fn governor_mut(&mut self) -> &mut PerformanceGovernor {
        &mut self.governor
    }

    /// Get the collision engine
    pub fn collision(&self) -> &CollisionEngine {
        &self.collision
    }

    /// Get mutable access to the collision engine (masks, callbacks)
    pub fn collision_mut(&mut self) -> &mut CollisionEngine {
        &mut self.collision
    }

    /// Get the particle system
    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Get mutable access to the particle system (spawning)
    pub fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }
}
