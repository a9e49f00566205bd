//! Headless arena
//!
//! Drives the simulation core through a scripted survival session: enemies
//! spawn in waves and chase the player, the player auto-fires at the nearest
//! enemy and periodically casts area skills, and dead enemies burst into
//! particles and drop health pickups. Frame times are synthesized from the
//! live entity and particle counts so the quality governor has a load to
//! react to.
//!
//! Usage: `arena_demo [config.toml|config.ron]`

mod components;
mod config;

use std::path::PathBuf;

use arena_core::foundation::logging;
use arena_core::foundation::time::Stopwatch;
use arena_core::prelude::*;
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{DemoBullet, DemoEnemy, DemoPickup, DemoPlayer, DemoSkill, EnemySize, Velocity};
use crate::config::{DemoConfig, GameplayConfig};

/// All gameplay-owned state
struct Arena {
    player: DemoPlayer,
    enemies: Vec<DemoEnemy>,
    bullets: Vec<DemoBullet>,
    skills: Vec<DemoSkill>,
    pickups: Vec<DemoPickup>,
    next_skill: usize,
    kills: u32,
    rng: StdRng,
}

impl Arena {
    fn new(gameplay: &GameplayConfig, seed: u64) -> Self {
        Self {
            player: DemoPlayer::new(gameplay.player_health),
            enemies: Vec::new(),
            bullets: Vec::new(),
            skills: Vec::new(),
            pickups: Vec::new(),
            next_skill: 0,
            kills: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn entity_count(&self) -> usize {
        1 + self.enemies.len() + self.bullets.len() + self.skills.len() + self.pickups.len()
    }

    fn spawn_wave(&mut self, gameplay: &GameplayConfig) {
        for _ in 0..gameplay.wave_size {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let size = EnemySize::from_roll(self.rng.gen());
            self.enemies.push(DemoEnemy::new(
                self.player.x + angle.cos() * gameplay.spawn_radius,
                self.player.z + angle.sin() * gameplay.spawn_radius,
                size,
            ));
        }
    }

    fn nearest_enemy(&self) -> Option<(f32, f32)> {
        self.enemies
            .iter()
            .map(|enemy| (enemy.x, enemy.z))
            .min_by(|a, b| {
                let da = (a.0 - self.player.x).powi(2) + (a.1 - self.player.z).powi(2);
                let db = (b.0 - self.player.x).powi(2) + (b.1 - self.player.z).powi(2);
                da.total_cmp(&db)
            })
    }

    fn fire(&mut self, gameplay: &GameplayConfig) {
        if let Some(target) = self.nearest_enemy() {
            let origin = (self.player.x, self.player.z);
            self.bullets.push(DemoBullet {
                x: origin.0,
                z: origin.1,
                velocity: Velocity::toward(origin, target, gameplay.bullet_speed),
                ttl: 90,
            });
        }
    }

    fn cast_skill(&mut self) {
        let category = SkillCategory::ORDER[self.next_skill % SkillCategory::ORDER.len()];
        self.next_skill += 1;
        let (x, z, radius) = match self.nearest_enemy() {
            Some((x, z)) if category != SkillCategory::Turret => (x, z, 6.0),
            _ => (self.player.x, self.player.z, 10.0),
        };
        self.skills.push(DemoSkill { x, z, radius, category, ttl: 60 });
    }

    fn advance(&mut self) {
        let target = (self.player.x, self.player.z);
        for enemy in &mut self.enemies {
            enemy.chase(target);
        }
        self.bullets.retain_mut(DemoBullet::advance);
        self.skills.retain_mut(|skill| {
            skill.ttl = skill.ttl.saturating_sub(1);
            skill.ttl > 0
        });
    }

    /// Apply the removals a collision frame reported, spawning effects for deaths
    fn apply(&mut self, collisions: &CollisionReport, particles: &mut ParticleSystem) {
        let mut removed = collisions.removed_bullets.clone();
        removed.sort_unstable();
        for index in removed.into_iter().rev() {
            let bullet = self.bullets.swap_remove(index);
            particles.create_particle(ParticleType::Spark, bullet.x, 1.0, bullet.z, &ParticleOptions::new());
        }

        for pickup in self.pickups.iter().filter(|pickup| pickup.collected) {
            self.player.health.heal(pickup.heal);
        }
        self.pickups.retain(|pickup| !pickup.collected);

        let mut killed = collisions.killed_enemies.clone();
        killed.sort_unstable();
        for index in killed.into_iter().rev() {
            let enemy = self.enemies.swap_remove(index);
            self.kills += 1;
            let count = match enemy.size {
                EnemySize::Large => 24,
                EnemySize::Medium => 12,
                EnemySize::Small => 6,
            };
            particles.create_particle_explosion(ParticleType::Explosion, enemy.x, 0.5, enemy.z, count, &ParticleOptions::new());
            particles.create_particle(ParticleType::Smoke, enemy.x, 0.5, enemy.z, &ParticleOptions::new());
            if self.rng.gen_bool(0.2) {
                self.pickups.push(DemoPickup { x: enemy.x, z: enemy.z, heal: 15.0, collected: false });
            }
        }
    }
}

fn synthetic_frame_time(gameplay: &GameplayConfig, arena: &Arena, particles: usize, rng: &mut StdRng) -> f32 {
    let load = gameplay.base_frame_ms
        + arena.entity_count() as f32 * gameplay.cost_per_entity_ms
        + particles as f32 * gameplay.cost_per_particle_ms;
    load * rng.gen_range(0.9..1.1)
}

fn run(config: &DemoConfig) -> Result<(), ConfigError> {
    let gameplay = &config.gameplay;
    let mut sim = Simulation::new(&config.simulation)?;
    let mut arena = Arena::new(gameplay, config.simulation.particles.seed.unwrap_or(0));
    let mut jitter = StdRng::seed_from_u64(0x5eed);

    info!("Running {} frames", gameplay.frames);
    let stopwatch = Stopwatch::start_new();
    let mut frame_ms = gameplay.base_frame_ms;
    for frame in 0..gameplay.frames {
        sim.begin_frame(frame_ms);

        if frame % gameplay.spawn_interval.max(1) == 0 {
            arena.spawn_wave(gameplay);
        }
        if frame % gameplay.fire_interval.max(1) == 0 {
            arena.fire(gameplay);
        }
        if frame % gameplay.skill_interval.max(1) == 0 {
            arena.cast_skill();
        }
        arena.advance();

        let report = {
            let mut ctx = FrameContext::new(
                Some(&mut arena.player),
                &mut arena.enemies,
                &mut arena.bullets,
                &mut arena.skills,
                &mut arena.pickups,
            );
            sim.finish_frame(&mut ctx)
        };
        arena.apply(&report.collisions, sim.particles_mut());

        if let Some(adjustment) = report.adjustment.filter(|adjustment| *adjustment != Adjustment::Unchanged) {
            info!("Frame {}: {:?}", frame, adjustment);
        }
        if report.collisions.player_died || arena.player.health.is_dead() {
            info!("Player died on frame {}", frame);
            break;
        }
        if frame % 600 == 0 {
            let stats = sim.stats();
            info!(
                "Frame {}: {} fps '{}', {} enemies, {}/{} particles, {} checks, {} hits",
                frame,
                stats.fps.round(),
                stats.level,
                arena.enemies.len(),
                stats.particles.active,
                stats.particles.total,
                stats.collision.potential_checks,
                stats.collision.actual_collisions
            );
        }

        frame_ms = synthetic_frame_time(gameplay, &arena, sim.particles().active_count(), &mut jitter);
    }

    let stats = sim.stats();
    info!(
        "Session over after {} frames ({:.0} ms wall time): {} kills, quality '{}', {:.1} fps, player health {:.0}",
        stats.frame,
        stopwatch.elapsed_millis(),
        arena.kills,
        stats.level,
        stats.fps,
        arena.player.health.current
    );
    Ok(())
}

fn main() {
    logging::init("info");

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = match DemoConfig::load_or_default(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}
