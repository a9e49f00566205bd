//! End-to-end frame loop through the public API

use arena_core::prelude::*;

#[derive(Debug, Clone)]
struct Unit {
    x: f32,
    z: f32,
    radius: f32,
    health: f32,
}

impl Unit {
    fn new(x: f32, z: f32, radius: f32, health: f32) -> Self {
        Self { x, z, radius, health }
    }
}

impl Positioned for Unit {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }
}

impl Collidable for Unit {
    fn collision_radius(&self) -> f32 {
        self.radius
    }
}

impl Damageable for Unit {
    fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        self.health <= 0.0
    }
}

impl Player for Unit {}

impl Enemy for Unit {
    fn contact_damage(&self) -> f32 {
        1.0
    }
}

#[derive(Debug, Clone)]
struct Shot {
    x: f32,
    z: f32,
}

impl Positioned for Shot {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }
}

impl Collidable for Shot {
    fn collision_radius(&self) -> f32 {
        0.2
    }
}

impl Projectile for Shot {
    fn damage(&self) -> f32 {
        25.0
    }
}

#[derive(Debug, Clone)]
struct Zone {
    x: f32,
    z: f32,
    radius: f32,
    category: SkillCategory,
}

impl Positioned for Zone {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }
}

impl Collidable for Zone {
    fn collision_radius(&self) -> f32 {
        self.radius
    }
}

impl AreaSkill for Zone {
    fn damage(&self) -> f32 {
        5.0
    }

    fn category(&self) -> SkillCategory {
        self.category
    }
}

#[derive(Debug, Clone)]
struct Orb {
    x: f32,
    z: f32,
    taken: bool,
}

impl Positioned for Orb {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }
}

impl Collidable for Orb {
    fn collision_radius(&self) -> f32 {
        0.5
    }
}

impl Pickup for Orb {
    fn apply_effect(&mut self) {
        self.taken = true;
    }
}

fn session() -> Simulation {
    let config = SimulationConfig::default()
        .with_cell_size(5.0)
        .with_particle_capacity(64)
        .with_particle_seed(11)
        .with_adaptive_interval(20);
    Simulation::new(&config).unwrap()
}

#[test]
fn test_full_frame_resolves_every_pass() {
    let mut sim = session();
    let mut player = Unit::new(0.0, 0.0, 1.0, 100.0);
    let mut enemies = vec![
        Unit::new(1.5, 0.0, 1.0, 20.0),
        Unit::new(20.0, 20.0, 1.0, 20.0),
        Unit::new(-30.0, 0.0, 1.0, 5.0),
    ];
    let mut shots = vec![Shot { x: 20.0, z: 20.5 }, Shot { x: 60.0, z: 60.0 }];
    let mut zones = vec![Zone { x: -30.0, z: 0.0, radius: 3.0, category: SkillCategory::FireEffect }];
    let mut orbs = vec![Orb { x: 0.0, z: 1.0, taken: false }, Orb { x: 9.0, z: 9.0, taken: false }];

    sim.begin_frame(16.0);
    let mut ctx = FrameContext::new(Some(&mut player), &mut enemies, &mut shots, &mut zones, &mut orbs);
    let report = sim.finish_frame(&mut ctx);

    assert!(report.collisions.processed);
    assert_eq!(report.collisions.removed_bullets, vec![0]);
    assert_eq!(report.collisions.killed_enemies, vec![1, 2]);
    assert_eq!(report.collisions.player_hits, 1);
    assert_eq!(report.collisions.collected_pickups, vec![0]);
    assert!(!report.collisions.player_died);

    assert_eq!(player.health, 99.0);
    assert!(orbs[0].taken);
    assert!(!orbs[1].taken);
}

#[test]
fn test_particles_spawned_between_phases_are_batched() {
    let mut sim = session();
    let mut enemies: Vec<Unit> = Vec::new();
    let mut shots: Vec<Shot> = Vec::new();
    let mut zones: Vec<Zone> = Vec::new();
    let mut orbs: Vec<Orb> = Vec::new();

    sim.begin_frame(16.0);
    let burst = sim.particles_mut().create_particle_explosion(
        ParticleType::from_name("explosion"),
        0.0,
        2.0,
        0.0,
        10,
        &ParticleOptions::new(),
    );
    assert_eq!(burst.len(), 10);

    let mut ctx = FrameContext::new(None::<&mut Unit>, &mut enemies, &mut shots, &mut zones, &mut orbs);
    let report = sim.finish_frame(&mut ctx);

    assert_eq!(report.particles.active, 10);
    let batches = sim.particles().get_batches();
    assert_eq!(batches[&ParticleType::Explosion].len(), 10);
    assert_eq!(sim.particles().instance_data(ParticleType::Explosion).len(), 10);
}

#[test]
fn test_governor_hysteresis_over_many_frames() {
    let mut sim = session();
    let mut enemies: Vec<Unit> = Vec::new();
    let mut shots: Vec<Shot> = Vec::new();
    let mut zones: Vec<Zone> = Vec::new();
    let mut orbs: Vec<Orb> = Vec::new();

    let mut run = |sim: &mut Simulation, frame_ms: f32, frames: usize| {
        let mut adjustments = Vec::new();
        for _ in 0..frames {
            sim.begin_frame(frame_ms);
            let mut ctx = FrameContext::new(None::<&mut Unit>, &mut enemies, &mut shots, &mut zones, &mut orbs);
            if let Some(adjustment) = sim.finish_frame(&mut ctx).adjustment {
                adjustments.push(adjustment);
            }
        }
        adjustments
    };

    // 50 fps sits inside the band: no change
    let steady = run(&mut sim, 20.0, 60);
    assert!(steady.iter().all(|adjustment| *adjustment == Adjustment::Unchanged));
    assert_eq!(sim.stats().level, QualityLevel::High);

    // Sustained 25 fps: the rolling average lags the first window, then one rung per window
    let slow = run(&mut sim, 40.0, 80);
    assert_eq!(
        slow,
        vec![
            Adjustment::Unchanged,
            Adjustment::SteppedDown { from: QualityLevel::High, to: QualityLevel::Medium },
            Adjustment::SteppedDown { from: QualityLevel::Medium, to: QualityLevel::Low },
            Adjustment::ShrunkAtFloor,
        ]
    );
    assert!(sim.profile().particle_limit < 100);

    // Recovery needs whole windows above the upper threshold
    let fast = run(&mut sim, 10.0, 120);
    assert!(fast.contains(&Adjustment::SteppedUp { from: QualityLevel::Low, to: QualityLevel::Medium }));
    assert!(sim.stats().level > QualityLevel::Low);
}

#[test]
fn test_config_file_builds_session() {
    let path = std::env::temp_dir().join(format!("arena_core_session_{}.toml", std::process::id()));
    SimulationConfig::default()
        .with_device_class(DeviceClass::Constrained)
        .with_particle_capacity(16)
        .save_to_file(&path)
        .unwrap();

    let config = SimulationConfig::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let sim = Simulation::new(&config).unwrap();
    assert_eq!(sim.stats().level, QualityLevel::Low);
    assert_eq!(sim.particles().capacity(), 100);
}
