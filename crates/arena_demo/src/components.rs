//! Demo entity types
//!
//! Plain structs standing in for real gameplay objects. Each implements the
//! core's capability traits so the simulation can borrow them per frame.

use arena_core::prelude::*;

/// Planar motion shared by every moving entity
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    /// X displacement per tick
    pub x: f32,
    /// Z displacement per tick
    pub z: f32,
}

impl Velocity {
    /// Velocity of `speed` toward a target
    pub fn toward(from: (f32, f32), to: (f32, f32), speed: f32) -> Self {
        let (dx, dz) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dz * dz).sqrt();
        if length <= f32::EPSILON {
            return Self::default();
        }
        Self {
            x: dx / length * speed,
            z: dz / length * speed,
        }
    }
}

/// Health pool
#[derive(Debug, Clone, Copy)]
pub struct Health {
    /// Current health
    pub current: f32,
    /// Maximum health
    pub max: f32,
}

impl Health {
    /// Full health
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage; returns whether this emptied the pool
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.current = (self.current - amount).max(0.0);
        self.is_dead()
    }

    /// Heal, capped at the maximum
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Check if dead
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct DemoPlayer {
    /// X position
    pub x: f32,
    /// Z position
    pub z: f32,
    /// Health
    pub health: Health,
}

impl DemoPlayer {
    /// Spawn at the arena center
    pub fn new(max_health: f32) -> Self {
        Self {
            x: 0.0,
            z: 0.0,
            health: Health::new(max_health),
        }
    }
}

impl Positioned for DemoPlayer {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }

    fn elevation(&self) -> Option<f32> {
        Some(0.0)
    }
}

impl Collidable for DemoPlayer {
    fn collision_radius(&self) -> f32 {
        1.0
    }

    fn collision_height(&self) -> Option<f32> {
        Some(2.0)
    }
}

impl Damageable for DemoPlayer {
    fn take_damage(&mut self, amount: f32) -> bool {
        self.health.take_damage(amount)
    }
}

impl Player for DemoPlayer {}

/// Enemy size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemySize {
    /// Slow and tough
    Large,
    /// Middle ground
    Medium,
    /// Fast and fragile
    Small,
}

impl EnemySize {
    /// Pick a size from a roll in `[0, 1)`
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.15 {
            Self::Large
        } else if roll < 0.5 {
            Self::Medium
        } else {
            Self::Small
        }
    }

    /// Collision radius
    pub fn radius(self) -> f32 {
        match self {
            Self::Large => 2.0,
            Self::Medium => 1.2,
            Self::Small => 0.7,
        }
    }

    /// Starting health
    pub fn health(self) -> f32 {
        match self {
            Self::Large => 60.0,
            Self::Medium => 25.0,
            Self::Small => 10.0,
        }
    }

    /// Movement per tick
    pub fn speed(self) -> f32 {
        match self {
            Self::Large => 0.04,
            Self::Medium => 0.07,
            Self::Small => 0.11,
        }
    }
}

/// A hostile chasing the player
#[derive(Debug, Clone)]
pub struct DemoEnemy {
    /// X position
    pub x: f32,
    /// Z position
    pub z: f32,
    /// Size category
    pub size: EnemySize,
    /// Health
    pub health: Health,
}

impl DemoEnemy {
    /// Spawn an enemy of the given size
    pub fn new(x: f32, z: f32, size: EnemySize) -> Self {
        Self {
            x,
            z,
            size,
            health: Health::new(size.health()),
        }
    }

    /// Step toward a point
    pub fn chase(&mut self, target: (f32, f32)) {
        let velocity = Velocity::toward((self.x, self.z), target, self.size.speed());
        self.x += velocity.x;
        self.z += velocity.z;
    }
}

impl Positioned for DemoEnemy {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }

    fn elevation(&self) -> Option<f32> {
        Some(0.0)
    }
}

impl Collidable for DemoEnemy {
    fn collision_radius(&self) -> f32 {
        self.size.radius()
    }

    fn collision_height(&self) -> Option<f32> {
        Some(self.size.radius() * 2.0)
    }
}

impl Damageable for DemoEnemy {
    fn take_damage(&mut self, amount: f32) -> bool {
        self.health.take_damage(amount)
    }
}

impl Enemy for DemoEnemy {
    fn contact_damage(&self) -> f32 {
        match self.size {
            EnemySize::Large => 0.5,
            EnemySize::Medium => 0.3,
            EnemySize::Small => 0.2,
        }
    }
}

/// Player projectile
#[derive(Debug, Clone)]
pub struct DemoBullet {
    /// X position
    pub x: f32,
    /// Z position
    pub z: f32,
    /// Motion per tick
    pub velocity: Velocity,
    /// Ticks until the bullet expires on its own
    pub ttl: u32,
}

impl DemoBullet {
    /// Advance one tick; returns whether the bullet is still alive
    pub fn advance(&mut self) -> bool {
        self.x += self.velocity.x;
        self.z += self.velocity.z;
        self.ttl = self.ttl.saturating_sub(1);
        self.ttl > 0
    }
}

impl Positioned for DemoBullet {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }

    fn elevation(&self) -> Option<f32> {
        Some(1.0)
    }
}

impl Collidable for DemoBullet {
    fn collision_radius(&self) -> f32 {
        0.3
    }

    fn collision_height(&self) -> Option<f32> {
        Some(0.2)
    }
}

impl Projectile for DemoBullet {
    fn damage(&self) -> f32 {
        10.0
    }
}

/// Active skill area
#[derive(Debug, Clone)]
pub struct DemoSkill {
    /// X position
    pub x: f32,
    /// Z position
    pub z: f32,
    /// Area radius
    pub radius: f32,
    /// Skill family
    pub category: SkillCategory,
    /// Ticks remaining
    pub ttl: u32,
}

impl DemoSkill {
    /// Damage per tick by category
    fn tick_damage(&self) -> f32 {
        match self.category {
            SkillCategory::Turret => 2.0,
            SkillCategory::Laser => 4.0,
            SkillCategory::Airstrike => 8.0,
            SkillCategory::FireEffect => 1.0,
        }
    }
}

impl Positioned for DemoSkill {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }
}

impl Collidable for DemoSkill {
    fn collision_radius(&self) -> f32 {
        self.radius
    }
}

impl AreaSkill for DemoSkill {
    fn damage(&self) -> f32 {
        self.tick_damage()
    }

    fn category(&self) -> SkillCategory {
        self.category
    }
}

/// Health pickup dropped by dead enemies
#[derive(Debug, Clone)]
pub struct DemoPickup {
    /// X position
    pub x: f32,
    /// Z position
    pub z: f32,
    /// Health restored
    pub heal: f32,
    /// Set once collected; the player applies the heal afterwards
    pub collected: bool,
}

impl Positioned for DemoPickup {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }
}

impl Collidable for DemoPickup {
    fn collision_radius(&self) -> f32 {
        0.6
    }
}

impl Pickup for DemoPickup {
    fn apply_effect(&mut self) {
        self.collected = true;
    }
}
