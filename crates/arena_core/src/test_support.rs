//! Minimal entity types shared by unit tests

#![allow(missing_docs)]

use crate::entity::{AreaSkill, Collidable, Damageable, Enemy, Pickup, Player, Positioned, Projectile, SkillCategory};
use crate::physics::collision_layers::CollisionGroup;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: f32,
    pub z: f32,
    pub y: Option<f32>,
    pub height: Option<f32>,
    pub radius: f32,
    pub group: Option<CollisionGroup>,
}

impl Body {
    pub fn at(x: f32, z: f32, radius: f32) -> Self {
        Self { x, z, y: None, height: None, radius, group: None }
    }

    pub fn with_vertical(mut self, y: f32, height: f32) -> Self {
        self.y = Some(y);
        self.height = Some(height);
        self
    }

    pub fn with_group(mut self, group: CollisionGroup) -> Self {
        self.group = Some(group);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TestPlayer {
    pub body: Body,
    pub health: f32,
    pub hits: u32,
}

impl TestPlayer {
    pub fn at(x: f32, z: f32) -> Self {
        Self { body: Body::at(x, z, 1.0), health: 100.0, hits: 0 }
    }
}

#[derive(Debug, Clone)]
pub struct TestEnemy {
    pub body: Body,
    pub health: f32,
    pub contact_damage: f32,
    pub hits: u32,
}

impl TestEnemy {
    pub fn at(x: f32, z: f32) -> Self {
        Self { body: Body::at(x, z, 1.0), health: 30.0, contact_damage: 5.0, hits: 0 }
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TestBullet {
    pub body: Body,
    pub damage: f32,
}

impl TestBullet {
    pub fn at(x: f32, z: f32) -> Self {
        Self { body: Body::at(x, z, 0.25), damage: 10.0 }
    }
}

#[derive(Debug, Clone)]
pub struct TestSkill {
    pub body: Body,
    pub damage: f32,
    pub category: SkillCategory,
}

impl TestSkill {
    pub fn at(x: f32, z: f32, radius: f32, category: SkillCategory) -> Self {
        Self { body: Body::at(x, z, radius), damage: 4.0, category }
    }
}

#[derive(Debug, Clone)]
pub struct TestPickup {
    pub body: Body,
    pub collected: u32,
}

impl TestPickup {
    pub fn at(x: f32, z: f32) -> Self {
        Self { body: Body::at(x, z, 0.5), collected: 0 }
    }
}

macro_rules! impl_body {
    ($($ty:ty),*) => {
        $(
            impl Positioned for $ty {
                fn planar_position(&self) -> (f32, f32) {
                    (self.body.x, self.body.z)
                }

                fn elevation(&self) -> Option<f32> {
                    self.body.y
                }
            }

            impl Collidable for $ty {
                fn collision_radius(&self) -> f32 {
                    self.body.radius
                }

                fn collision_height(&self) -> Option<f32> {
                    self.body.height
                }

                fn collision_group(&self) -> Option<CollisionGroup> {
                    self.body.group
                }
            }
        )*
    };
}

impl_body!(TestPlayer, TestEnemy, TestBullet, TestSkill, TestPickup);

impl Positioned for Body {
    fn planar_position(&self) -> (f32, f32) {
        (self.x, self.z)
    }

    fn elevation(&self) -> Option<f32> {
        self.y
    }
}

impl Collidable for Body {
    fn collision_radius(&self) -> f32 {
        self.radius
    }

    fn collision_height(&self) -> Option<f32> {
        self.height
    }

    fn collision_group(&self) -> Option<CollisionGroup> {
        self.group
    }
}

impl Damageable for TestPlayer {
    fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        self.hits += 1;
        self.health <= 0.0
    }
}

impl Player for TestPlayer {}

impl Damageable for TestEnemy {
    fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        self.hits += 1;
        self.health <= 0.0
    }
}

impl Enemy for TestEnemy {
    fn contact_damage(&self) -> f32 {
        self.contact_damage
    }
}

impl Projectile for TestBullet {
    fn damage(&self) -> f32 {
        self.damage
    }
}

impl AreaSkill for TestSkill {
    fn damage(&self) -> f32 {
        self.damage
    }

    fn category(&self) -> SkillCategory {
        self.category
    }
}

impl Pickup for TestPickup {
    fn apply_effect(&mut self) {
        self.collected += 1;
    }
}
