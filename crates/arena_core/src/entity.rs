//! Capability contracts for externally owned entities
//!
//! Gameplay code owns every entity; the core only borrows them for one frame.
//! Instead of probing for whatever fields an object happens to carry, each
//! role is a trait the gameplay type implements, and the frame context is
//! generic over those traits.

use crate::physics::collision_layers::CollisionGroup;

/// Anything with a position on the X/Z plane
pub trait Positioned {
    /// `(x, z)` in world units
    fn planar_position(&self) -> (f32, f32);

    /// Base elevation (y), if the entity tracks one
    fn elevation(&self) -> Option<f32> {
        None
    }
}

/// Anything that can take part in collision tests
pub trait Collidable: Positioned {
    /// Bounding circle radius on the X/Z plane
    fn collision_radius(&self) -> f32;

    /// Vertical extent above `elevation`, if the entity has one
    fn collision_height(&self) -> Option<f32> {
        None
    }

    /// Group tag; `None` means unfiltered
    fn collision_group(&self) -> Option<CollisionGroup> {
        None
    }
}

/// Anything that can be hurt
pub trait Damageable {
    /// Apply damage and report whether the entity is now dead
    fn take_damage(&mut self, amount: f32) -> bool;
}

/// Hostile entity
pub trait Enemy: Collidable + Damageable {
    /// Damage dealt to the player on contact, once per processed frame
    fn contact_damage(&self) -> f32;
}

/// The player character
pub trait Player: Collidable + Damageable {}

/// A projectile that disappears on its first hit
pub trait Projectile: Collidable {
    /// Damage applied to the enemy it hits
    fn damage(&self) -> f32;
}

/// Skill families, resolved in this order each processed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillCategory {
    /// Stationary auto-firing turret
    Turret,
    /// Beam skill
    Laser,
    /// Bombardment from above
    Airstrike,
    /// Lingering ground fire
    FireEffect,
}

impl SkillCategory {
    /// Resolution order
    pub const ORDER: [Self; 4] = [Self::Turret, Self::Laser, Self::Airstrike, Self::FireEffect];
}

/// An active skill instance that damages every enemy it overlaps
pub trait AreaSkill: Collidable {
    /// Damage applied to each overlapped enemy per processed frame
    fn damage(&self) -> f32;

    /// Family this instance belongs to
    fn category(&self) -> SkillCategory;
}

/// A collectible consumed on contact with the player
pub trait Pickup: Collidable {
    /// Invoke the pickup's effect
    fn apply_effect(&mut self);
}
