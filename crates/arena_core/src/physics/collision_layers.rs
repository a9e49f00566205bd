//! Collision group and mask system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."
//!
//! Each entity category owns one bit. The mask table is indexed directly by
//! group, so a filter check is one array load and one AND.

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

bitflags! {
    /// Set of collision groups
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionMask: u32 {
        /// Player character
        const PLAYER = 1 << 0;
        /// Enemy characters
        const ENEMY = 1 << 1;
        /// Projectiles fired by the player
        const BULLET = 1 << 2;
        /// Area-effect and projectile skill instances
        const SKILL = 1 << 3;
        /// Pickups and collectibles
        const PICKUP = 1 << 4;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 5;
    }
}

/// Entity category used for collision filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionGroup {
    /// Player character
    Player,
    /// Enemy characters
    Enemy,
    /// Projectiles
    Bullet,
    /// Skill instances
    Skill,
    /// Pickups
    Pickup,
    /// Static geometry
    Environment,
}

impl CollisionGroup {
    /// Number of groups (size of group-indexed tables)
    pub const COUNT: usize = 6;

    /// All groups in table order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Player,
        Self::Enemy,
        Self::Bullet,
        Self::Skill,
        Self::Pickup,
        Self::Environment,
    ];

    /// Table index of this group
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The group's bit
    pub const fn bit(self) -> CollisionMask {
        match self {
            Self::Player => CollisionMask::PLAYER,
            Self::Enemy => CollisionMask::ENEMY,
            Self::Bullet => CollisionMask::BULLET,
            Self::Skill => CollisionMask::SKILL,
            Self::Pickup => CollisionMask::PICKUP,
            Self::Environment => CollisionMask::ENVIRONMENT,
        }
    }

    /// Parse a group name; unknown names fall back to `Environment`
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "player" => Self::Player,
            "enemy" => Self::Enemy,
            "bullet" | "projectile" => Self::Bullet,
            "skill" => Self::Skill,
            "pickup" => Self::Pickup,
            _ => Self::Environment,
        }
    }
}

/// Per-group collision masks, indexed by `CollisionGroup::index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskTable {
    masks: [CollisionMask; CollisionGroup::COUNT],
}

impl MaskTable {
    /// Table where nothing collides with anything
    pub const fn empty() -> Self {
        Self { masks: [CollisionMask::empty(); CollisionGroup::COUNT] }
    }

    /// Mask for a group
    pub fn mask(&self, group: CollisionGroup) -> CollisionMask {
        self.masks[group.index()]
    }

    /// Replace a group's mask
    pub fn set_mask(&mut self, group: CollisionGroup, mask: CollisionMask) {
        self.masks[group.index()] = mask;
    }

    /// Whether `a` is permitted to collide with `b` (b's bit is in a's mask)
    pub fn allows(&self, a: CollisionGroup, b: CollisionGroup) -> bool {
        self.mask(a).contains(b.bit())
    }
}

impl Default for MaskTable {
    /// Default matrix for the arena: every permitted pair is listed on both sides
    fn default() -> Self {
        let mut table = Self::empty();
        table.set_mask(
            CollisionGroup::Player,
            CollisionMask::ENEMY | CollisionMask::PICKUP | CollisionMask::ENVIRONMENT,
        );
        table.set_mask(
            CollisionGroup::Enemy,
            CollisionMask::PLAYER | CollisionMask::BULLET | CollisionMask::SKILL | CollisionMask::ENVIRONMENT,
        );
        table.set_mask(CollisionGroup::Bullet, CollisionMask::ENEMY | CollisionMask::ENVIRONMENT);
        table.set_mask(CollisionGroup::Skill, CollisionMask::ENEMY);
        table.set_mask(CollisionGroup::Pickup, CollisionMask::PLAYER);
        table.set_mask(
            CollisionGroup::Environment,
            CollisionMask::PLAYER | CollisionMask::ENEMY | CollisionMask::BULLET,
        );
        table
    }
}
