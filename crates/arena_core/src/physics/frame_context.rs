//! Borrowed view of the frame's entities

use crate::physics::collision_layers::CollisionGroup;

/// Which collection of the frame context a handle points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// The single player (index is always 0)
    Player,
    /// `FrameContext::enemies`
    Enemy,
    /// `FrameContext::bullets`
    Bullet,
    /// `FrameContext::skills`
    Skill,
    /// `FrameContext::pickups`
    Pickup,
}

impl EntityKind {
    /// Number of kinds (size of kind-indexed tables)
    pub const COUNT: usize = 5;

    /// Table index of this kind
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Collision group entities of this kind are filed under
    pub const fn group(self) -> CollisionGroup {
        match self {
            Self::Player => CollisionGroup::Player,
            Self::Enemy => CollisionGroup::Enemy,
            Self::Bullet => CollisionGroup::Bullet,
            Self::Skill => CollisionGroup::Skill,
            Self::Pickup => CollisionGroup::Pickup,
        }
    }
}

/// Stable reference to an entity for the duration of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle {
    /// Collection the entity lives in
    pub kind: EntityKind,
    /// Index into that collection
    pub index: usize,
}

impl EntityHandle {
    /// Create a handle
    pub const fn new(kind: EntityKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Handle of the player
    pub const fn player() -> Self {
        Self::new(EntityKind::Player, 0)
    }
}

/// Mutable borrows of every entity collection the collision engine resolves
///
/// Gameplay owns the entities; the context lives for one frame. Removal of
/// bullets and pickups is reported back through `CollisionReport` rather than
/// done here, so indices stay valid while the frame is processed.
pub struct FrameContext<'a, P, E, B, S, K> {
    /// The player, if one is alive this frame
    pub player: Option<&'a mut P>,
    /// Enemies
    pub enemies: &'a mut [E],
    /// Player projectiles
    pub bullets: &'a mut [B],
    /// Active skill instances of every category
    pub skills: &'a mut [S],
    /// Pickups lying in the arena
    pub pickups: &'a mut [K],
}

impl<'a, P, E, B, S, K> FrameContext<'a, P, E, B, S, K> {
    /// Bundle the frame's collections
    pub fn new(
        player: Option<&'a mut P>,
        enemies: &'a mut [E],
        bullets: &'a mut [B],
        skills: &'a mut [S],
        pickups: &'a mut [K],
    ) -> Self {
        Self {
            player,
            enemies,
            bullets,
            skills,
            pickups,
        }
    }

    /// Total number of entities across all collections
    pub fn entity_count(&self) -> usize {
        usize::from(self.player.is_some())
            + self.enemies.len()
            + self.bullets.len()
            + self.skills.len()
            + self.pickups.len()
    }
}
