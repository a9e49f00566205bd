//! Core collision detection system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! Every processed frame the spatial hash is rebuilt from the frame context,
//! then four resolution passes run in a fixed order:
//!
//! ```text
//! rebuild grid ─► bullets vs enemies ─► player vs enemies
//!              ─► skills vs enemies (turret, laser, airstrike, fire)
//!              ─► pickups vs player
//! ```
//!
//! Each pass queries the grid around the side with many small members instead
//! of testing all pairs.

use log::{debug, trace};

use crate::core::config::CollisionConfig;
use crate::entity::{AreaSkill, Collidable, Enemy, Pickup, Player, Projectile, SkillCategory};
use crate::performance::quality::QualityProfile;
use crate::physics::collider::{colliders_overlap, Collider};
use crate::physics::collision_layers::{CollisionGroup, CollisionMask, MaskTable};
use crate::physics::frame_context::{EntityHandle, EntityKind, FrameContext};
use crate::spatial::SpatialHashGrid;

/// Instrumentation hook invoked after a resolved collision
pub type CollisionCallback = Box<dyn FnMut(&CollisionEvent)>;

/// A resolved collision, as seen by registered callbacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Entity whose neighbourhood was searched (bullet, player, skill, pickup)
    pub source: EntityHandle,
    /// Entity it collided with
    pub target: EntityHandle,
    /// Group of `source`
    pub source_group: CollisionGroup,
    /// Group of `target`
    pub target_group: CollisionGroup,
    /// Damage applied by this collision (0 for pickups)
    pub damage: f32,
    /// Whether the damaged entity died from it
    pub lethal: bool,
}

/// What gameplay has to apply after a processed frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// `false` when the frame was skipped by the check frequency
    pub processed: bool,
    /// Bullets that hit something, in resolution order
    pub removed_bullets: Vec<usize>,
    /// Pickups the player collected, in resolution order
    pub collected_pickups: Vec<usize>,
    /// Enemies whose `take_damage` reported death this frame
    pub killed_enemies: Vec<usize>,
    /// Number of enemies that dealt contact damage to the player
    pub player_hits: usize,
    /// Whether any contact damage killed the player
    pub player_died: bool,
}

/// Diagnostic counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Broad-phase candidates examined in the last processed frame
    pub potential_checks: usize,
    /// Candidates that passed every test in the last processed frame
    pub actual_collisions: usize,
    /// Entities inserted into the grid in the last rebuild
    pub grid_entities: usize,
    /// Non-empty cells after the last rebuild
    pub grid_cells: usize,
    /// Grid cells examined by every query in the last processed frame
    pub cells_examined: usize,
    /// Entities dropped from the last rebuild for malformed data
    pub dropped_malformed: usize,
    /// Frames on which collision ran
    pub frames_processed: u64,
    /// Frames skipped by the check frequency
    pub frames_skipped: u64,
}

/// Spatial-hash collision engine
pub struct CollisionEngine {
    grid: SpatialHashGrid<EntityHandle>,
    /// Last rebuild's snapshots, indexed by `[kind][index]`
    colliders: [Vec<Option<Collider>>; EntityKind::COUNT],
    max_radius: [f32; EntityKind::COUNT],
    masks: MaskTable,
    callbacks: [[Option<CollisionCallback>; CollisionGroup::COUNT]; CollisionGroup::COUNT],
    frame_counter: u64,
    stats: CollisionStats,
    query_buf: Vec<EntityHandle>,
}

impl CollisionEngine {
    /// Create an engine with the default mask table plus the configured overrides
    pub fn new(config: &CollisionConfig) -> Self {
        let mut masks = MaskTable::default();
        for (group, targets) in &config.mask_overrides {
            let group = CollisionGroup::from_name(group);
            let mask = targets
                .iter()
                .fold(CollisionMask::empty(), |mask, target| mask | CollisionGroup::from_name(target).bit());
            debug!("Collision mask override: {:?} -> {:?}", group, mask);
            masks.set_mask(group, mask);
        }

        Self {
            grid: SpatialHashGrid::new(config.cell_size),
            colliders: Default::default(),
            max_radius: [0.0; EntityKind::COUNT],
            masks,
            callbacks: std::array::from_fn(|_| std::array::from_fn(|_| None)),
            frame_counter: 0,
            stats: CollisionStats::default(),
            query_buf: Vec::new(),
        }
    }

    /// Replace the mask for one group
    pub fn set_mask(&mut self, group: CollisionGroup, mask: CollisionMask) {
        self.masks.set_mask(group, mask);
    }

    /// Current mask table
    pub fn masks(&self) -> &MaskTable {
        &self.masks
    }

    /// Register a callback for collisions where a `source` entity hits a `target`
    ///
    /// The built-in passes report `Bullet -> Enemy`, `Player -> Enemy`,
    /// `Skill -> Enemy` and `Pickup -> Player`. A later registration for the
    /// same ordered pair replaces the earlier one.
    pub fn on_collision<F>(&mut self, source: CollisionGroup, target: CollisionGroup, callback: F)
    where
        F: FnMut(&CollisionEvent) + 'static,
    {
        self.callbacks[source.index()][target.index()] = Some(Box::new(callback));
    }

    /// Drop every registered callback
    pub fn clear_callbacks(&mut self) {
        for row in &mut self.callbacks {
            for slot in row.iter_mut() {
                *slot = None;
            }
        }
    }

    /// Insert an entity into the grid under `group`
    ///
    /// Entities with a non-finite position or radius are skipped and the grid
    /// is left untouched. Returns whether the entity was inserted.
    pub fn add_to_grid<E>(&mut self, handle: EntityHandle, entity: &E, group: CollisionGroup) -> bool
    where
        E: Collidable + ?Sized,
    {
        let Some(collider) = Collider::from_entity(entity) else {
            trace!("Dropping malformed {:?} from collision grid", handle);
            self.stats.dropped_malformed += 1;
            return false;
        };
        let collider = collider.with_group(group);

        if !self.grid.insert(handle, collider.x, collider.z) {
            return false;
        }
        let table = &mut self.colliders[handle.kind.index()];
        if table.len() <= handle.index {
            table.resize(handle.index + 1, None);
        }
        table[handle.index] = Some(collider);
        let widest = &mut self.max_radius[handle.kind.index()];
        *widest = widest.max(collider.radius);
        true
    }

    /// Handles in the square cell block covering `radius` around `(x, z)`
    ///
    /// May include entities outside the circle; never omits one inside it.
    pub fn query_nearby(&self, x: f32, z: f32, radius: f32) -> Vec<EntityHandle> {
        self.grid.query_nearby(x, z, radius)
    }

    /// Full collision test between two entities
    ///
    /// Rejects an entity paired with itself, malformed entities, and pairs
    /// where both sides carry a group and `b`'s group is not in `a`'s mask.
    pub fn check_collision<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Collidable + ?Sized,
        B: Collidable + ?Sized,
    {
        if std::ptr::addr_eq(a as *const A, b as *const B) {
            return false;
        }
        match (Collider::from_entity(a), Collider::from_entity(b)) {
            (Some(collider_a), Some(collider_b)) => colliders_overlap(&collider_a, &collider_b, &self.masks),
            _ => false,
        }
    }

    /// Collision test between two entities already in the grid
    pub fn check_handles(&self, a: EntityHandle, b: EntityHandle) -> bool {
        if a == b {
            return false;
        }
        match (self.collider(a), self.collider(b)) {
            (Some(collider_a), Some(collider_b)) => colliders_overlap(collider_a, collider_b, &self.masks),
            _ => false,
        }
    }

    /// Snapshot taken for a handle in the last rebuild
    pub fn collider(&self, handle: EntityHandle) -> Option<&Collider> {
        self.colliders[handle.kind.index()].get(handle.index).and_then(Option::as_ref)
    }

    /// Run one frame of collision resolution
    ///
    /// Runs only on every `collision_check_frequency`-th call; other calls
    /// return an unprocessed, empty report. At most `entity_limit` enemies
    /// (in collection order) take part in a processed frame.
    pub fn process<P, E, B, S, K>(
        &mut self,
        ctx: &mut FrameContext<'_, P, E, B, S, K>,
        profile: &QualityProfile,
    ) -> CollisionReport
    where
        P: Player,
        E: Enemy,
        B: Projectile,
        S: AreaSkill,
        K: Pickup,
    {
        let frequency = u64::from(profile.effective_collision_frequency());
        let due = self.frame_counter % frequency == 0;
        self.frame_counter = self.frame_counter.wrapping_add(1);
        if !due {
            self.stats.frames_skipped += 1;
            return CollisionReport::default();
        }

        self.rebuild(ctx, profile.entity_limit);
        self.stats.potential_checks = 0;
        self.stats.actual_collisions = 0;
        self.stats.cells_examined = 0;

        let mut report = CollisionReport {
            processed: true,
            ..CollisionReport::default()
        };
        let mut killed = vec![false; ctx.enemies.len()];
        let mut buf = std::mem::take(&mut self.query_buf);

        self.resolve_bullets(ctx, &mut killed, &mut buf, &mut report);
        self.resolve_player(ctx, &killed, &mut buf, &mut report);
        self.resolve_skills(ctx, &mut killed, &mut buf, &mut report);
        self.resolve_pickups(ctx, &mut buf, &mut report);

        self.query_buf = buf;
        self.stats.frames_processed += 1;
        trace!(
            "Collision frame: {} candidates, {} hits, {} bullets removed, {} pickups collected",
            self.stats.potential_checks,
            self.stats.actual_collisions,
            report.removed_bullets.len(),
            report.collected_pickups.len()
        );
        report
    }

    fn rebuild<P, E, B, S, K>(&mut self, ctx: &FrameContext<'_, P, E, B, S, K>, entity_limit: usize)
    where
        P: Player,
        E: Enemy,
        B: Projectile,
        S: AreaSkill,
        K: Pickup,
    {
        self.reset_tables();
        self.stats.dropped_malformed = 0;

        if let Some(player) = ctx.player.as_deref() {
            self.add_to_grid(EntityHandle::player(), player, CollisionGroup::Player);
        }

        let enemy_count = ctx.enemies.len().min(entity_limit);
        if enemy_count < ctx.enemies.len() {
            debug!(
                "Entity limit {} reached, {} enemies skipped this frame",
                entity_limit,
                ctx.enemies.len() - enemy_count
            );
        }
        for (index, enemy) in ctx.enemies[..enemy_count].iter().enumerate() {
            self.add_to_grid(EntityHandle::new(EntityKind::Enemy, index), enemy, CollisionGroup::Enemy);
        }
        for (index, bullet) in ctx.bullets.iter().enumerate() {
            self.add_to_grid(EntityHandle::new(EntityKind::Bullet, index), bullet, CollisionGroup::Bullet);
        }
        for (index, skill) in ctx.skills.iter().enumerate() {
            self.add_to_grid(EntityHandle::new(EntityKind::Skill, index), skill, CollisionGroup::Skill);
        }
        for (index, pickup) in ctx.pickups.iter().enumerate() {
            self.add_to_grid(EntityHandle::new(EntityKind::Pickup, index), pickup, CollisionGroup::Pickup);
        }

        self.stats.grid_entities = self.grid.entity_count();
        self.stats.grid_cells = self.grid.cell_count();
    }

    /// Broad-phase candidates of `kind` around `source`, widened by the largest radius of that kind
    fn gather(&mut self, source: &Collider, kind: EntityKind, buf: &mut Vec<EntityHandle>) {
        let reach = source.radius + self.max_radius[kind.index()];
        self.stats.cells_examined += self.grid.query_nearby_into(source.x, source.z, reach, buf);
        buf.retain(|handle| handle.kind == kind);
    }

    fn reset_tables(&mut self) {
        self.grid.clear();
        for table in &mut self.colliders {
            table.clear();
        }
        self.max_radius = [0.0; EntityKind::COUNT];
    }

    fn resolve_bullets<P, E, B, S, K>(
        &mut self,
        ctx: &mut FrameContext<'_, P, E, B, S, K>,
        killed: &mut [bool],
        buf: &mut Vec<EntityHandle>,
        report: &mut CollisionReport,
    ) where
        E: Enemy,
        B: Projectile,
    {
        for bullet_index in 0..ctx.bullets.len() {
            let bullet_handle = EntityHandle::new(EntityKind::Bullet, bullet_index);
            let Some(bullet) = self.collider(bullet_handle).copied() else {
                continue;
            };
            self.gather(&bullet, EntityKind::Enemy, buf);

            // First match in scan order wins, not the nearest
            for &enemy_handle in buf.iter() {
                if killed[enemy_handle.index] {
                    continue;
                }
                self.stats.potential_checks += 1;
                if !self.check_handles(bullet_handle, enemy_handle) {
                    continue;
                }
                self.stats.actual_collisions += 1;

                let damage = ctx.bullets[bullet_index].damage();
                let lethal = ctx.enemies[enemy_handle.index].take_damage(damage);
                if lethal {
                    record_kill(killed, report, enemy_handle.index);
                }
                report.removed_bullets.push(bullet_index);
                self.notify(CollisionEvent {
                    source: bullet_handle,
                    target: enemy_handle,
                    source_group: CollisionGroup::Bullet,
                    target_group: CollisionGroup::Enemy,
                    damage,
                    lethal,
                });
                break;
            }
        }
    }

    fn resolve_player<P, E, B, S, K>(
        &mut self,
        ctx: &mut FrameContext<'_, P, E, B, S, K>,
        killed: &[bool],
        buf: &mut Vec<EntityHandle>,
        report: &mut CollisionReport,
    ) where
        P: Player,
        E: Enemy,
    {
        let Some(player) = ctx.player.as_deref_mut() else {
            return;
        };
        let player_handle = EntityHandle::player();
        let Some(collider) = self.collider(player_handle).copied() else {
            return;
        };
        self.gather(&collider, EntityKind::Enemy, buf);

        for &enemy_handle in buf.iter() {
            if killed[enemy_handle.index] {
                continue;
            }
            self.stats.potential_checks += 1;
            if !self.check_handles(player_handle, enemy_handle) {
                continue;
            }
            self.stats.actual_collisions += 1;

            let damage = ctx.enemies[enemy_handle.index].contact_damage();
            let lethal = player.take_damage(damage);
            report.player_hits += 1;
            report.player_died |= lethal;
            self.notify(CollisionEvent {
                source: player_handle,
                target: enemy_handle,
                source_group: CollisionGroup::Player,
                target_group: CollisionGroup::Enemy,
                damage,
                lethal,
            });
        }
    }

    fn resolve_skills<P, E, B, S, K>(
        &mut self,
        ctx: &mut FrameContext<'_, P, E, B, S, K>,
        killed: &mut [bool],
        buf: &mut Vec<EntityHandle>,
        report: &mut CollisionReport,
    ) where
        E: Enemy,
        S: AreaSkill,
    {
        for category in SkillCategory::ORDER {
            for skill_index in 0..ctx.skills.len() {
                if ctx.skills[skill_index].category() != category {
                    continue;
                }
                let skill_handle = EntityHandle::new(EntityKind::Skill, skill_index);
                let Some(skill) = self.collider(skill_handle).copied() else {
                    continue;
                };
                let damage = ctx.skills[skill_index].damage();
                self.gather(&skill, EntityKind::Enemy, buf);

                for &enemy_handle in buf.iter() {
                    if killed[enemy_handle.index] {
                        continue;
                    }
                    self.stats.potential_checks += 1;
                    if !self.check_handles(skill_handle, enemy_handle) {
                        continue;
                    }
                    self.stats.actual_collisions += 1;

                    let lethal = ctx.enemies[enemy_handle.index].take_damage(damage);
                    if lethal {
                        record_kill(killed, report, enemy_handle.index);
                    }
                    self.notify(CollisionEvent {
                        source: skill_handle,
                        target: enemy_handle,
                        source_group: CollisionGroup::Skill,
                        target_group: CollisionGroup::Enemy,
                        damage,
                        lethal,
                    });
                }
            }
        }
    }

    fn resolve_pickups<P, E, B, S, K>(
        &mut self,
        ctx: &mut FrameContext<'_, P, E, B, S, K>,
        buf: &mut Vec<EntityHandle>,
        report: &mut CollisionReport,
    ) where
        K: Pickup,
    {
        let player_handle = EntityHandle::player();
        if self.collider(player_handle).is_none() {
            return;
        }

        for pickup_index in 0..ctx.pickups.len() {
            let pickup_handle = EntityHandle::new(EntityKind::Pickup, pickup_index);
            let Some(pickup) = self.collider(pickup_handle).copied() else {
                continue;
            };
            self.gather(&pickup, EntityKind::Player, buf);
            if buf.is_empty() {
                continue;
            }

            self.stats.potential_checks += 1;
            if !self.check_handles(pickup_handle, player_handle) {
                continue;
            }
            self.stats.actual_collisions += 1;

            ctx.pickups[pickup_index].apply_effect();
            report.collected_pickups.push(pickup_index);
            self.notify(CollisionEvent {
                source: pickup_handle,
                target: player_handle,
                source_group: CollisionGroup::Pickup,
                target_group: CollisionGroup::Player,
                damage: 0.0,
                lethal: false,
            });
        }
    }

    fn notify(&mut self, event: CollisionEvent) {
        if let Some(callback) = self.callbacks[event.source_group.index()][event.target_group.index()].as_mut() {
            callback(&event);
        }
    }

    /// Diagnostic counters
    pub fn stats(&self) -> CollisionStats {
        self.stats
    }

    /// Number of `process` calls so far (processed or skipped)
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Empty the grid and reset counters, keeping masks and callbacks
    pub fn clear(&mut self) {
        self.reset_tables();
        self.frame_counter = 0;
        self.stats = CollisionStats::default();
    }
}

fn record_kill(killed: &mut [bool], report: &mut CollisionReport, index: usize) {
    if !killed[index] {
        killed[index] = true;
        report.killed_enemies.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::quality::{QualityLevel, QualityProfile};
    use crate::test_support::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> CollisionEngine {
        CollisionEngine::new(&CollisionConfig {
            cell_size: 4.0,
            ..CollisionConfig::default()
        })
    }

    fn every_frame() -> QualityProfile {
        QualityProfile::for_level(QualityLevel::High)
    }

    struct Arena {
        player: Option<TestPlayer>,
        enemies: Vec<TestEnemy>,
        bullets: Vec<TestBullet>,
        skills: Vec<TestSkill>,
        pickups: Vec<TestPickup>,
    }

    impl Arena {
        fn new() -> Self {
            Self {
                player: None,
                enemies: Vec::new(),
                bullets: Vec::new(),
                skills: Vec::new(),
                pickups: Vec::new(),
            }
        }

        fn process(&mut self, engine: &mut CollisionEngine, profile: &QualityProfile) -> CollisionReport {
            let mut ctx = FrameContext::new(
                self.player.as_mut(),
                &mut self.enemies,
                &mut self.bullets,
                &mut self.skills,
                &mut self.pickups,
            );
            engine.process(&mut ctx, profile)
        }
    }

    #[test]
    fn test_add_to_grid_skips_non_finite_position() {
        let mut engine = engine();
        let broken = Body::at(f32::NAN, 0.0, 1.0);
        assert!(!engine.add_to_grid(EntityHandle::new(EntityKind::Enemy, 0), &broken, CollisionGroup::Enemy));
        assert!(engine.query_nearby(0.0, 0.0, 100.0).is_empty());
        assert_eq!(engine.stats().dropped_malformed, 1);
    }

    #[test]
    fn test_add_to_grid_assigns_group() {
        let mut engine = engine();
        let handle = EntityHandle::new(EntityKind::Enemy, 3);
        assert!(engine.add_to_grid(handle, &Body::at(1.0, 1.0, 1.0), CollisionGroup::Enemy));
        assert_eq!(engine.collider(handle).unwrap().group, Some(CollisionGroup::Enemy));
        assert_eq!(engine.query_nearby(1.0, 1.0, 0.0), vec![handle]);
    }

    #[test]
    fn test_check_collision_bullet_and_enemy() {
        let engine = engine();
        let bullet = Body::at(0.0, 0.0, 0.5).with_vertical(1.0, 0.5).with_group(CollisionGroup::Bullet);
        let enemy = Body::at(1.0, 0.0, 1.0).with_vertical(0.0, 2.0).with_group(CollisionGroup::Enemy);
        assert!(engine.check_collision(&bullet, &enemy));
        assert!(engine.check_collision(&enemy, &bullet));
    }

    #[test]
    fn test_check_collision_rejects_self() {
        let engine = engine();
        let body = Body::at(0.0, 0.0, 1.0);
        assert!(!engine.check_collision(&body, &body));
        assert!(engine.check_collision(&body, &body.clone()));
    }

    #[test]
    fn test_check_collision_respects_one_sided_mask() {
        let mut engine = engine();
        engine.set_mask(CollisionGroup::Pickup, CollisionMask::empty());
        let pickup = Body::at(0.0, 0.0, 1.0).with_group(CollisionGroup::Pickup);
        let player = Body::at(0.0, 0.0, 1.0).with_group(CollisionGroup::Player);
        assert!(!engine.check_collision(&pickup, &player));
        assert!(engine.check_collision(&player, &pickup));
    }

    #[test]
    fn test_bullet_damages_enemy_and_is_removed() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0));
        arena.bullets.push(TestBullet::at(0.5, 0.0));
        arena.bullets.push(TestBullet::at(30.0, 30.0));

        let report = arena.process(&mut engine, &every_frame());

        assert!(report.processed);
        assert_eq!(report.removed_bullets, vec![0]);
        assert_eq!(arena.enemies[0].hits, 1);
        assert_eq!(arena.enemies[0].health, 20.0);
        assert!(report.killed_enemies.is_empty());
    }

    #[test]
    fn test_bullet_takes_first_enemy_in_scan_order() {
        let mut engine = engine();
        let mut arena = Arena::new();
        // Both overlap the bullet; enemy 0 is farther but scanned first
        arena.enemies.push(TestEnemy::at(1.0, 0.0));
        arena.enemies.push(TestEnemy::at(0.1, 0.0));
        arena.bullets.push(TestBullet::at(0.0, 0.0));

        arena.process(&mut engine, &every_frame());

        assert_eq!(arena.enemies[0].hits, 1);
        assert_eq!(arena.enemies[1].hits, 0);
    }

    #[test]
    fn test_killed_enemy_is_not_hit_again() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0).with_health(10.0));
        arena.bullets.push(TestBullet::at(0.0, 0.0));
        arena.bullets.push(TestBullet::at(0.2, 0.0));
        arena.skills.push(TestSkill::at(0.0, 0.0, 5.0, SkillCategory::Laser));

        let report = arena.process(&mut engine, &every_frame());

        assert_eq!(report.killed_enemies, vec![0]);
        assert_eq!(report.removed_bullets, vec![0]);
        assert_eq!(arena.enemies[0].hits, 1);
    }

    #[test]
    fn test_player_takes_contact_damage_once_per_enemy() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.player = Some(TestPlayer::at(0.0, 0.0));
        arena.enemies.push(TestEnemy::at(1.0, 0.0));
        arena.enemies.push(TestEnemy::at(-1.0, 0.0));
        arena.enemies.push(TestEnemy::at(20.0, 0.0));

        let report = arena.process(&mut engine, &every_frame());

        let player = arena.player.as_ref().unwrap();
        assert_eq!(report.player_hits, 2);
        assert_eq!(player.hits, 2);
        assert_eq!(player.health, 90.0);
        assert!(!report.player_died);
        assert!(arena.enemies.iter().all(|enemy| enemy.hits == 0));
    }

    #[test]
    fn test_skill_damages_every_overlapping_enemy() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0));
        arena.enemies.push(TestEnemy::at(3.0, 3.0));
        arena.enemies.push(TestEnemy::at(-9.0, 0.0));
        arena.enemies.push(TestEnemy::at(40.0, 0.0));
        arena.skills.push(TestSkill::at(0.0, 0.0, 10.0, SkillCategory::Airstrike));

        let report = arena.process(&mut engine, &every_frame());

        let hits: Vec<u32> = arena.enemies.iter().map(|enemy| enemy.hits).collect();
        assert_eq!(hits, vec![1, 1, 1, 0]);
        assert_eq!(engine.stats().actual_collisions, 3);
        assert!(report.removed_bullets.is_empty());
    }

    #[test]
    fn test_skill_categories_resolve_in_fixed_order() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0));
        arena.skills.push(TestSkill::at(0.0, 0.0, 2.0, SkillCategory::FireEffect));
        arena.skills.push(TestSkill::at(0.0, 0.0, 2.0, SkillCategory::Turret));

        let order = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&order);
        engine.on_collision(CollisionGroup::Skill, CollisionGroup::Enemy, move |event| {
            seen.borrow_mut().push(event.source.index);
        });

        arena.process(&mut engine, &every_frame());

        assert_eq!(*order.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_pickup_applies_effect_and_is_removed() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.player = Some(TestPlayer::at(0.0, 0.0));
        arena.pickups.push(TestPickup::at(1.2, 0.0));
        arena.pickups.push(TestPickup::at(15.0, 0.0));

        let report = arena.process(&mut engine, &every_frame());

        assert_eq!(report.collected_pickups, vec![0]);
        assert_eq!(arena.pickups[0].collected, 1);
        assert_eq!(arena.pickups[1].collected, 0);
    }

    #[test]
    fn test_pickups_ignored_without_player() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.pickups.push(TestPickup::at(0.0, 0.0));
        let report = arena.process(&mut engine, &every_frame());
        assert!(report.collected_pickups.is_empty());
    }

    #[test]
    fn test_check_frequency_skips_frames() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0).with_health(1000.0));
        arena.bullets.push(TestBullet::at(0.0, 0.0));
        let mut profile = every_frame();
        profile.collision_check_frequency = 3;

        let processed: Vec<bool> = (0..6).map(|_| arena.process(&mut engine, &profile).processed).collect();

        assert_eq!(processed, vec![true, false, false, true, false, false]);
        assert_eq!(arena.enemies[0].hits, 2);
        assert_eq!(engine.stats().frames_processed, 2);
        assert_eq!(engine.stats().frames_skipped, 4);
    }

    #[test]
    fn test_entity_limit_caps_enemies() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0));
        arena.enemies.push(TestEnemy::at(0.0, 0.0));
        arena.skills.push(TestSkill::at(0.0, 0.0, 3.0, SkillCategory::Turret));
        let mut profile = every_frame();
        profile.entity_limit = 1;

        arena.process(&mut engine, &profile);

        assert_eq!(arena.enemies[0].hits, 1);
        assert_eq!(arena.enemies[1].hits, 0);
    }

    #[test]
    fn test_malformed_entities_are_dropped_silently() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0));
        let mut broken = TestBullet::at(0.0, 0.0);
        broken.body.z = f32::INFINITY;
        arena.bullets.push(broken);
        arena.bullets.push(TestBullet::at(0.0, 0.0));

        let report = arena.process(&mut engine, &every_frame());

        assert_eq!(report.removed_bullets, vec![1]);
        assert_eq!(engine.stats().dropped_malformed, 1);
    }

    #[test]
    fn test_elevation_separates_flying_bullet() {
        let mut engine = engine();
        let mut arena = Arena::new();
        let mut enemy = TestEnemy::at(0.0, 0.0);
        enemy.body = enemy.body.with_vertical(0.0, 2.0);
        arena.enemies.push(enemy);
        let mut bullet = TestBullet::at(0.0, 0.0);
        bullet.body = bullet.body.with_vertical(5.0, 0.5);
        arena.bullets.push(bullet);

        let report = arena.process(&mut engine, &every_frame());

        assert!(report.removed_bullets.is_empty());
        assert_eq!(engine.stats().potential_checks, 1);
        assert_eq!(engine.stats().actual_collisions, 0);
    }

    #[test]
    fn test_callback_is_additive() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0).with_health(5.0));
        arena.bullets.push(TestBullet::at(0.0, 0.0));

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        engine.on_collision(CollisionGroup::Bullet, CollisionGroup::Enemy, move |event| {
            sink.borrow_mut().push(*event);
        });

        let report = arena.process(&mut engine, &every_frame());

        assert_eq!(report.removed_bullets, vec![0]);
        assert_eq!(report.killed_enemies, vec![0]);
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert!(events[0].lethal);
        assert_eq!(events[0].damage, 10.0);
    }

    #[test]
    fn test_unregistered_pair_fires_nothing() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.player = Some(TestPlayer::at(0.0, 0.0));
        arena.enemies.push(TestEnemy::at(0.5, 0.0));

        let fired = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&fired);
        engine.on_collision(CollisionGroup::Bullet, CollisionGroup::Enemy, move |_| {
            *counter.borrow_mut() += 1;
        });

        let report = arena.process(&mut engine, &every_frame());

        assert_eq!(report.player_hits, 1);
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn test_clear_resets_counter_and_grid() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.enemies.push(TestEnemy::at(0.0, 0.0));
        arena.process(&mut engine, &every_frame());
        assert_eq!(engine.stats().grid_entities, 1);

        engine.clear();
        assert_eq!(engine.frame_counter(), 0);
        assert!(engine.query_nearby(0.0, 0.0, 10.0).is_empty());
        assert_eq!(engine.stats(), CollisionStats::default());
    }

    #[test]
    fn test_small_bullet_hits_rim_of_large_enemy() {
        let mut engine = engine();
        let mut arena = Arena::new();
        let mut boss = TestEnemy::at(14.0, 0.0);
        boss.body.radius = 12.0;
        arena.enemies.push(boss);
        let mut bullet = TestBullet::at(2.5, 0.0);
        bullet.body.radius = 0.2;
        arena.bullets.push(bullet);

        let report = arena.process(&mut engine, &every_frame());

        // The enemy's center cell lies outside the bullet's own neighbourhood
        let own_reach = engine.query_nearby(2.5, 0.0, 0.2);
        assert!(!own_reach.contains(&EntityHandle::new(EntityKind::Enemy, 0)));

        assert_eq!(report.removed_bullets, vec![0]);
        assert_eq!(arena.enemies[0].hits, 1);
    }

    #[test]
    fn test_large_enemy_keeps_queries_bounded() {
        let mut engine = engine();
        let mut arena = Arena::new();
        let mut boss = TestEnemy::at(0.0, 0.0);
        boss.body.radius = 2000.0;
        arena.enemies.push(boss);
        for i in 0..20 {
            arena.bullets.push(TestBullet::at(i as f32 * 37.0, i as f32 * -23.0));
        }

        let report = arena.process(&mut engine, &every_frame());

        let stats = engine.stats();
        assert!(
            stats.cells_examined <= arena.bullets.len() * stats.grid_cells,
            "{} cells examined for {} occupied",
            stats.cells_examined,
            stats.grid_cells
        );
        // Health 30 at 10 per bullet: the first three land, the rest find a dead enemy
        assert_eq!(report.removed_bullets, vec![0, 1, 2]);
        assert_eq!(report.killed_enemies, vec![0]);
    }

    #[test]
    fn test_colliders_indexed_by_kind_and_index() {
        let mut engine = engine();
        let enemy = EntityHandle::new(EntityKind::Enemy, 5);
        let bullet = EntityHandle::new(EntityKind::Bullet, 0);
        assert!(engine.add_to_grid(enemy, &Body::at(0.0, 0.0, 1.0), CollisionGroup::Enemy));
        assert!(engine.add_to_grid(bullet, &Body::at(0.5, 0.0, 0.25), CollisionGroup::Bullet));

        assert!(engine.collider(enemy).is_some());
        assert!(engine.collider(EntityHandle::new(EntityKind::Enemy, 4)).is_none());
        assert!(engine.collider(EntityHandle::new(EntityKind::Bullet, 5)).is_none());
        assert!(engine.check_handles(bullet, enemy));
        assert!(!engine.check_handles(bullet, EntityHandle::new(EntityKind::Enemy, 9)));

        engine.clear();
        assert!(engine.collider(enemy).is_none());
        assert!(!engine.check_handles(bullet, enemy));
    }

    #[test]
    fn test_rebuild_forgets_previous_frame_entities() {
        let mut engine = engine();
        let mut arena = Arena::new();
        arena.bullets.push(TestBullet::at(0.0, 0.0));
        arena.bullets.push(TestBullet::at(5.0, 0.0));
        arena.process(&mut engine, &every_frame());
        assert!(engine.collider(EntityHandle::new(EntityKind::Bullet, 1)).is_some());

        arena.bullets.pop();
        arena.process(&mut engine, &every_frame());
        assert!(engine.collider(EntityHandle::new(EntityKind::Bullet, 0)).is_some());
        assert!(engine.collider(EntityHandle::new(EntityKind::Bullet, 1)).is_none());
    }

    #[test]
    fn test_configured_mask_overrides_apply() {
        let mut config = CollisionConfig::default();
        config.mask_overrides.insert("pickup".to_string(), Vec::new());
        config.mask_overrides.insert("Skill".to_string(), vec!["enemy".to_string(), "lava".to_string()]);
        let engine = CollisionEngine::new(&config);

        assert_eq!(engine.masks().mask(CollisionGroup::Pickup), CollisionMask::empty());
        assert_eq!(
            engine.masks().mask(CollisionGroup::Skill),
            CollisionMask::ENEMY | CollisionMask::ENVIRONMENT
        );
        assert_eq!(engine.masks().mask(CollisionGroup::Player), MaskTable::default().mask(CollisionGroup::Player));
    }
}
