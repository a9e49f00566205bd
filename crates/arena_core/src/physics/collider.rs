//! Per-frame collider snapshots and the two-phase overlap test
//!
//! GEA 13.3.1: "The broad phase quickly identifies pairs of objects that might
//! be colliding... The narrow phase performs detailed shape-to-shape tests."
//! Here the broad phase is a bounding-circle test on the X/Z plane and the
//! narrow phase is a vertical span overlap.

use crate::entity::Collidable;
use crate::foundation::math::utils::planar_distance_squared;
use crate::physics::collision_layers::{CollisionGroup, MaskTable};

/// Vertical extent `[bottom, top]` of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalSpan {
    /// Base elevation
    pub bottom: f32,
    /// Base elevation plus height
    pub top: f32,
}

impl VerticalSpan {
    /// Span starting at `elevation` and rising `height` units
    pub fn new(elevation: f32, height: f32) -> Self {
        Self {
            bottom: elevation,
            top: elevation + height,
        }
    }

    /// Closed-interval overlap (touching spans overlap)
    pub fn overlaps(&self, other: &Self) -> bool {
        self.bottom <= other.top && other.bottom <= self.top
    }
}

/// Immutable snapshot of everything the overlap test reads from an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// X position
    pub x: f32,
    /// Z position
    pub z: f32,
    /// Bounding circle radius
    pub radius: f32,
    /// Vertical extent, when the entity has both elevation and height
    pub vertical: Option<VerticalSpan>,
    /// Filter group
    pub group: Option<CollisionGroup>,
}

impl Collider {
    /// Ungrouped collider without elevation data
    pub fn new(x: f32, z: f32, radius: f32) -> Self {
        Self {
            x,
            z,
            radius,
            vertical: None,
            group: None,
        }
    }

    /// Attach a vertical span
    pub fn with_vertical(mut self, elevation: f32, height: f32) -> Self {
        self.vertical = Some(VerticalSpan::new(elevation, height));
        self
    }

    /// Attach a filter group
    pub fn with_group(mut self, group: CollisionGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Snapshot an entity; `None` when its position or radius is not a usable number
    ///
    /// Elevation data that is missing or not finite leaves `vertical` empty,
    /// which makes the entity collide on broad phase alone.
    pub fn from_entity<E: Collidable + ?Sized>(entity: &E) -> Option<Self> {
        let (x, z) = entity.planar_position();
        let radius = entity.collision_radius();
        let collider = Self {
            x,
            z,
            radius,
            vertical: None,
            group: entity.collision_group(),
        };
        if !collider.is_valid() {
            return None;
        }

        let vertical = match (entity.elevation(), entity.collision_height()) {
            (Some(y), Some(h)) if y.is_finite() && h.is_finite() && h >= 0.0 => Some(VerticalSpan::new(y, h)),
            _ => None,
        };
        Some(Self { vertical, ..collider })
    }

    /// Whether position and radius are finite and the radius is non-negative
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.z.is_finite() && self.radius.is_finite() && self.radius >= 0.0
    }
}

/// Filter, broad phase and narrow phase for two snapshots
///
/// Identity is the caller's concern; this only looks at the data.
pub fn colliders_overlap(a: &Collider, b: &Collider, masks: &MaskTable) -> bool {
    if !(a.is_valid() && b.is_valid()) {
        return false;
    }

    // Filter only when both sides carry a group
    if let (Some(group_a), Some(group_b)) = (a.group, b.group) {
        if !masks.allows(group_a, group_b) {
            return false;
        }
    }

    let reach = a.radius + b.radius;
    if planar_distance_squared(a.x, a.z, b.x, b.z) > reach * reach {
        return false;
    }

    match (a.vertical, b.vertical) {
        (Some(span_a), Some(span_b)) => span_a.overlaps(&span_b),
        _ => true,
    }
}
