//! Physics module for collision detection and resolution
//!
//! Collision uses a uniform spatial hash for the broad phase and group masks
//! to filter which pairs are ever considered.

pub mod collider;
pub mod collision_layers;
pub mod collision_system;
pub mod frame_context;

pub use collider::{colliders_overlap, Collider, VerticalSpan};
pub use collision_layers::{CollisionGroup, CollisionMask, MaskTable};
pub use collision_system::{
    CollisionCallback, CollisionEngine, CollisionEvent, CollisionReport, CollisionStats,
};
pub use frame_context::{EntityHandle, EntityKind, FrameContext};
