//! Spatial partitioning data structures
//!
//! Provides the spatial hash used by the collision engine's broad phase.

mod spatial_hash;

pub use spatial_hash::{CellKey, SpatialHashGrid};
