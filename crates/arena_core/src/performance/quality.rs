//! Quality ladder and the profile bundle published each frame

use serde::{Serialize, Deserialize};
use std::fmt;

/// Discrete fidelity rung, ordered from cheapest to most expensive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    /// Cheapest rung; the floor of the ladder
    Low,
    /// Balanced rung
    Medium,
    /// Default rung for capable devices
    High,
    /// Most expensive rung; the ceiling of the ladder
    Ultra,
}

impl QualityLevel {
    /// All rungs in ascending order
    pub const LADDER: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Ultra];

    /// The next rung down, or `None` at the floor
    pub fn step_down(self) -> Option<Self> {
        match self {
            Self::Low => None,
            Self::Medium => Some(Self::Low),
            Self::High => Some(Self::Medium),
            Self::Ultra => Some(Self::High),
        }
    }

    /// The next rung up, or `None` at the ceiling
    pub fn step_up(self) -> Option<Self> {
        match self {
            Self::Low => Some(Self::Medium),
            Self::Medium => Some(Self::High),
            Self::High => Some(Self::Ultra),
            Self::Ultra => None,
        }
    }

    /// Lowercase name used in logs and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Ultra => "ultra",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of every quality knob for one frame
///
/// The governor owns the live copy. Collision, particles and the renderer each
/// receive a copy per frame and never mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Rung this profile was derived from
    pub level: QualityLevel,
    /// Maximum simultaneously active particles
    pub particle_limit: usize,
    /// Render/simulation cut-off distance in world units
    pub draw_distance: f32,
    /// Maximum enemies resolved by the collision engine per processed frame
    pub entity_limit: usize,
    /// Geometry detail factor in [0, 1]
    pub detail_level: f32,
    /// Texture resolution factor in [0, 1]
    pub texture_quality: f32,
    /// Whether shadows are drawn
    pub shadows_enabled: bool,
    /// Whether post-processing passes run
    pub post_processing_enabled: bool,
    /// Collision runs on every Nth frame (always at least 1)
    pub collision_check_frequency: u32,
    /// Whether draw calls are batched
    pub batching_enabled: bool,
    /// Whether instanced drawing is used
    pub instancing_enabled: bool,
}

impl QualityProfile {
    /// Preset knob values for a rung
    pub fn for_level(level: QualityLevel) -> Self {
        match level {
            QualityLevel::Low => Self {
                level,
                particle_limit: 100,
                draw_distance: 50.0,
                entity_limit: 50,
                detail_level: 0.25,
                texture_quality: 0.25,
                shadows_enabled: false,
                post_processing_enabled: false,
                collision_check_frequency: 2,
                batching_enabled: true,
                instancing_enabled: false,
            },
            QualityLevel::Medium => Self {
                level,
                particle_limit: 250,
                draw_distance: 80.0,
                entity_limit: 100,
                detail_level: 0.5,
                texture_quality: 0.5,
                shadows_enabled: false,
                post_processing_enabled: false,
                collision_check_frequency: 1,
                batching_enabled: true,
                instancing_enabled: true,
            },
            QualityLevel::High => Self {
                level,
                particle_limit: 500,
                draw_distance: 120.0,
                entity_limit: 200,
                detail_level: 0.75,
                texture_quality: 0.75,
                shadows_enabled: true,
                post_processing_enabled: false,
                collision_check_frequency: 1,
                batching_enabled: true,
                instancing_enabled: true,
            },
            QualityLevel::Ultra => Self {
                level,
                particle_limit: 1000,
                draw_distance: 200.0,
                entity_limit: 400,
                detail_level: 1.0,
                texture_quality: 1.0,
                shadows_enabled: true,
                post_processing_enabled: true,
                collision_check_frequency: 1,
                batching_enabled: true,
                instancing_enabled: true,
            },
        }
    }

    /// Collision frequency with the "at least 1" invariant applied
    pub fn effective_collision_frequency(&self) -> u32 {
        self.collision_check_frequency.max(1)
    }
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self::for_level(QualityLevel::High)
    }
}
