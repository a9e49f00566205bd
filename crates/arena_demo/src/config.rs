//! Demo configuration

use std::path::Path;

use arena_core::config::{Config, ConfigError};
use arena_core::core::config::SimulationConfig;
use serde::{Deserialize, Serialize};

/// Demo configuration: the core's session settings plus arena gameplay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulation core settings
    pub simulation: SimulationConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,
}

/// Gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Frames to simulate before exiting
    pub frames: u32,

    /// Radius of the spawn ring around the player
    pub spawn_radius: f32,

    /// Frames between enemy spawns
    pub spawn_interval: u32,

    /// Enemies spawned per wave
    pub wave_size: u32,

    /// Frames between player shots
    pub fire_interval: u32,

    /// Frames between skill casts
    pub skill_interval: u32,

    /// Bullet speed per tick
    pub bullet_speed: f32,

    /// Starting player health
    pub player_health: f32,

    /// Frame time with an empty arena, in milliseconds
    pub base_frame_ms: f32,

    /// Extra milliseconds per live entity (synthetic load)
    pub cost_per_entity_ms: f32,

    /// Extra milliseconds per live particle (synthetic load)
    pub cost_per_particle_ms: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            frames: 3600,
            spawn_radius: 40.0,
            spawn_interval: 30,
            wave_size: 6,
            fire_interval: 8,
            skill_interval: 240,
            bullet_speed: 0.9,
            player_health: 500.0,
            base_frame_ms: 9.0,
            cost_per_entity_ms: 0.04,
            cost_per_particle_ms: 0.01,
        }
    }
}

impl Config for DemoConfig {}

impl DemoConfig {
    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.simulation.validate()?;
        Ok(config)
    }
}
