//! Particle records, per-type templates and spawn options

use crate::foundation::math::Vec3;

/// Visual category of a particle; selects its template and size curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParticleType {
    /// Impact and death bursts; shrinks toward end of life
    Explosion,
    /// Slow rising puffs; grows toward end of life
    Smoke,
    /// Small fast sparks
    Spark,
    /// Hit feedback on living enemies
    Blood,
    /// Fire skill embers
    Fire,
    /// Skill casts
    Magic,
    /// Chunks thrown by destroyed props
    Debris,
    /// Fallback for unrecognized categories
    Default,
}

impl ParticleType {
    /// Every type, in declaration order
    pub const ALL: [Self; 8] = [
        Self::Explosion,
        Self::Smoke,
        Self::Spark,
        Self::Blood,
        Self::Fire,
        Self::Magic,
        Self::Debris,
        Self::Default,
    ];

    /// Parse a category name; unknown names map to `Default`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "explosion" => Self::Explosion,
            "smoke" => Self::Smoke,
            "spark" => Self::Spark,
            "blood" => Self::Blood,
            "fire" => Self::Fire,
            "magic" => Self::Magic,
            "debris" => Self::Debris,
            _ => Self::Default,
        }
    }

    /// Lower-case name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Explosion => "explosion",
            Self::Smoke => "smoke",
            Self::Spark => "spark",
            Self::Blood => "blood",
            Self::Fire => "fire",
            Self::Magic => "magic",
            Self::Debris => "debris",
            Self::Default => "default",
        }
    }

    /// Built-in defaults for this type
    pub fn template(self) -> ParticleTemplate {
        let (color, size, lifespan, gravity, speed) = match self {
            Self::Explosion => (Vec3::new(1.0, 0.55, 0.1), 1.0, 30, -0.01, 0.3),
            Self::Smoke => (Vec3::new(0.4, 0.4, 0.4), 1.5, 90, 0.002, 0.05),
            Self::Spark => (Vec3::new(1.0, 0.9, 0.4), 0.2, 20, -0.02, 0.5),
            Self::Blood => (Vec3::new(0.6, 0.0, 0.0), 0.3, 40, -0.02, 0.2),
            Self::Fire => (Vec3::new(1.0, 0.3, 0.0), 0.8, 45, 0.01, 0.1),
            Self::Magic => (Vec3::new(0.5, 0.2, 1.0), 0.5, 60, 0.0, 0.15),
            Self::Debris => (Vec3::new(0.5, 0.35, 0.2), 0.4, 60, -0.03, 0.25),
            Self::Default => (Vec3::new(1.0, 1.0, 1.0), 0.5, 60, 0.0, 0.1),
        };
        ParticleTemplate {
            color,
            size,
            lifespan,
            gravity,
            speed,
        }
    }

    /// Size at a given remaining-life ratio (1.0 at birth, 0.0 at death)
    pub fn size_at(self, initial_size: f32, life_ratio: f32) -> f32 {
        match self {
            Self::Explosion => initial_size * life_ratio,
            Self::Smoke => initial_size * (1.0 + (1.0 - life_ratio) * 1.5),
            _ => initial_size * (0.5 + 0.5 * life_ratio),
        }
    }
}

impl std::fmt::Display for ParticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Defaults a particle type spawns with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTemplate {
    /// RGB color
    pub color: Vec3,
    /// Initial size
    pub size: f32,
    /// Lifespan in ticks
    pub lifespan: u32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Initial speed used by explosions
    pub speed: f32,
}

/// Caller overrides merged over a template; `None` keeps the template value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParticleOptions {
    /// RGB color
    pub color: Option<Vec3>,
    /// Initial size
    pub size: Option<f32>,
    /// Lifespan in ticks (disables explosion jitter)
    pub lifespan: Option<u32>,
    /// Gravity per tick
    pub gravity: Option<f32>,
    /// Explosion speed
    pub speed: Option<f32>,
    /// Initial velocity (single particles only; explosions compute their own)
    pub velocity: Option<Vec3>,
    /// Constant acceleration
    pub acceleration: Option<Vec3>,
    /// Rotation advance per tick, in radians
    pub rotation_speed: Option<f32>,
}

impl ParticleOptions {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the color
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = Some(color);
        self
    }

    /// Override the size
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Override the lifespan
    pub fn with_lifespan(mut self, ticks: u32) -> Self {
        self.lifespan = Some(ticks);
        self
    }

    /// Override gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Override explosion speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Set a constant acceleration
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Set the spin rate
    pub fn with_rotation_speed(mut self, rotation_speed: f32) -> Self {
        self.rotation_speed = Some(rotation_speed);
        self
    }
}

/// One pooled particle slot
///
/// Fields other than `active` are only meaningful while the slot is active.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Whether the slot is in use
    pub active: bool,
    /// Type tag
    pub particle_type: ParticleType,
    /// World position
    pub position: Vec3,
    /// Displacement per tick
    pub velocity: Vec3,
    /// Velocity change per tick
    pub acceleration: Vec3,
    /// Added to `velocity.y` every tick
    pub gravity: f32,
    /// RGB color
    pub color: Vec3,
    /// Opacity, linear in remaining life
    pub alpha: f32,
    /// Current size
    pub size: f32,
    /// Size at spawn
    pub initial_size: f32,
    /// Remaining ticks
    pub lifespan: u32,
    /// Ticks at spawn
    pub max_lifespan: u32,
    /// Current rotation in radians
    pub rotation: f32,
    /// Rotation advance per tick
    pub rotation_speed: f32,
}

impl Particle {
    /// An unused slot
    pub fn inactive() -> Self {
        Self {
            active: false,
            particle_type: ParticleType::Default,
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            gravity: 0.0,
            color: Vec3::zeros(),
            alpha: 0.0,
            size: 0.0,
            initial_size: 0.0,
            lifespan: 0,
            max_lifespan: 0,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    /// Fill this slot from a template plus overrides and mark it active
    pub(crate) fn activate(
        &mut self,
        particle_type: ParticleType,
        position: Vec3,
        template: &ParticleTemplate,
        options: &ParticleOptions,
    ) {
        let size = options.size.unwrap_or(template.size);
        let lifespan = options.lifespan.unwrap_or(template.lifespan).max(1);
        *self = Self {
            active: true,
            particle_type,
            position,
            velocity: options.velocity.unwrap_or_else(Vec3::zeros),
            acceleration: options.acceleration.unwrap_or_else(Vec3::zeros),
            gravity: options.gravity.unwrap_or(template.gravity),
            color: options.color.unwrap_or(template.color),
            alpha: 1.0,
            size,
            initial_size: size,
            lifespan,
            max_lifespan: lifespan,
            rotation: 0.0,
            rotation_speed: options.rotation_speed.unwrap_or(0.0),
        };
    }

    /// Remaining fraction of life, 1.0 at spawn
    pub fn life_ratio(&self) -> f32 {
        if self.max_lifespan == 0 {
            return 0.0;
        }
        self.lifespan as f32 / self.max_lifespan as f32
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.alpha = 0.0;
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::inactive()
    }
}
