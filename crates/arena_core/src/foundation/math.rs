//! Math utilities and types
//!
//! Provides the vector types and the handful of scalar helpers the simulation
//! needs. The simulation plane is X/Z; Y is elevation.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}

/// Math utility functions
pub mod utils {
    /// Squared distance on the X/Z plane
    pub fn planar_distance_squared(ax: f32, az: f32, bx: f32, bz: f32) -> f32 {
        let dx = ax - bx;
        let dz = az - bz;
        dx * dx + dz * dz
    }

    /// Whether every value is finite (no NaN, no infinity)
    pub fn all_finite(values: &[f32]) -> bool {
        values.iter().all(|v| v.is_finite())
    }
}
