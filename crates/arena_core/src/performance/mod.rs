//! Frame-rate monitoring and adaptive quality
//!
//! The governor is the leaf of the frame loop: it runs first each frame and
//! publishes the `QualityProfile` that collision, particles and the renderer
//! read for the rest of that frame.

pub mod governor;
pub mod quality;

pub use governor::{Adjustment, PerformanceGovernor};
pub use quality::{QualityLevel, QualityProfile};
