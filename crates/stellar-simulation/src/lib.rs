//! # Stellar Simulation
//!
//! Scene state for the dying star: user configuration, animated effects and
//! the per-frame driver that ties them to the nebula field.

pub mod effects;
pub mod params;
pub mod simulation;

pub use effects::*;
pub use params::*;
pub use simulation::*;
