//! # Stellar Physics
//!
//! Data and per-frame math behind the dying-star animation: colors, spawn
//! shells, the expanding nebula field and the background star field.

pub mod color;
pub mod constants;
pub mod field;
pub mod particle;
pub mod scene;
pub mod spawn;
pub mod starfield;

pub use color::*;
pub use constants::*;
pub use field::*;
pub use particle::*;
pub use scene::*;
pub use spawn::*;
pub use starfield::*;
