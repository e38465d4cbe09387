//! # Stellar Renderer
//!
//! wgpu visualization of the dying star: point sprites, rings, core impostors
//! and the orbit camera that looks at them.

pub mod camera;
pub mod instances;
pub mod points;
pub mod renderer;
pub mod rings;
pub mod spheres;

pub use camera::*;
pub use instances::*;
pub use points::*;
pub use renderer::*;
pub use rings::*;
pub use spheres::*;
