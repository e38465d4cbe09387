//! GPU-facing instance data shared by the simulation and the renderer

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::color::Rgb;

/// Camera-facing point sprite
/// Aligned for WGSL struct compatibility (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointSprite {
    /// Position in world space
    pub position: [f32; 3],
    /// Billboard diameter in world units
    pub size: f32,
    /// Linear RGB color and opacity
    pub color: [f32; 4],
}

impl PointSprite {
    pub fn new(position: Vec3, size: f32, color: Rgb, opacity: f32) -> Self {
        let [r, g, b] = color.to_linear();
        Self {
            position: position.to_array(),
            size,
            color: [r, g, b, opacity],
        }
    }
}

/// One annulus (or disc, with an inner radius of zero) in its local XY plane
/// Aligned for WGSL struct compatibility (96 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RingInstance {
    /// Local-to-world transform
    pub model: [[f32; 4]; 4],
    /// Linear RGB color and opacity
    pub color: [f32; 4],
    /// x: inner radius, y: outer radius, zw: padding
    pub radii: [f32; 4],
}

impl RingInstance {
    pub fn new(model: Mat4, inner: f32, outer: f32, color: Rgb, opacity: f32) -> Self {
        let [r, g, b] = color.to_linear();
        Self {
            model: model.to_cols_array_2d(),
            color: [r, g, b, opacity],
            radii: [inner, outer, 0.0, 0.0],
        }
    }
}

/// Sphere drawn as a camera-facing impostor
/// Aligned for WGSL struct compatibility (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SphereImpostor {
    pub center: [f32; 3],
    pub radius: f32,
    /// Linear RGB color and opacity
    pub color: [f32; 4],
}

impl SphereImpostor {
    pub fn new(center: Vec3, radius: f32, color: Rgb, opacity: f32) -> Self {
        let [r, g, b] = color.to_linear();
        Self {
            center: center.to_array(),
            radius,
            color: [r, g, b, opacity],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<PointSprite>(), 32);
        assert_eq!(std::mem::align_of::<PointSprite>(), 4);
    }

    #[test]
    fn test_instance_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<RingInstance>(), 96);
        assert_eq!(std::mem::size_of::<SphereImpostor>(), 32);
    }

    #[test]
    fn test_ring_instance_radii() {
        let ring = RingInstance::new(Mat4::IDENTITY, 3.0, 4.0, Rgb::BLACK, 0.4);
        assert_eq!(ring.radii, [3.0, 4.0, 0.0, 0.0]);
        assert_eq!(ring.color, [0.0, 0.0, 0.0, 0.4]);
        assert_eq!(ring.model[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sprite_carries_opacity() {
        let sprite = PointSprite::new(Vec3::new(1.0, 2.0, 3.0), 0.3, Rgb::WHITE, 0.6);
        assert_eq!(sprite.position, [1.0, 2.0, 3.0]);
        assert_eq!(sprite.color, [1.0, 1.0, 1.0, 0.6]);
    }
}
