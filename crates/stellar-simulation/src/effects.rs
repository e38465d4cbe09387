//! Animated scene pieces around the nebula: core, rings and shock wave

use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::PI;
use stellar_physics::*;

/// Pulsating core and its glow halo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreState {
    /// Scale of the unit core sphere
    pub scale: f32,
    /// Scale of the glow sphere (geometry radius [`GLOW_RADIUS`])
    pub glow_scale: f32,
    pub glow_opacity: f32,
}

impl CoreState {
    pub fn new(core_size: f32) -> Self {
        let mut core = Self {
            scale: 1.0,
            glow_scale: 1.0,
            glow_opacity: GLOW_BASE_OPACITY,
        };
        core.resize(core_size);
        core
    }

    /// Snap to `core_size` without pulsation
    pub fn resize(&mut self, core_size: f32) {
        self.scale = core_size;
        self.glow_scale = core_size * GLOW_SCALE;
    }

    pub fn animate(&mut self, time: f32, core_size: f32) {
        let pulsation = 1.0 + (time * CORE_PULSE_FREQUENCY).sin() * CORE_PULSE_AMPLITUDE;
        self.scale = core_size * pulsation;
        self.glow_scale = core_size * pulsation * GLOW_SCALE;
        self.glow_opacity = GLOW_BASE_OPACITY + (time * GLOW_FREQUENCY).sin() * GLOW_OPACITY_AMPLITUDE;
    }

    /// World radius of the core sphere
    pub fn radius(&self) -> f32 {
        self.scale
    }

    /// World radius of the glow sphere
    pub fn glow_radius(&self) -> f32 {
        GLOW_RADIUS * self.glow_scale
    }
}

/// One of the tilted, slowly spinning rings around the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NebulaRing {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub base_opacity: f32,
    /// Radians added to the z rotation each animated frame
    pub rotation_speed: f32,
    pub pulsation_phase: f32,
    /// Euler angles, applied in XYZ order
    pub rotation: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

impl NebulaRing {
    pub fn animate(&mut self, time: f32, brightness: f32) {
        self.rotation.z += self.rotation_speed;
        self.rotation.x += self.rotation_speed * 0.5;

        let pulsation = (time * RING_PULSE_FREQUENCY + self.pulsation_phase).sin();
        self.opacity = self.base_opacity * brightness * (0.7 + pulsation * 0.3);
        self.scale = 1.0 + pulsation * RING_SCALE_AMPLITUDE;
    }

    pub fn orientation(&self) -> Quat {
        euler_xyz(self.rotation)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orientation(), Vec3::ZERO)
    }
}

/// Build the four ring pairs with random initial tilts
pub fn ring_layout<R: Rng + ?Sized>(rng: &mut R) -> Vec<NebulaRing> {
    let mut rings = Vec::with_capacity(RING_TABLE.len() * 2);

    for (index, &(inner, outer, opacity, speed)) in RING_TABLE.iter().enumerate() {
        let rotation = random_rotation(rng);
        let primary = NebulaRing {
            inner_radius: inner,
            outer_radius: outer,
            base_opacity: opacity,
            rotation_speed: speed * RING_PRIMARY_SPIN,
            pulsation_phase: index as f32 * PI / 2.0,
            rotation,
            scale: 1.0,
            opacity,
        };

        let secondary_opacity = opacity * RING_SECONDARY_OPACITY;
        let secondary = NebulaRing {
            base_opacity: secondary_opacity,
            rotation_speed: speed * RING_SECONDARY_SPIN,
            pulsation_phase: (index + 2) as f32 * PI / 3.0,
            rotation: rotation + Vec3::from_array(RING_SECONDARY_TILT),
            opacity: secondary_opacity,
            ..primary
        };

        rings.push(primary);
        rings.push(secondary);
    }

    rings
}

pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random::<f32>() * PI,
        rng.random::<f32>() * PI,
        rng.random::<f32>() * PI,
    )
}

/// Rotation for XYZ-ordered Euler angles
pub fn euler_xyz(angles: Vec3) -> Quat {
    Quat::from_rotation_x(angles.x) * Quat::from_rotation_y(angles.y) * Quat::from_rotation_z(angles.z)
}

/// Expanding disc that fades out shortly after the collapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockWave {
    pub scale: f32,
    pub opacity: f32,
}

impl Default for ShockWave {
    fn default() -> Self {
        Self {
            scale: 1.0,
            opacity: SHOCK_WAVE_BASE_OPACITY,
        }
    }
}

impl ShockWave {
    pub fn animate(&mut self, time: f32) {
        self.scale = 1.0 + time * SHOCK_WAVE_GROWTH;
        self.opacity = (SHOCK_WAVE_BASE_OPACITY - time * SHOCK_WAVE_FADE).max(0.0);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_core_pulsation() {
        let mut core = CoreState::new(2.0);
        assert_eq!(core.scale, 2.0);
        assert_eq!(core.glow_scale, 3.0);

        // sin(3t) peaks at t = pi / 6
        core.animate(PI / 6.0, 2.0);
        assert!((core.scale - 2.2).abs() < 1e-5);
        assert!((core.glow_scale - 3.3).abs() < 1e-5);
        assert!((core.glow_radius() - 4.95).abs() < 1e-4);

        core.animate(PI / 4.0, 1.0);
        assert!((core.glow_opacity - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_ring_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let rings = ring_layout(&mut rng);
        assert_eq!(rings.len(), 8);

        for pair in rings.chunks(2) {
            let (primary, secondary) = (pair[0], pair[1]);
            assert_eq!(primary.inner_radius, secondary.inner_radius);
            assert!((secondary.base_opacity - primary.base_opacity * 0.7).abs() < 1e-6);
            assert!(primary.rotation_speed > 0.0 && secondary.rotation_speed < 0.0);

            let tilt = secondary.rotation - primary.rotation;
            assert!((tilt - Vec3::new(PI / 3.0, PI / 4.0, 0.0)).length() < 1e-5);
        }

        assert_eq!(rings[0].inner_radius, 3.0);
        assert_eq!(rings[6].outer_radius, 18.0);
        assert!((rings[2].pulsation_phase - PI / 2.0).abs() < 1e-6);
        assert!((rings[3].pulsation_phase - PI).abs() < 1e-6);
    }

    #[test]
    fn test_ring_animation() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut ring = ring_layout(&mut rng)[0];
        let start = ring.rotation;

        ring.animate(PI / 4.0, 2.0);
        assert!((ring.rotation.z - start.z - 0.01).abs() < 1e-6);
        assert!((ring.rotation.x - start.x - 0.005).abs() < 1e-6);
        // phase 0 at t = pi/4 gives sin(pi/2) = 1
        assert!((ring.opacity - 0.4 * 2.0).abs() < 1e-5);
        assert!((ring.scale - 1.05).abs() < 1e-5);
    }

    #[test]
    fn test_shock_wave_fades_out() {
        let mut wave = ShockWave::default();
        wave.animate(1.0);
        assert_eq!(wave.scale, 3.0);
        assert!((wave.opacity - 0.4).abs() < 1e-6);

        wave.animate(10.0);
        assert_eq!(wave.opacity, 0.0);
        assert!(!wave.is_visible());

        wave.reset();
        assert_eq!(wave, ShockWave::default());
    }

    #[test]
    fn test_euler_matches_axis_order() {
        let q = euler_xyz(Vec3::new(0.0, 0.0, PI / 2.0));
        assert!((q * Vec3::X - Vec3::Y).length() < 1e-5);

        let q = euler_xyz(Vec3::new(PI / 2.0, PI / 2.0, 0.0));
        // Y is applied first (Z -> X), then X leaves X alone
        assert!((q * Vec3::Z - Vec3::X).length() < 1e-5);
    }
}
