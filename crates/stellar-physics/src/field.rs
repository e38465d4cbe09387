//! Expanding nebula: the per-frame particle update
//!
//! Particles live in flat, index-aligned buffers. Each frame every particle
//! drifts along its velocity plus a shared sinusoidal turbulence term, and any
//! particle that escapes the expansion radius is re-seeded near the core.

use glam::Vec3;
use rand::Rng;

use crate::color::Rgb;
use crate::constants::*;
use crate::particle::PointSprite;
use crate::spawn::spawn_shell;

/// Knobs for a single [`NebulaField::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStep {
    /// Multiplier on each particle's velocity
    pub animation_speed: f32,
    /// Amplitude of the sinusoidal drift
    pub turbulence: f32,
    /// Particles further than this from the origin are respawned
    pub expansion_radius: f32,
}

impl Default for FieldStep {
    fn default() -> Self {
        Self {
            animation_speed: 1.0,
            turbulence: 0.5,
            expansion_radius: 10.0,
        }
    }
}

/// Nebula particle buffers
#[derive(Debug, Clone, Default)]
pub struct NebulaField {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    colors: Vec<Rgb>,
    sizes: Vec<f32>,
}

impl NebulaField {
    pub fn new<R: Rng + ?Sized>(count: usize, core: Rgb, nebula: Rgb, rng: &mut R) -> Self {
        let mut field = Self {
            positions: Vec::with_capacity(count),
            velocities: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            sizes: Vec::with_capacity(count),
        };

        for _ in 0..count {
            let (position, velocity) = spawn_shell(rng);
            field.positions.push(position);
            field.velocities.push(velocity);
            field.colors.push(core.lerp(nebula, rng.random::<f32>()));
            field
                .sizes
                .push(rng.random::<f32>() * PARTICLE_SIZE_SPREAD + PARTICLE_SIZE_MIN);
        }

        field
    }

    /// Advance every particle by one frame, returning how many were respawned
    pub fn step<R: Rng + ?Sized>(&mut self, time: f32, params: &FieldStep, rng: &mut R) -> usize {
        let mut respawned = 0;
        let radius_sq = params.expansion_radius * params.expansion_radius;

        for (i, (position, velocity)) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .enumerate()
        {
            let noise = turbulence_noise(time, i, params.turbulence);
            *position += *velocity * params.animation_speed + Vec3::splat(noise * TURBULENCE_SCALE);

            if position.length_squared() > radius_sq {
                let (fresh_position, fresh_velocity) = spawn_shell(rng);
                *position = fresh_position;
                *velocity = fresh_velocity;
                respawned += 1;
            }
        }

        respawned
    }

    /// Pick a new random core/nebula mix for every particle
    pub fn recolor<R: Rng + ?Sized>(&mut self, core: Rgb, nebula: Rgb, rng: &mut R) {
        for color in &mut self.colors {
            *color = core.lerp(nebula, rng.random::<f32>());
        }
    }

    /// Append one sprite per particle to `out`
    pub fn write_sprites(&self, opacity: f32, out: &mut Vec<PointSprite>) {
        let mean_size = PARTICLE_SIZE_MIN + PARTICLE_SIZE_SPREAD * 0.5;
        out.extend(
            self.positions
                .iter()
                .zip(&self.colors)
                .zip(&self.sizes)
                .map(|((position, color), size)| {
                    PointSprite::new(
                        *position,
                        NEBULA_POINT_SIZE * size / mean_size,
                        *color,
                        opacity,
                    )
                }),
        );
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
}

/// Turbulence drift for particle `index` at `time`, in `[0, turbulence]`
pub fn turbulence_noise(time: f32, index: usize, turbulence: f32) -> f32 {
    let phase = time * TURBULENCE_FREQUENCY + index as f32 * TURBULENCE_INDEX_PHASE;
    (phase.sin() * 0.5 + 0.5) * turbulence
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn colors() -> (Rgb, Rgb) {
        (Rgb::from_u32(0xff4444), Rgb::from_u32(0x4444ff))
    }

    fn field(count: usize, seed: u64) -> (NebulaField, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (core, nebula) = colors();
        let field = NebulaField::new(count, core, nebula, &mut rng);
        (field, rng)
    }

    #[test]
    fn test_new_field_buffers_aligned() {
        let (field, _) = field(500, 1);
        assert_eq!(field.len(), 500);
        assert_eq!(field.velocities().len(), 500);
        assert_eq!(field.colors().len(), 500);
        assert_eq!(field.sizes().len(), 500);

        for size in field.sizes() {
            assert!((0.5..2.5).contains(size));
        }
        for p in field.positions() {
            assert!(p.length() < 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_colors_between_core_and_nebula() {
        let (field, _) = field(200, 2);
        for c in field.colors() {
            // Red falls and blue rises in lockstep along the mix
            assert!((c.r + c.b - (1.0 + 68.0 / 255.0)).abs() < 1e-4);
            assert!((c.g - 68.0 / 255.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_step_moves_along_velocity_plus_noise() {
        let (mut field, mut rng) = field(10, 3);
        let before = field.positions().to_vec();
        let velocities = field.velocities().to_vec();
        let params = FieldStep {
            animation_speed: 2.0,
            turbulence: 0.5,
            expansion_radius: 100.0,
        };

        let respawned = field.step(0.25, &params, &mut rng);
        assert_eq!(respawned, 0);

        for i in 0..10 {
            let noise = turbulence_noise(0.25, i, 0.5) * TURBULENCE_SCALE;
            let expected = before[i] + velocities[i] * 2.0 + Vec3::splat(noise);
            assert!((field.positions()[i] - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_escaped_particles_respawn_in_shell() {
        let (mut field, mut rng) = field(300, 4);
        let params = FieldStep {
            animation_speed: 1.0,
            turbulence: 0.5,
            expansion_radius: 4.0,
        };

        let mut total = 0;
        for frame in 0..400 {
            total += field.step(frame as f32 * 0.01, &params, &mut rng);
            for p in field.positions() {
                assert!(p.length() <= 4.0 + 1e-4);
            }
        }
        assert!(total > 0, "expected particles to cross the radius");
        assert_eq!(field.len(), 300);
    }

    #[test]
    fn test_tiny_radius_respawns_everything() {
        let (mut field, mut rng) = field(50, 5);
        let params = FieldStep {
            animation_speed: 1.0,
            turbulence: 0.0,
            expansion_radius: 0.5,
        };
        assert_eq!(field.step(0.0, &params, &mut rng), 50);
    }

    #[test]
    fn test_zero_speed_still_drifts_with_turbulence() {
        let (mut field, mut rng) = field(1, 6);
        let start = field.positions()[0];
        let params = FieldStep {
            animation_speed: 0.0,
            turbulence: 1.0,
            expansion_radius: 100.0,
        };
        field.step(0.0, &params, &mut rng);

        let delta = field.positions()[0] - start;
        let expected = turbulence_noise(0.0, 0, 1.0) * TURBULENCE_SCALE;
        assert!((delta - Vec3::splat(expected)).length() < 1e-6);
    }

    #[test]
    fn test_empty_field_is_noop() {
        let (mut field, mut rng) = field(0, 7);
        assert!(field.is_empty());
        assert_eq!(field.step(1.0, &FieldStep::default(), &mut rng), 0);
    }

    #[test]
    fn test_recolor_keeps_positions() {
        let (mut field, mut rng) = field(100, 8);
        let positions = field.positions().to_vec();
        field.recolor(Rgb::BLACK, Rgb::BLACK, &mut rng);

        assert_eq!(field.positions(), positions.as_slice());
        assert!(field.colors().iter().all(|c| *c == Rgb::BLACK));
    }

    #[test]
    fn test_write_sprites() {
        let (field, _) = field(20, 9);
        let mut sprites = Vec::new();
        field.write_sprites(0.6, &mut sprites);

        assert_eq!(sprites.len(), 20);
        assert!(sprites.iter().all(|s| s.color[3] == 0.6));
        assert_eq!(sprites[3].position, field.positions()[3].to_array());
    }

    #[test]
    fn test_turbulence_noise_range() {
        for i in 0..100 {
            let n = turbulence_noise(i as f32 * 0.37, i, 2.0);
            assert!((0.0..=2.0).contains(&n));
        }
        assert_eq!(turbulence_noise(5.0, 3, 0.0), 0.0);
    }
}
