//! Random point placement on spherical shells

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::constants::*;

/// Point at `radius` along the direction given by spherical angles
pub fn spherical(radius: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

/// Fresh position and outward velocity for a nebula particle
///
/// Positions land in the `[1, 3)` shell around the core. `phi` is drawn
/// uniformly, which bunches particles towards the poles; that clumping is
/// part of the look.
pub fn spawn_shell<R: Rng + ?Sized>(rng: &mut R) -> (Vec3, Vec3) {
    let radius = SPAWN_RADIUS_MIN + rng.random::<f32>() * SPAWN_RADIUS_SPREAD;
    let theta = rng.random::<f32>() * TAU;
    let phi = rng.random::<f32>() * PI;

    let position = spherical(radius, theta, phi);

    let speed = SPAWN_SPEED_MIN + rng.random::<f32>() * SPAWN_SPEED_SPREAD;
    let velocity = position / radius * speed;

    (position, velocity)
}

/// Area-uniform direction at a distance in `[radius / 2, radius)`
pub fn sample_star_position<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = TAU * rng.random::<f32>();
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
    let distance = radius * (0.5 + rng.random::<f32>() * 0.5);

    spherical(distance, theta, phi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_shell_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let (position, velocity) = spawn_shell(&mut rng);
            let r = position.length();
            assert!((1.0 - 1e-4..3.0 + 1e-4).contains(&r), "radius {r}");

            let speed = velocity.length();
            assert!((0.02 - 1e-5..0.07 + 1e-5).contains(&speed), "speed {speed}");

            // Velocity points straight out from the core
            assert!(position.normalize().dot(velocity.normalize()) > 0.999);
        }
    }

    #[test]
    fn test_star_positions_fill_outer_half() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut upper = 0;
        for _ in 0..2000 {
            let p = sample_star_position(&mut rng, 200.0);
            let r = p.length();
            assert!((100.0 - 1e-2..200.0 + 1e-2).contains(&r));
            if p.z > 0.0 {
                upper += 1;
            }
        }
        // Roughly half of an area-uniform sphere sits above the equator
        assert!((850..1150).contains(&upper), "upper hemisphere count {upper}");
    }

    #[test]
    fn test_spherical_axes() {
        let p = spherical(2.0, 0.0, 0.0);
        assert!((p - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);

        let p = spherical(1.0, 0.0, PI / 2.0);
        assert!((p - Vec3::X).length() < 1e-6);
    }
}
