//! Static background star field

use glam::Vec3;
use rand::Rng;

use crate::color::Rgb;
use crate::constants::*;
use crate::particle::PointSprite;
use crate::spawn::sample_star_position;

/// Star field generation options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarFieldOptions {
    pub count: usize,
    /// Base billboard size; each star gets `size * [0.5, 2.0)`
    pub size: f32,
    /// Base color before the per-star HSL jitter
    pub color: Rgb,
    /// Outer radius; stars sit between `radius / 2` and `radius`
    pub radius: f32,
}

impl Default for StarFieldOptions {
    fn default() -> Self {
        Self {
            count: 1000,
            size: 0.1,
            color: Rgb::WHITE,
            radius: 100.0,
        }
    }
}

impl StarFieldOptions {
    /// Backdrop used behind the dying star
    pub fn backdrop() -> Self {
        Self {
            count: STAR_COUNT,
            size: STAR_SIZE,
            radius: STAR_RADIUS,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct StarField {
    options: StarFieldOptions,
    positions: Vec<Vec3>,
    base_colors: Vec<Rgb>,
    colors: Vec<Rgb>,
    sizes: Vec<f32>,
}

impl StarField {
    pub fn new<R: Rng + ?Sized>(options: StarFieldOptions, rng: &mut R) -> Self {
        let mut field = Self {
            options,
            positions: Vec::new(),
            base_colors: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
        };
        field.regenerate(rng);
        field
    }

    fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.options.count;
        self.positions.clear();
        self.sizes.clear();
        self.positions.reserve(count);
        self.sizes.reserve(count);

        for _ in 0..count {
            self.positions
                .push(sample_star_position(rng, self.options.radius));
            self.sizes
                .push(self.options.size * (0.5 + rng.random::<f32>() * 1.5));
        }

        self.regenerate_colors(rng);
    }

    fn regenerate_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let base = self.options.color;
        self.base_colors.clear();
        self.base_colors.extend((0..self.options.count).map(|_| {
            let hue = rng.random::<f32>() * 0.1 - 0.05;
            let saturation = 0.3 + rng.random::<f32>() * 0.4;
            let lightness = 0.6 + rng.random::<f32>() * 0.4;
            base.offset_hsl(hue, saturation, lightness)
        }));
        self.colors.clone_from(&self.base_colors);
    }

    /// Apply new options, rebuilding only what they affect
    pub fn update<R: Rng + ?Sized>(&mut self, options: StarFieldOptions, rng: &mut R) {
        let previous = std::mem::replace(&mut self.options, options);

        if previous.count != options.count || previous.radius != options.radius {
            self.regenerate(rng);
            return;
        }

        if previous.color != options.color {
            self.regenerate_colors(rng);
        }

        if previous.size != options.size && previous.size > 0.0 {
            let ratio = options.size / previous.size;
            for size in &mut self.sizes {
                *size *= ratio;
            }
        }
    }

    /// Modulate brightness with a slow per-star shimmer
    ///
    /// Always derived from the generated colors, so repeated calls never
    /// accumulate.
    pub fn twinkle(&mut self, time: f32) {
        for (i, (color, base)) in self.colors.iter_mut().zip(&self.base_colors).enumerate() {
            let factor = 0.8 + (time * 2.0 + i as f32 * 0.1).sin() * 0.2;
            *color = base.scale(factor);
        }
    }

    pub fn write_sprites(&self, opacity: f32, out: &mut Vec<PointSprite>) {
        out.extend(
            self.positions
                .iter()
                .zip(&self.colors)
                .zip(&self.sizes)
                .map(|((position, color), size)| PointSprite::new(*position, *size, *color, opacity)),
        );
    }

    pub fn options(&self) -> &StarFieldOptions {
        &self.options
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

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_backdrop_generation() {
        let mut rng = StdRng::seed_from_u64(1);
        let stars = StarField::new(StarFieldOptions::backdrop(), &mut rng);

        assert_eq!(stars.len(), 1500);
        for (p, size) in stars.positions().iter().zip(stars.sizes()) {
            assert!(p.length() >= 100.0 - 1e-2 && p.length() <= 200.0 + 1e-2);
            assert!((0.25..1.0).contains(size));
        }
    }

    #[test]
    fn test_white_base_stays_white() {
        // Lightness offsets of at least 0.6 push a white base past full brightness
        let mut rng = StdRng::seed_from_u64(2);
        let stars = StarField::new(StarFieldOptions::default(), &mut rng);
        assert!(stars.colors().iter().all(|c| c.to_hex() == "#ffffff"));
    }

    #[test]
    fn test_dark_base_gets_tinted() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = StarFieldOptions {
            count: 50,
            color: Rgb::new(0.1, 0.0, 0.0),
            ..Default::default()
        };
        let stars = StarField::new(options, &mut rng);
        let mut saturated = 0;
        for c in stars.colors() {
            let (_, s, l) = c.to_hsl();
            assert!(l > 0.6);
            if s > 0.5 {
                saturated += 1;
            }
        }
        // Only the brightest draws clamp all the way to white
        assert!(saturated > 25, "saturated stars: {saturated}");
    }

    #[test]
    fn test_update_regenerates_on_count_change() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut stars = StarField::new(StarFieldOptions::default(), &mut rng);
        let options = StarFieldOptions {
            count: 10,
            ..*stars.options()
        };
        stars.update(options, &mut rng);
        assert_eq!(stars.len(), 10);
        assert_eq!(stars.colors().len(), 10);
    }

    #[test]
    fn test_update_size_rescales_in_place() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut stars = StarField::new(StarFieldOptions::default(), &mut rng);
        let positions = stars.positions().to_vec();
        let sizes = stars.sizes().to_vec();

        let options = StarFieldOptions {
            size: 0.2,
            ..*stars.options()
        };
        stars.update(options, &mut rng);

        assert_eq!(stars.positions(), positions.as_slice());
        for (new, old) in stars.sizes().iter().zip(&sizes) {
            assert!((new - old * 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_twinkle_does_not_accumulate() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut stars = StarField::new(StarFieldOptions::default(), &mut rng);

        stars.twinkle(1.3);
        let once = stars.colors().to_vec();
        for _ in 0..10 {
            stars.twinkle(1.3);
        }
        assert_eq!(stars.colors(), once.as_slice());

        for c in stars.colors() {
            assert!(c.r >= 0.6 - 1e-5 && c.r <= 1.0 + 1e-5);
        }
    }
}
