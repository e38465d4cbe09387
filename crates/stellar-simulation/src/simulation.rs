//! Frame driver for the dying-star scene
//!
//! Owns every animated element and advances them together. The GPU never
//! sees this state directly: [`StellarSimulation::write_scene`] flattens it
//! into instance arrays once per frame.

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stellar_physics::*;

use crate::effects::{random_rotation, ring_layout, CoreState, NebulaRing, ShockWave};
use crate::params::StellarConfig;

/// Running counters for the diagnostics panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Animated (unpaused) frames since start or last reset
    pub frames: u64,
    pub respawned_last_frame: usize,
    pub respawned_total: u64,
}

pub struct StellarSimulation {
    config: StellarConfig,
    field: NebulaField,
    stars: StarField,
    rings: Vec<NebulaRing>,
    core: CoreState,
    shock_wave: ShockWave,
    /// Seconds-like clock; f64 so per-frame increments stay exact on long runs
    time: f64,
    paused: bool,
    stats: FrameStats,
    rng: StdRng,
}

impl StellarSimulation {
    pub fn new(config: StellarConfig) -> Self {
        Self::from_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic simulation, for tests and reproducible captures
    pub fn with_seed(config: StellarConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: StellarConfig, mut rng: StdRng) -> Self {
        log::info!("Initializing StellarSimulation...");

        let field = NebulaField::new(
            config.particle_count,
            config.core_color,
            config.nebula_color,
            &mut rng,
        );
        let stars = StarField::new(StarFieldOptions::backdrop(), &mut rng);
        let rings = ring_layout(&mut rng);

        log::info!(
            "✓ {} nebula particles, {} stars, {} rings",
            field.len(),
            stars.len(),
            rings.len()
        );

        Self {
            core: CoreState::new(config.core_size),
            config,
            field,
            stars,
            rings,
            shock_wave: ShockWave::default(),
            time: 0.0,
            paused: false,
            stats: FrameStats::default(),
            rng,
        }
    }

    /// Advance one frame (no-op while paused)
    pub fn step(&mut self) {
        if self.paused {
            return;
        }

        self.time += TIME_STEP * f64::from(self.config.animation_speed);
        let time = self.time as f32;

        let params = FieldStep {
            animation_speed: self.config.animation_speed,
            turbulence: self.config.turbulence,
            expansion_radius: self.config.expansion_radius as f32,
        };
        let respawned = self.field.step(time, &params, &mut self.rng);

        self.core.animate(time, self.config.core_size);
        for ring in &mut self.rings {
            ring.animate(time, self.config.brightness);
        }
        self.shock_wave.animate(time);
        self.stars.twinkle(time);

        self.stats.frames += 1;
        self.stats.respawned_last_frame = respawned;
        self.stats.respawned_total += respawned as u64;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Restart the explosion: fresh nebula, shock wave and ring tilts
    pub fn reset(&mut self) {
        log::info!("Resetting simulation");
        self.time = 0.0;
        self.rebuild_field();

        self.shock_wave.reset();
        for ring in &mut self.rings {
            ring.rotation = random_rotation(&mut self.rng);
            ring.scale = 1.0;
        }
        self.stats = FrameStats::default();
    }

    fn rebuild_field(&mut self) {
        self.field = NebulaField::new(
            self.config.particle_count,
            self.config.core_color,
            self.config.nebula_color,
            &mut self.rng,
        );
    }

    pub fn set_core_color(&mut self, color: Rgb) {
        self.config.core_color = color;
        self.field
            .recolor(self.config.core_color, self.config.nebula_color, &mut self.rng);
    }

    pub fn set_nebula_color(&mut self, color: Rgb) {
        self.config.nebula_color = color;
        self.field
            .recolor(self.config.core_color, self.config.nebula_color, &mut self.rng);
    }

    pub fn set_core_size(&mut self, size: f32) {
        self.config.core_size = size;
        self.core.resize(size);
    }

    pub fn set_expansion_radius(&mut self, radius: u32) {
        self.config.expansion_radius = radius;
    }

    pub fn set_particle_count(&mut self, count: usize) {
        self.config.particle_count = count;
        self.rebuild_field();
        log::debug!("Nebula rebuilt with {count} particles");
    }

    pub fn set_animation_speed(&mut self, speed: f32) {
        self.config.animation_speed = speed;
    }

    pub fn set_turbulence(&mut self, turbulence: f32) {
        self.config.turbulence = turbulence;
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.config.brightness = brightness;
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.config.auto_rotate = enabled;
    }

    /// Apply every field of `config` that differs from the current one
    pub fn apply_config(&mut self, config: &StellarConfig) {
        if config.core_color != self.config.core_color {
            self.set_core_color(config.core_color);
        }
        if config.nebula_color != self.config.nebula_color {
            self.set_nebula_color(config.nebula_color);
        }
        if config.core_size != self.config.core_size {
            self.set_core_size(config.core_size);
        }
        if config.expansion_radius != self.config.expansion_radius {
            self.set_expansion_radius(config.expansion_radius);
        }
        if config.particle_count != self.config.particle_count {
            self.set_particle_count(config.particle_count);
        }
        if config.animation_speed != self.config.animation_speed {
            self.set_animation_speed(config.animation_speed);
        }
        if config.turbulence != self.config.turbulence {
            self.set_turbulence(config.turbulence);
        }
        if config.brightness != self.config.brightness {
            self.set_brightness(config.brightness);
        }
        if config.auto_rotate != self.config.auto_rotate {
            self.set_auto_rotate(config.auto_rotate);
        }
    }

    /// Opacity of nebula particles at the current brightness
    pub fn nebula_opacity(&self) -> f32 {
        NEBULA_BASE_OPACITY * self.config.brightness
    }

    /// Flatten the scene into `frame`, replacing its previous contents
    pub fn write_scene(&self, frame: &mut SceneFrame) {
        frame.clear();

        self.stars.write_sprites(STAR_OPACITY, &mut frame.stars);
        self.field
            .write_sprites(self.nebula_opacity(), &mut frame.nebula);

        frame.rings.extend(self.rings.iter().map(|ring| {
            RingInstance::new(
                ring.model_matrix(),
                ring.inner_radius,
                ring.outer_radius,
                self.config.nebula_color,
                ring.opacity,
            )
        }));

        if self.shock_wave.is_visible() {
            frame.rings.push(RingInstance::new(
                Mat4::from_scale(Vec3::splat(self.shock_wave.scale)),
                0.0,
                1.0,
                self.config.core_color,
                self.shock_wave.opacity,
            ));
        }

        frame.glow = SphereImpostor::new(
            Vec3::ZERO,
            self.core.glow_radius(),
            self.config.core_color,
            self.core.glow_opacity,
        );
        frame.core = SphereImpostor::new(
            Vec3::ZERO,
            self.core.radius(),
            self.config.core_color,
            CORE_OPACITY,
        );
    }

    pub fn config(&self) -> &StellarConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn field(&self) -> &NebulaField {
        &self.field
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn rings(&self) -> &[NebulaRing] {
        &self.rings
    }

    pub fn core(&self) -> &CoreState {
        &self.core
    }

    pub fn shock_wave(&self) -> &ShockWave {
        &self.shock_wave
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn particle_count(&self) -> usize {
        self.field.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> StellarSimulation {
        StellarSimulation::with_seed(StellarConfig::default(), 42)
    }

    #[test]
    fn test_initial_state() {
        let sim = sim();
        assert_eq!(sim.particle_count(), 2000);
        assert_eq!(sim.stars().len(), STAR_COUNT);
        assert_eq!(sim.rings().len(), 8);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(*sim.shock_wave(), ShockWave::default());
        assert!(!sim.is_paused());
    }

    #[test]
    fn test_clock_keeps_full_step_on_long_runs() {
        let config = StellarConfig {
            particle_count: 0,
            ..StellarConfig::default()
        };
        let mut sim = StellarSimulation::with_seed(config, 7);
        // Roughly 14 hours of frames at 60 fps
        sim.time = 30_000.0;
        for _ in 0..100 {
            sim.step();
        }
        assert!((sim.time() - 30_001.0).abs() < 1e-9, "time: {}", sim.time());
    }

    #[test]
    fn test_step_twinkles_stars() {
        let mut sim = sim();
        let before = sim.stars().colors().to_vec();
        sim.step();
        let after = sim.stars().colors().to_vec();
        assert_ne!(before, after);

        sim.set_paused(true);
        sim.step();
        assert_eq!(sim.stars().colors(), after.as_slice());
    }

    #[test]
    fn test_step_advances_time_by_speed() {
        let mut sim = sim();
        sim.set_animation_speed(2.0);
        sim.step();
        sim.step();
        assert!((sim.time() - 0.04).abs() < 1e-6);
        assert_eq!(sim.stats().frames, 2);
        assert!((sim.shock_wave().scale - 1.08).abs() < 1e-5);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut sim = sim();
        sim.step();
        let positions = sim.field().positions().to_vec();
        let time = sim.time();

        assert!(sim.toggle_pause());
        for _ in 0..10 {
            sim.step();
        }
        assert_eq!(sim.time(), time);
        assert_eq!(sim.field().positions(), positions.as_slice());

        assert!(!sim.toggle_pause());
        sim.step();
        assert!(sim.time() > time);
    }

    #[test]
    fn test_particles_stay_inside_radius() {
        let mut sim = sim();
        sim.set_expansion_radius(5);
        for _ in 0..300 {
            sim.step();
        }
        assert!(sim.stats().respawned_total > 0);
        for p in sim.field().positions() {
            assert!(p.length() <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_reset() {
        let mut sim = sim();
        for _ in 0..100 {
            sim.step();
        }
        assert!(sim.shock_wave().scale > 1.0);

        sim.reset();
        assert_eq!(sim.time(), 0.0);
        assert_eq!(*sim.shock_wave(), ShockWave::default());
        assert!(sim.rings().iter().all(|r| r.scale == 1.0));
        assert_eq!(sim.stats().frames, 0);
        for p in sim.field().positions() {
            assert!(p.length() < 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_particle_count_rebuilds_field() {
        let mut sim = sim();
        sim.set_particle_count(123);
        assert_eq!(sim.particle_count(), 123);

        sim.set_particle_count(0);
        sim.step();
        assert_eq!(sim.stats().respawned_last_frame, 0);
    }

    #[test]
    fn test_core_size_applies_immediately() {
        let mut sim = sim();
        sim.set_paused(true);
        sim.set_core_size(2.5);
        assert_eq!(sim.core().scale, 2.5);
        assert_eq!(sim.core().glow_scale, 3.75);
    }

    #[test]
    fn test_color_change_recolors_nebula() {
        let mut sim = sim();
        let black = Rgb::BLACK;
        sim.set_core_color(black);
        sim.set_nebula_color(black);
        assert!(sim.field().colors().iter().all(|c| *c == black));
    }

    #[test]
    fn test_apply_config_only_touches_changes() {
        let mut sim = sim();
        let positions = sim.field().positions().to_vec();

        let mut config = sim.config().clone();
        config.turbulence = 1.5;
        config.brightness = 0.5;
        sim.apply_config(&config);

        // Unchanged particle count must not rebuild the field
        assert_eq!(sim.field().positions(), positions.as_slice());
        assert_eq!(sim.config(), &config);
        assert!((sim.nebula_opacity() - 0.3).abs() < 1e-6);

        config.particle_count = 10;
        sim.apply_config(&config);
        assert_eq!(sim.particle_count(), 10);
    }

    #[test]
    fn test_write_scene() {
        let mut sim = sim();
        sim.step();

        let mut frame = SceneFrame::default();
        sim.write_scene(&mut frame);

        assert_eq!(frame.nebula.len(), 2000);
        assert_eq!(frame.stars.len(), STAR_COUNT);
        // Eight rings plus the shock wave
        assert_eq!(frame.rings.len(), 9);
        assert_eq!(frame.rings[8].radii[0], 0.0);
        assert!((frame.core.radius - sim.core().scale).abs() < 1e-6);
        assert_eq!(frame.core.color[3], CORE_OPACITY);

        // Rewriting replaces rather than appends
        sim.write_scene(&mut frame);
        assert_eq!(frame.nebula.len(), 2000);
    }

    #[test]
    fn test_shock_wave_drops_out_once_faded() {
        let mut sim = sim();
        sim.set_animation_speed(3.0);
        // 0.5 / 0.1 = 5 time units, 0.03 per frame
        for _ in 0..200 {
            sim.step();
        }
        assert!(!sim.shock_wave().is_visible());

        let mut frame = SceneFrame::default();
        sim.write_scene(&mut frame);
        assert_eq!(frame.rings.len(), 8);
    }
}
