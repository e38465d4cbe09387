//! Tuning constants for the dying-star animation
//!
//! None of these are physical quantities. They are the hand-picked values
//! that give the nebula, rings and shock wave their look.

use std::f32::consts::PI;

/// Inner radius of the shell particles are (re)spawned in
pub const SPAWN_RADIUS_MIN: f32 = 1.0;

/// Width of the spawn shell (radius is `MIN + U * SPREAD`)
pub const SPAWN_RADIUS_SPREAD: f32 = 2.0;

/// Slowest outward speed of a fresh particle, in units per frame
pub const SPAWN_SPEED_MIN: f32 = 0.02;

/// Speed spread of a fresh particle
pub const SPAWN_SPEED_SPREAD: f32 = 0.05;

/// Scale applied to the turbulence noise before it is added to a position
pub const TURBULENCE_SCALE: f32 = 0.01;

/// Temporal frequency of the turbulence noise
pub const TURBULENCE_FREQUENCY: f32 = 2.0;

/// Per-index phase offset of the turbulence noise
pub const TURBULENCE_INDEX_PHASE: f32 = 0.1;

/// Animation time advanced per frame at `animation_speed == 1`
pub const TIME_STEP: f64 = 0.01;

/// Smallest and largest per-particle size multiplier
pub const PARTICLE_SIZE_MIN: f32 = 0.5;
pub const PARTICLE_SIZE_SPREAD: f32 = 2.0;

/// Nebula particles are drawn at this world size (times their size multiplier
/// relative to the mean)
pub const NEBULA_POINT_SIZE: f32 = 0.3;

/// Nebula opacity at brightness 1
pub const NEBULA_BASE_OPACITY: f32 = 0.6;

// Core pulsation
pub const CORE_PULSE_FREQUENCY: f32 = 3.0;
pub const CORE_PULSE_AMPLITUDE: f32 = 0.1;
pub const CORE_OPACITY: f32 = 0.9;

// Glow halo around the core
/// Glow sphere geometry radius (relative to the unit core sphere)
pub const GLOW_RADIUS: f32 = 1.5;
/// Glow scale relative to the core scale
pub const GLOW_SCALE: f32 = 1.5;
pub const GLOW_BASE_OPACITY: f32 = 0.3;
pub const GLOW_OPACITY_AMPLITUDE: f32 = 0.1;
pub const GLOW_FREQUENCY: f32 = 2.0;

// Nebula rings
pub const RING_PULSE_FREQUENCY: f32 = 2.0;
pub const RING_SCALE_AMPLITUDE: f32 = 0.05;
pub const RING_PRIMARY_SPIN: f32 = 0.01;
pub const RING_SECONDARY_SPIN: f32 = -0.008;
pub const RING_SECONDARY_OPACITY: f32 = 0.7;
/// Extra Euler rotation of the secondary ring of each pair
pub const RING_SECONDARY_TILT: [f32; 3] = [PI / 3.0, PI / 4.0, 0.0];
/// Ring segment count used when building ring geometry
pub const RING_SEGMENTS: u32 = 64;

/// (inner radius, outer radius, opacity, speed) of each ring pair
pub const RING_TABLE: [(f32, f32, f32, f32); 4] = [
    (3.0, 4.0, 0.4, 1.0),
    (6.0, 8.0, 0.3, 0.8),
    (10.0, 13.0, 0.2, 0.6),
    (15.0, 18.0, 0.15, 0.4),
];

// Shock wave
pub const SHOCK_WAVE_GROWTH: f32 = 2.0;
pub const SHOCK_WAVE_FADE: f32 = 0.1;
pub const SHOCK_WAVE_BASE_OPACITY: f32 = 0.5;

// Star field backdrop used by the application
pub const STAR_COUNT: usize = 1500;
pub const STAR_SIZE: f32 = 0.5;
pub const STAR_RADIUS: f32 = 200.0;
pub const STAR_OPACITY: f32 = 0.8;
