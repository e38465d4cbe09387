//! User-tunable parameters for runtime tweaking
//!
//! Everything the control panel exposes lives in [`StellarConfig`]. It can be
//! loaded from and saved to JSON, and individual fields can be overridden from
//! the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use stellar_physics::Rgb;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// Slider ranges
pub const CORE_SIZE_RANGE: RangeInclusive<f32> = 0.1..=3.0;
pub const EXPANSION_RADIUS_RANGE: RangeInclusive<u32> = 5..=30;
pub const PARTICLE_COUNT_RANGE: RangeInclusive<usize> = 0..=10_000;
pub const ANIMATION_SPEED_RANGE: RangeInclusive<f32> = 0.0..=3.0;
pub const TURBULENCE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = 0.0..=2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StellarConfig {
    pub core_color: Rgb,
    pub nebula_color: Rgb,
    pub core_size: f32,
    pub expansion_radius: u32,
    pub particle_count: usize,
    pub animation_speed: f32,
    pub turbulence: f32,
    pub brightness: f32,
    pub auto_rotate: bool,
}

impl Default for StellarConfig {
    fn default() -> Self {
        Self {
            core_color: Rgb::from_u32(0xff4444),
            nebula_color: Rgb::from_u32(0x4444ff),
            core_size: 1.0,
            expansion_radius: 10,
            particle_count: 2000,
            animation_speed: 1.0,
            turbulence: 0.5,
            brightness: 1.0,
            auto_rotate: true,
        }
    }
}

impl StellarConfig {
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Check every numeric field against its slider range
    pub fn validate(&self) -> ConfigResult<()> {
        check_f32("core_size", self.core_size, &CORE_SIZE_RANGE)?;
        check_f32("animation_speed", self.animation_speed, &ANIMATION_SPEED_RANGE)?;
        check_f32("turbulence", self.turbulence, &TURBULENCE_RANGE)?;
        check_f32("brightness", self.brightness, &BRIGHTNESS_RANGE)?;

        if !EXPANSION_RADIUS_RANGE.contains(&self.expansion_radius) {
            return Err(ConfigError::Validation(format!(
                "expansion_radius {} outside {:?}",
                self.expansion_radius, EXPANSION_RADIUS_RANGE
            )));
        }
        if !PARTICLE_COUNT_RANGE.contains(&self.particle_count) {
            return Err(ConfigError::Validation(format!(
                "particle_count {} outside {:?}",
                self.particle_count, PARTICLE_COUNT_RANGE
            )));
        }

        Ok(())
    }

    /// Override fields from `STELLAR_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, "STELLAR_PARTICLE_COUNT", &mut self.particle_count);
        override_parsed(&lookup, "STELLAR_EXPANSION_RADIUS", &mut self.expansion_radius);
        override_parsed(&lookup, "STELLAR_CORE_SIZE", &mut self.core_size);
        override_parsed(&lookup, "STELLAR_ANIMATION_SPEED", &mut self.animation_speed);
        override_parsed(&lookup, "STELLAR_TURBULENCE", &mut self.turbulence);
        override_parsed(&lookup, "STELLAR_BRIGHTNESS", &mut self.brightness);
        override_parsed(&lookup, "STELLAR_AUTO_ROTATE", &mut self.auto_rotate);
        override_color(&lookup, "STELLAR_CORE_COLOR", &mut self.core_color);
        override_color(&lookup, "STELLAR_NEBULA_COLOR", &mut self.nebula_color);
    }
}

fn check_f32(name: &str, value: f32, range: &RangeInclusive<f32>) -> ConfigResult<()> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{name} {value} outside {range:?}"
        )))
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => {
            log::info!("{key} override: {raw}");
            *target = value;
        }
        Err(_) => log::warn!("Ignoring unparseable {key}={raw:?}"),
    }
}

fn override_color<F>(lookup: &F, key: &str, target: &mut Rgb)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match Rgb::from_hex(&raw) {
        Ok(color) => {
            log::info!("{key} override: {color}");
            *target = color;
        }
        Err(e) => log::warn!("Ignoring {key}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = StellarConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.core_color.to_hex(), "#ff4444");
        assert_eq!(config.nebula_color.to_hex(), "#4444ff");
        assert_eq!(config.particle_count, 2000);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config =
            StellarConfig::from_json_str(r##"{ "core_color": "#00ff00", "turbulence": 1.5 }"##)
                .unwrap();
        assert_eq!(config.core_color.to_hex(), "#00ff00");
        assert_eq!(config.turbulence, 1.5);
        assert_eq!(config.expansion_radius, 10);
        assert!(config.auto_rotate);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = StellarConfig::from_json_str(r#"{ "brightness": 7.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = StellarConfig::from_json_str(r#"{ "expansion_radius": 2 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = StellarConfig::from_json_str(r#"{ "core_color": "blue" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let config = StellarConfig {
            core_size: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.json");

        let config = StellarConfig {
            particle_count: 4321,
            nebula_color: Rgb::from_u32(0x12ab34),
            auto_rotate: false,
            ..Default::default()
        };
        config.save_json(&path).unwrap();

        let loaded = StellarConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded.particle_count, 4321);
        assert_eq!(loaded.nebula_color.to_hex(), "#12ab34");
        assert!(!loaded.auto_rotate);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StellarConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STELLAR_PARTICLE_COUNT", "500"),
            ("STELLAR_TURBULENCE", "not-a-number"),
            ("STELLAR_NEBULA_COLOR", "#00ffff"),
            ("STELLAR_CORE_COLOR", "oops"),
            ("STELLAR_AUTO_ROTATE", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = StellarConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.particle_count, 500);
        assert_eq!(config.turbulence, 0.5);
        assert_eq!(config.nebula_color.to_hex(), "#00ffff");
        assert_eq!(config.core_color.to_hex(), "#ff4444");
        assert!(!config.auto_rotate);
    }
}
