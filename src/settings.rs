//! Game settings
//!
//! Playfield geometry, message timings and the run seed. Settings can be
//! loaded from JSON; missing fields take their defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::POSITION_COUNT;
use crate::sim::wave::WaveLayout;

/// Problems with a settings document
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scale must be positive, got {0}")]
    NonPositiveScale(f32),
    #[error("row height must be positive, got {0}")]
    NonPositiveRowHeight(f32),
    #[error("horizontal bounds {min}..{max} leave no room for the wave")]
    EmptyLane { min: f32, max: f32 },
    #[error("vertical bounds {min}..{max} are inverted or outside the playfield")]
    InvalidBounds { min: f32, max: f32 },
    #[error("max power must be at least 1")]
    ZeroPower,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Left and right edges the wave moves between
    pub x_bounds: (f32, f32),
    /// Top row of the wave and the floor it must not reach
    pub y_bounds: (f32, f32),
    /// Unscaled row height (also the distance the wave drops per bounce)
    pub row_height: f32,
    /// Sprite scale
    pub scale: f32,

    // === Power ===
    /// Power meter size; the level bonus is power squared
    pub max_power: u8,

    // === Message timings (ms) ===
    pub level_banner_ms: u32,
    pub help_ms: u32,
    pub bonus_ms: u32,
    pub laser_ms: u32,
    /// Full-opacity time after a timed message's delay
    pub fade_delay_ms: u32,
    /// Fade-out duration
    pub fade_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,

            width: 800.0,
            height: 600.0,
            x_bounds: (50.0, 750.0),
            y_bounds: (100.0, 550.0),
            row_height: 20.0,
            scale: 1.7,

            max_power: 9,

            level_banner_ms: 1000,
            help_ms: 5000,
            bonus_ms: 500,
            laser_ms: 100,
            fade_delay_ms: 600,
            fade_ms: 1000,
        }
    }
}

impl Settings {
    /// Default settings with the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the geometry can hold a wave
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.scale > 0.0) {
            return Err(SettingsError::NonPositiveScale(self.scale));
        }
        if !(self.row_height > 0.0) {
            return Err(SettingsError::NonPositiveRowHeight(self.row_height));
        }
        let (x_min, x_max) = self.x_bounds;
        if !(x_max > x_min) {
            return Err(SettingsError::EmptyLane { min: x_min, max: x_max });
        }
        let (y_min, y_max) = self.y_bounds;
        if !(y_max > y_min) || y_max > self.height {
            return Err(SettingsError::InvalidBounds { min: y_min, max: y_max });
        }
        if self.max_power == 0 {
            return Err(SettingsError::ZeroPower);
        }
        Ok(())
    }

    /// Width of a wave row: half the horizontal bounds
    pub fn lane_width(&self) -> f32 {
        (self.x_bounds.1 - self.x_bounds.0) / 2.0
    }

    pub fn wave_layout(&self) -> WaveLayout {
        WaveLayout {
            lane_width: self.lane_width(),
            start: Vec2::new(self.x_bounds.0, self.y_bounds.0),
            row_height: self.row_height,
            scale: self.scale,
        }
    }

    /// Distance the wave drops each time it bounces off a wall
    pub fn descent_step(&self) -> f32 {
        self.row_height * self.scale
    }

    /// Horizontal position of each firing position
    pub fn position_xs(&self) -> [f32; POSITION_COUNT] {
        let sixth = (self.x_bounds.1 - self.x_bounds.0) / 6.0;
        [
            self.x_bounds.0 + sixth,
            self.width / 2.0,
            self.width / 2.0 + 2.0 * sixth,
        ]
    }

    /// Where the ship's gun sits when parked at firing position `index`
    pub fn ship_origin(&self, index: usize) -> Vec2 {
        let x = self.position_xs().get(index).copied().unwrap_or(self.width / 2.0);
        Vec2::new(x, self.y_bounds.1 - 50.0)
    }

    /// Hold time for a timed message shown for `delay_ms`
    pub fn hold_for(&self, delay_ms: u32) -> u32 {
        delay_ms.saturating_add(self.fade_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.lane_width(), 350.0);
        let sixth = 700.0 / 6.0;
        assert_eq!(settings.position_xs(), [50.0 + sixth, 400.0, 400.0 + 2.0 * sixth]);
        assert_eq!(settings.wave_layout().start, Vec2::new(50.0, 100.0));
        assert_eq!(settings.ship_origin(1), Vec2::new(400.0, 500.0));
        assert_eq!(settings.ship_origin(0).x, settings.position_xs()[0]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "scale": 2.0 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.scale, 2.0);
        assert_eq!(settings.max_power, 9);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "scale": 0.0 }"#),
            Err(SettingsError::NonPositiveScale(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "x_bounds": [300.0, 300.0] }"#),
            Err(SettingsError::EmptyLane { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "max_power": 0 }"#),
            Err(SettingsError::ZeroPower)
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::with_seed(7);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
