//! Game settings and preferences
//!
//! Loaded from an optional JSON file next to the binary; any missing field
//! takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::sanitize_volume;
use crate::consts::{DEFAULT_EFFECTS_VOLUME, DEFAULT_MUSIC_VOLUME};
use crate::sim::Field;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub effects_volume: f32,

    // === Simulation ===
    /// RNG seed for the session
    pub seed: u64,

    // === Display ===
    /// Host viewport the field is fitted into
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: DEFAULT_MUSIC_VOLUME,
            effects_volume: DEFAULT_EFFECTS_VOLUME,
            seed: 12345,
            window_width: 1375.0,
            window_height: 875.0,
        }
    }
}

impl Settings {
    /// Copy with volumes clamped to 0..=1 (non-finite ones reset) and a usable viewport
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let dimension = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        Self {
            music_volume: sanitize_volume(self.music_volume, defaults.music_volume),
            effects_volume: sanitize_volume(self.effects_volume, defaults.effects_volume),
            seed: self.seed,
            window_width: dimension(self.window_width, defaults.window_width),
            window_height: dimension(self.window_height, defaults.window_height),
        }
    }

    /// Play field fitted to the configured viewport
    pub fn field(&self) -> Field {
        Field::fit(self.window_width, self.window_height)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(|s| s.sanitized())
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("Using default settings");
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
