//! Level definitions
//!
//! An ordered, read-only table of level records loaded once before play.
//! The JSON shape is an array of objects:
//!
//! ```json
//! { "rows": 3, "columns": 10, "paddleWidth": 120, "ballSpeed": 4,
//!   "background": "assets/bg1.png", "brickTypes": { "STRONG": 10, "BONUS": 5 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEVEL;
use crate::error::LevelError;
use crate::sim::BrickKind;

static BUNDLED_LEVELS: &str = include_str!("../assets/levels.json");

/// Percent chance per brick category (missing categories are 0)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct BrickWeights {
    pub normal: f32,
    pub strong: f32,
    pub bonus: f32,
    pub debuff: f32,
    pub dynamite: f32,
    pub metal: f32,
    pub invincible: f32,
    pub sand: f32,
}

impl BrickWeights {
    /// Weights in the fixed sampling order
    pub fn entries(&self) -> [(BrickKind, f32); 8] {
        [
            (BrickKind::Normal, self.normal),
            (BrickKind::Strong, self.strong),
            (BrickKind::Bonus, self.bonus),
            (BrickKind::Debuff, self.debuff),
            (BrickKind::Dynamite, self.dynamite),
            (BrickKind::Metal, self.metal),
            (BrickKind::Invincible, self.invincible),
            (BrickKind::Sand, self.sand),
        ]
    }

    /// Pick a brick kind for a roll in `0..100` by cumulative thresholds.
    /// Rolls past the last threshold fall back to `Normal`.
    pub fn sample(&self, roll: f32) -> BrickKind {
        let mut cumulative = 0.0;
        for (kind, chance) in self.entries() {
            cumulative += chance;
            if roll <= cumulative && chance > 0.0 {
                return kind;
            }
        }
        BrickKind::Normal
    }
}

/// One level record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub rows: usize,
    pub columns: usize,
    /// Paddle width at base resolution
    pub paddle_width: f32,
    /// Launch speed (per tick) at base resolution
    pub ball_speed: f32,
    /// Background image reference, resolved by the renderer
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub brick_types: BrickWeights,
}

impl LevelConfig {
    fn validate(&self, index: usize) -> Result<(), LevelError> {
        let invalid = |reason: &str| LevelError::InvalidLevel {
            index,
            reason: reason.to_string(),
        };
        if self.rows == 0 || self.columns == 0 {
            return Err(invalid("grid needs at least one row and one column"));
        }
        if !(self.paddle_width > 0.0) {
            return Err(invalid("paddleWidth must be positive"));
        }
        if !(self.ball_speed > 0.0) {
            return Err(invalid("ballSpeed must be positive"));
        }
        if self
            .brick_types
            .entries()
            .iter()
            .any(|(_, chance)| !(*chance >= 0.0))
        {
            return Err(invalid("brick weights must be non-negative"));
        }
        Ok(())
    }
}

/// Validated level table. Holding one means level data is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    levels: Vec<LevelConfig>,
}

impl LevelSet {
    /// Validate a level list (needs at least [`MAX_LEVEL`] entries)
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelError> {
        if levels.len() < MAX_LEVEL as usize {
            return Err(LevelError::TooFewLevels {
                found: levels.len(),
                required: MAX_LEVEL as usize,
            });
        }
        for (index, level) in levels.iter().enumerate() {
            level.validate(index + 1)?;
        }
        Ok(Self { levels })
    }

    /// Parse and validate a JSON level table
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// Load a JSON level table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The level table shipped with the game
    pub fn bundled() -> Result<Self, LevelError> {
        Self::from_json(BUNDLED_LEVELS)
    }

    /// Config for a 1-based level number, clamped to the table
    pub fn level(&self, number: u32) -> &LevelConfig {
        let index = (number.max(1) as usize - 1).min(self.levels.len() - 1);
        &self.levels[index]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
