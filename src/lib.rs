//! Brick Breaker - a paddle-and-ball arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collisions, brick grid, pickups, game flow)
//! - `levels`: Level definitions loaded before the first tick
//! - `audio`: Sound effect and music selection over a pluggable backend
//! - `render`: Drawing the game onto a host-provided surface
//! - `settings`: Volume, seed and viewport configuration

pub mod audio;
pub mod error;
pub mod levels;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{AudioError, LevelError};
pub use levels::{BrickWeights, LevelConfig, LevelSet};
pub use settings::Settings;

/// Game configuration constants
///
/// Sizes and positions are expressed at the base resolution and multiplied by
/// the display scale of the current [`sim::Field`].
pub mod consts {
    /// Base logical field size (the scale factor is `width / BASE_WIDTH`)
    pub const BASE_WIDTH: f32 = 1100.0;
    pub const BASE_HEIGHT: f32 = 700.0;
    /// Fraction of the host viewport the field may occupy
    pub const VIEWPORT_FILL: f32 = 0.8;

    /// Run progression
    pub const MAX_LEVEL: u32 = 25;
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;
    pub const PADDLE_SPEED: f32 = 5.0;
    pub const PADDLE_MIN_WIDTH: f32 = 50.0;
    /// Horizontal velocity per unit of offset from the paddle center
    pub const PADDLE_STEERING: f32 = 0.06;

    /// Ball radii per size step
    pub const BALL_RADIUS_SMALL: f32 = 6.0;
    pub const BALL_RADIUS_NORMAL: f32 = 10.0;
    pub const BALL_RADIUS_LARGE: f32 = 15.0;
    /// Ball spawn height above the bottom edge (before anchoring to the paddle)
    pub const BALL_SPAWN_OFFSET: f32 = 60.0;
    /// Launch spread either side of straight up, in degrees
    pub const LAUNCH_SPREAD_DEG: f32 = 30.0;

    /// Brick layout
    pub const BRICK_WIDTH: f32 = 85.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;

    /// Pickups
    pub const PICKUP_FALL_FACTOR: f32 = 0.65;
    pub const PICKUP_CATCH_OFFSET: f32 = 8.0;
    pub const PICKUP_CATCH_MARGIN: f32 = 10.0;
    pub const PICKUP_SIZE: f32 = 20.0;

    /// Effect tuning
    pub const EXTEND_PADDLE_FACTOR: f32 = 1.25;
    pub const SHRINK_PADDLE_FACTOR: f32 = 0.75;
    pub const PADDLE_SPEED_BONUS: f32 = 2.0;
    pub const BALL_SLOW_DOWN_FACTOR: f32 = 0.7;
    pub const BALL_SPEED_UP_FACTOR: f32 = 1.4;

    /// Scoring
    pub const BRICK_SCORE: i64 = 1;
    pub const BONUS_SCORE: i64 = 3;
    pub const DEBUFF_PENALTY: i64 = 3;
    pub const EXTRA_ATTEMPT_SCORE: i64 = 40;

    /// Default volumes (0.0 - 1.0)
    pub const DEFAULT_MUSIC_VOLUME: f32 = 0.11;
    pub const DEFAULT_EFFECTS_VOLUME: f32 = 0.65;

    /// Levels per music track
    pub const LEVELS_PER_STAGE: u32 = 5;
    pub const STAGE_COUNT: u32 = 5;
}
