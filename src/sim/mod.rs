//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per call to [`tick`]
//! - Seeded RNG only
//! - Stable iteration order (column-major brick scan, spawn-ordered pickups)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod pickup;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionSide, WallCollision, brick_collision_side, paddle_collision, wall_collision};
pub use grid::{BrickGrid, BrickHit, GridLayout, GridOutcome, PickupDrop};
pub use pickup::{BonusKind, DebuffKind, EffectTargets, Pickup, PickupKind, Pickups};
pub use rect::Rect;
pub use state::{
    Ball, BallSize, Brick, BrickKind, Field, GameEvent, GamePhase, GameState, Hitpoints, Paddle,
    RunState,
};
pub use tick::{TickInput, tick};
