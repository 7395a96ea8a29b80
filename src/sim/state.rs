//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`], owned by the caller.
//! There is no global state: renderers and audio read it after each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::BrickGrid;
use super::pickup::{PickupKind, Pickups};
use super::rect::Rect;
use crate::consts::*;
use crate::levels::{LevelConfig, LevelSet};

/// Play field size in the render surface's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    /// Display scale applied to every base-resolution constant
    pub scale: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self::with_scale(1.0)
    }
}

impl Field {
    /// A field at `scale` times the base resolution
    pub fn with_scale(scale: f32) -> Self {
        Self {
            width: BASE_WIDTH * scale,
            height: BASE_HEIGHT * scale,
            scale,
        }
    }

    /// Largest base-aspect field fitting in the fill fraction of a viewport
    pub fn fit(viewport_width: f32, viewport_height: f32) -> Self {
        let container_w = viewport_width * VIEWPORT_FILL;
        let container_h = viewport_height * VIEWPORT_FILL;
        let aspect = BASE_WIDTH / BASE_HEIGHT;

        let (width, height) = if container_w / container_h > aspect {
            (container_h * aspect, container_h)
        } else {
            (container_w, container_w / aspect)
        };
        Self {
            width,
            height,
            scale: width / BASE_WIDTH,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Ball size steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BallSize {
    Small,
    #[default]
    Normal,
    Large,
}

impl BallSize {
    /// Radius at base resolution
    pub fn base_radius(self) -> f32 {
        match self {
            BallSize::Small => BALL_RADIUS_SMALL,
            BallSize::Normal => BALL_RADIUS_NORMAL,
            BallSize::Large => BALL_RADIUS_LARGE,
        }
    }

    /// One step up, saturating at `Large`
    pub fn larger(self) -> Self {
        match self {
            BallSize::Small => BallSize::Normal,
            BallSize::Normal | BallSize::Large => BallSize::Large,
        }
    }

    /// One step down, saturating at `Small`
    pub fn smaller(self) -> Self {
        match self {
            BallSize::Large => BallSize::Normal,
            BallSize::Normal | BallSize::Small => BallSize::Small,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub size: BallSize,
    /// Launch speed magnitude
    pub speed: f32,
    /// Every brick hit triggers a chain explosion
    pub explosive: bool,
    /// Display scale the ball was created at
    pub scale: f32,
}

impl Ball {
    /// A resting ball near the bottom center of the field
    pub fn new(field: &Field) -> Self {
        Self {
            pos: Vec2::new(
                field.width / 2.0,
                field.height - BALL_SPAWN_OFFSET * field.scale,
            ),
            vel: Vec2::ZERO,
            size: BallSize::Normal,
            speed: 0.0,
            explosive: false,
            scale: field.scale,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.base_radius() * self.scale
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius())
    }

    /// Position one tick ahead
    #[inline]
    pub fn next_pos(&self) -> Vec2 {
        self.pos + self.vel
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn reverse_x(&mut self) {
        self.vel.x = -self.vel.x;
    }

    pub fn reverse_y(&mut self) {
        self.vel.y = -self.vel.y;
    }

    /// Launch upward at `angle_deg` off vertical (positive = rightward)
    pub fn launch(&mut self, angle_deg: f32) {
        let angle = angle_deg.to_radians();
        self.vel = Vec2::new(self.speed * angle.sin(), -self.speed * angle.cos());
    }

    /// Scale speed and the current velocity together
    pub fn scale_speed(&mut self, factor: f32) {
        self.speed *= factor;
        self.vel *= factor;
    }

    /// Rest the ball on top of the paddle, centered
    pub fn anchor_to(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius());
    }

    /// Next position falls past the bottom edge
    pub fn is_lost(&self, field: &Field) -> bool {
        self.next_pos().y > field.height - self.radius()
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal displacement per tick while a direction is held
    pub speed: f32,
}

impl Paddle {
    /// Level-default paddle, centered near the bottom of the field
    pub fn new(field: &Field, base_width: f32) -> Self {
        let width = base_width * field.scale;
        Self {
            pos: Vec2::new(
                (field.width - width) / 2.0,
                field.height - PADDLE_BOTTOM_OFFSET * field.scale,
            ),
            width,
            height: PADDLE_HEIGHT * field.scale,
            speed: PADDLE_SPEED * field.scale,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Move for one tick of held input; both directions cancel out
    pub fn step(&mut self, left: bool, right: bool, field: &Field) {
        let direction = match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            (true, true) | (false, false) => return,
        };
        self.pos.x += direction * self.speed;
        self.clamp_to(field);
    }

    /// Back to the horizontal center of the field
    pub fn recenter(&mut self, field: &Field) {
        self.pos.x = (field.width - self.width) / 2.0;
        self.clamp_to(field);
    }

    /// Resize around the current left edge, staying inside the field
    pub fn set_width(&mut self, width: f32, field: &Field) {
        self.width = width;
        self.clamp_to(field);
    }

    fn clamp_to(&mut self, field: &Field) {
        let max_x = (field.width - self.width).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    /// Two hits; turns into `Sand` after the first
    Strong,
    /// Drops a bonus pickup when destroyed
    Bonus,
    /// Drops a debuff pickup when destroyed
    Debuff,
    /// Explodes itself and its orthogonal neighbors
    Dynamite,
    /// Only explosions break it
    Metal,
    /// Never breaks, doesn't count for level clear
    Invincible,
    /// A damaged strong brick
    Sand,
}

impl BrickKind {
    pub fn initial_hitpoints(self) -> Hitpoints {
        match self {
            BrickKind::Strong => Hitpoints::Finite(2),
            BrickKind::Metal | BrickKind::Invincible => Hitpoints::Unbreakable,
            BrickKind::Normal
            | BrickKind::Bonus
            | BrickKind::Debuff
            | BrickKind::Dynamite
            | BrickKind::Sand => Hitpoints::Finite(1),
        }
    }
}

/// Remaining hits. `Finite(0)` is destroyed.
///
/// Ordering puts every finite count below `Unbreakable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hitpoints {
    Finite(u8),
    Unbreakable,
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub kind: BrickKind,
    pub hp: Hitpoints,
}

impl Brick {
    pub fn new(rect: Rect, kind: BrickKind) -> Self {
        Self {
            rect,
            kind,
            hp: kind.initial_hitpoints(),
        }
    }

    /// An already-destroyed placeholder
    pub fn destroyed(rect: Rect) -> Self {
        Self {
            rect,
            kind: BrickKind::Normal,
            hp: Hitpoints::Finite(0),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp != Hitpoints::Finite(0)
    }

    /// Must be destroyed before the level counts as cleared
    pub fn blocks_clear(&self) -> bool {
        self.is_alive() && self.kind != BrickKind::Invincible
    }

    /// Apply one hit. Returns true if this hit destroyed the brick.
    pub fn hit(&mut self, explosive: bool) -> bool {
        match (self.kind, self.hp) {
            (_, Hitpoints::Finite(0)) | (BrickKind::Invincible, _) => false,
            (BrickKind::Metal, _) => {
                if explosive {
                    self.hp = Hitpoints::Finite(0);
                }
                explosive
            }
            (kind, Hitpoints::Finite(n)) => {
                let left = n - 1;
                self.hp = Hitpoints::Finite(left);
                if kind == BrickKind::Strong && left == 1 {
                    self.kind = BrickKind::Sand;
                }
                left == 0
            }
            (_, Hitpoints::Unbreakable) => false,
        }
    }

    /// Destroy regardless of kind. Returns true if it was alive.
    pub fn force_destroy(&mut self) -> bool {
        let was_alive = self.is_alive();
        self.hp = Hitpoints::Finite(0);
        was_alive
    }
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start input
    Welcome,
    /// Ball resting on the paddle, waiting for launch input
    Ready,
    /// Active gameplay
    Playing,
    /// Out of attempts
    GameOver,
    /// Cleared the last level
    GameWon,
}

/// Score, level and attempts for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub phase: GamePhase,
    /// Can go negative through debuff penalties
    pub score: i64,
    /// 1-based level number
    pub level: u32,
    pub attempts: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Welcome,
            score: 0,
            level: 1,
            attempts: MAX_ATTEMPTS,
        }
    }
}

impl RunState {
    /// Start-of-run values, entering `Ready`
    pub fn reset(&mut self) {
        *self = Self {
            phase: GamePhase::Ready,
            ..Self::default()
        };
    }

    pub fn add_score(&mut self, delta: i64) {
        self.score += delta;
    }
}

/// Things that happened during a tick (consumed by audio and hosts)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GameStarted,
    BallsLaunched,
    WallBounce,
    PaddleBounce,
    BrickHit {
        column: usize,
        row: usize,
        kind: BrickKind,
        destroyed: bool,
    },
    Explosion {
        column: usize,
        row: usize,
        destroyed: u32,
    },
    PickupSpawned {
        kind: PickupKind,
    },
    PickupCaught {
        kind: PickupKind,
    },
    BallLost {
        remaining: usize,
    },
    LifeLost {
        attempts_left: u32,
    },
    LevelCleared {
        level: u32,
    },
    GameOver {
        score: i64,
    },
    GameWon {
        score: i64,
    },
    ReturnedToWelcome,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub run: RunState,
    pub field: Field,
    pub levels: LevelSet,
    pub paddle: Paddle,
    /// Active balls
    pub balls: Vec<Ball>,
    pub grid: BrickGrid,
    pub pickups: Pickups,
    /// Launch speed for the current level, already scaled
    pub level_ball_speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a session on the title screen with level 1 laid out.
    ///
    /// Requires a validated [`LevelSet`], so level data is always ready
    /// before the first tick.
    pub fn new(levels: LevelSet, field: Field, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = levels.level(1).clone();
        let paddle = Paddle::new(&field, config.paddle_width);
        let grid = BrickGrid::generate(&config, &field, &mut rng);

        let mut state = Self {
            seed,
            rng,
            run: RunState::default(),
            field,
            levels,
            paddle,
            balls: Vec::new(),
            grid,
            pickups: Pickups::default(),
            level_ball_speed: config.ball_speed * field.scale,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.serve_ball();
        state
    }

    pub fn level_config(&self) -> &LevelConfig {
        self.levels.level(self.run.level)
    }

    /// Fresh paddle, ball, grid and pickups for the current level
    pub fn reset_for_level(&mut self) {
        let config = self.level_config().clone();
        self.grid = BrickGrid::generate(&config, &self.field, &mut self.rng);
        self.pickups.clear();
        self.level_ball_speed = config.ball_speed * self.field.scale;
        self.reset_ball_and_paddle();
        log::info!(
            "Level {}: {}x{} bricks, ball speed {}",
            self.run.level,
            config.columns,
            config.rows,
            self.level_ball_speed
        );
    }

    /// Level-default paddle and a single resting ball
    pub fn reset_ball_and_paddle(&mut self) {
        let config = self.level_config();
        self.paddle = Paddle::new(&self.field, config.paddle_width);
        self.serve_ball();
    }

    /// Replace the balls with a single one resting on the paddle
    pub fn serve_ball(&mut self) {
        let mut ball = Ball::new(&self.field);
        ball.anchor_to(&self.paddle);
        self.balls = vec![ball];
    }

    /// Keep resting balls on the paddle (Ready phase)
    pub fn anchor_balls(&mut self) {
        for ball in &mut self.balls {
            ball.anchor_to(&self.paddle);
        }
    }
}
