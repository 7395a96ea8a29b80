//! Falling bonus/debuff pickups and their effects
//!
//! A pickup spawns where a Bonus or Debuff brick was destroyed, falls at a
//! speed fixed at spawn time, and is either caught by the paddle (effect
//! applied, score adjusted) or falls off the field (no effect).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{BrickGrid, PickupDrop};
use super::state::{Ball, BallSize, Field, Paddle, RunState};
use crate::consts::*;
use crate::levels::LevelConfig;

/// Beneficial pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    ExtendPaddle,
    SpeedUpPaddle,
    SlowDownBall,
    ExplodeBottomRow,
    SplitBall,
    ExtraAttempt,
    IncreaseBallSize,
    ExplosiveBall,
}

impl BonusKind {
    pub const ALL: [BonusKind; 8] = [
        BonusKind::ExtendPaddle,
        BonusKind::SpeedUpPaddle,
        BonusKind::SlowDownBall,
        BonusKind::ExplodeBottomRow,
        BonusKind::SplitBall,
        BonusKind::ExtraAttempt,
        BonusKind::IncreaseBallSize,
        BonusKind::ExplosiveBall,
    ];
}

/// Harmful pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebuffKind {
    ShrinkPaddle,
    SpeedUpBall,
    DropBricks,
    DecreaseBallSize,
}

impl DebuffKind {
    pub const ALL: [DebuffKind; 4] = [
        DebuffKind::ShrinkPaddle,
        DebuffKind::SpeedUpBall,
        DebuffKind::DropBricks,
        DebuffKind::DecreaseBallSize,
    ];
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Bonus(BonusKind),
    Debuff(DebuffKind),
}

impl PickupKind {
    pub fn is_debuff(self) -> bool {
        matches!(self, PickupKind::Debuff(_))
    }

    /// Uniform pick among the bonus or the debuff kinds
    pub fn random(debuff: bool, rng: &mut Pcg32) -> Self {
        if debuff {
            PickupKind::Debuff(DebuffKind::ALL[rng.random_range(0..DebuffKind::ALL.len())])
        } else {
            PickupKind::Bonus(BonusKind::ALL[rng.random_range(0..BonusKind::ALL.len())])
        }
    }

    /// Score change for catching this pickup, before any effect payout
    pub fn score_delta(self) -> i64 {
        if self.is_debuff() {
            -DEBUFF_PENALTY
        } else {
            BONUS_SCORE
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Center x, top y
    pub pos: Vec2,
    /// Downward displacement per tick
    pub fall_speed: f32,
    pub kind: PickupKind,
}

impl Pickup {
    /// Catch window: offset y inside the paddle band, x within the widened extent
    pub fn is_caught_by(&self, paddle: &Paddle) -> bool {
        let rect = paddle.rect();
        rect.spans_y(self.pos.y + PICKUP_CATCH_OFFSET)
            && rect.spans_x(self.pos.x, PICKUP_CATCH_MARGIN)
    }
}

/// Everything a pickup effect may touch
pub struct EffectTargets<'a> {
    pub run: &'a mut RunState,
    pub paddle: &'a mut Paddle,
    pub balls: &'a mut Vec<Ball>,
    pub grid: &'a mut BrickGrid,
    pub field: &'a Field,
}

/// Active pickups for the current level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pickups {
    active: Vec<Pickup>,
}

impl Pickups {
    /// Spawn a pickup for a destroyed special brick.
    ///
    /// `reference_speed` is the primary ball's vertical speed; the fall speed
    /// is derived from it once and never re-evaluated.
    pub fn spawn(&mut self, drop: PickupDrop, reference_speed: f32, rng: &mut Pcg32) -> PickupKind {
        let kind = PickupKind::random(drop.debuff, rng);
        self.active.push(Pickup {
            pos: drop.pos,
            fall_speed: reference_speed.abs() * PICKUP_FALL_FACTOR,
            kind,
        });
        log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, drop.pos.x, drop.pos.y);
        kind
    }

    /// Advance every pickup one tick, applying caught ones in spawn order.
    ///
    /// Returns the kinds caught this tick.
    pub fn update(&mut self, targets: &mut EffectTargets<'_>) -> Vec<PickupKind> {
        let mut caught = Vec::new();
        let falling = std::mem::take(&mut self.active);

        for mut pickup in falling {
            pickup.pos.y += pickup.fall_speed;
            if pickup.is_caught_by(targets.paddle) {
                apply_effect(pickup.kind, targets);
                caught.push(pickup.kind);
            } else if pickup.pos.y <= targets.field.height {
                self.active.push(pickup);
            }
        }
        caught
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Apply a caught pickup's score change and effect
pub fn apply_effect(kind: PickupKind, targets: &mut EffectTargets<'_>) {
    targets.run.add_score(kind.score_delta());
    log::info!("Caught {:?}", kind);

    match kind {
        PickupKind::Bonus(bonus) => match bonus {
            BonusKind::ExtendPaddle => {
                let width = targets.paddle.width * EXTEND_PADDLE_FACTOR;
                targets.paddle.set_width(width, targets.field);
            }
            BonusKind::SpeedUpPaddle => targets.paddle.speed += PADDLE_SPEED_BONUS,
            BonusKind::SlowDownBall => {
                for ball in targets.balls.iter_mut() {
                    ball.scale_speed(BALL_SLOW_DOWN_FACTOR);
                }
            }
            BonusKind::ExplodeBottomRow => {
                let outcome = targets.grid.explode_bottom_row();
                targets.run.add_score(outcome.score_delta());
            }
            BonusKind::SplitBall => split_balls(targets.balls),
            BonusKind::ExtraAttempt => {
                if targets.run.attempts < MAX_ATTEMPTS {
                    targets.run.attempts += 1;
                } else {
                    targets.run.add_score(EXTRA_ATTEMPT_SCORE);
                }
            }
            BonusKind::IncreaseBallSize => {
                for ball in targets.balls.iter_mut() {
                    ball.size = ball.size.larger();
                }
            }
            BonusKind::ExplosiveBall => {
                for ball in targets.balls.iter_mut() {
                    ball.explosive = true;
                }
            }
        },
        PickupKind::Debuff(debuff) => match debuff {
            DebuffKind::ShrinkPaddle => {
                let min_width = PADDLE_MIN_WIDTH * targets.field.scale;
                let width = (targets.paddle.width * SHRINK_PADDLE_FACTOR).max(min_width);
                targets.paddle.set_width(width, targets.field);
            }
            DebuffKind::SpeedUpBall => {
                for ball in targets.balls.iter_mut() {
                    ball.scale_speed(BALL_SPEED_UP_FACTOR);
                }
            }
            DebuffKind::DropBricks => {
                targets.grid.drop_bricks_one_row();
            }
            DebuffKind::DecreaseBallSize => {
                for ball in targets.balls.iter_mut() {
                    ball.size = ball.size.smaller();
                }
            }
        },
    }
}

/// Duplicate every ball with its horizontal velocity mirrored
pub fn split_balls(balls: &mut Vec<Ball>) {
    let mut split = Vec::with_capacity(balls.len() * 2);
    for ball in balls.drain(..) {
        let mut twin = ball.clone();
        twin.vel.x = -ball.vel.x;
        split.push(ball);
        split.push(twin);
    }
    *balls = split;
}

/// Clear sticky effects back to the level defaults
pub fn reset_bonuses(paddle: &mut Paddle, balls: &mut [Ball], field: &Field, config: &LevelConfig) {
    paddle.set_width(config.paddle_width * field.scale, field);
    paddle.speed = PADDLE_SPEED * field.scale;
    for ball in balls {
        ball.size = BallSize::Normal;
        ball.explosive = false;
        ball.speed = config.ball_speed * field.scale;
    }
}
