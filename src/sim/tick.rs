//! Fixed timestep simulation tick
//!
//! Drives the run state machine: Welcome → Ready → Playing → Ready / GameOver /
//! GameWon, and back to Welcome. One call advances everything by one frame.

use rand::Rng;

use super::collision::{paddle_collision, wall_collision};
use super::pickup::{EffectTargets, reset_bonuses};
use super::state::{Ball, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-left held
    pub move_left: bool,
    /// Move-right held
    pub move_right: bool,
    /// Confirm pressed this tick (start, launch or restart)
    pub confirm: bool,
    /// Clear the current level instantly (debug/testing)
    pub skip_level: bool,
    /// Demo mode - the simulation steers the paddle itself
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    let mut input = input.clone();
    if input.autopilot {
        steer_autopilot(state, &mut input);
    }
    let input = &input;

    if input.confirm {
        match state.run.phase {
            GamePhase::Welcome => start_new_game(state),
            GamePhase::Ready => launch_balls(state),
            GamePhase::GameOver | GamePhase::GameWon => return_to_welcome(state),
            GamePhase::Playing => {}
        }
    }

    if input.skip_level && state.run.phase == GamePhase::Playing {
        let outcome = state.grid.destroy_all_bricks();
        state.run.add_score(outcome.score_delta());
        log::info!("Skipping level {}", state.run.level);
        advance_level(state);
    }

    match state.run.phase {
        GamePhase::Ready => {
            state
                .paddle
                .step(input.move_left, input.move_right, &state.field);
            state.anchor_balls();
        }
        GamePhase::Playing => {
            state
                .paddle
                .step(input.move_left, input.move_right, &state.field);
            update_playing(state);
        }
        GamePhase::Welcome | GamePhase::GameOver | GamePhase::GameWon => {}
    }
}

/// Reset score, level and attempts and lay out level 1
pub fn start_new_game(state: &mut GameState) {
    state.run.reset();
    state.reset_for_level();
    state.events.push(GameEvent::GameStarted);
    log::info!("New game started (seed {})", state.seed);
}

/// Send every resting ball upward at a random angle within the launch spread
pub fn launch_balls(state: &mut GameState) {
    let speed = state.level_ball_speed;
    for ball in &mut state.balls {
        ball.speed = speed;
        let angle = state
            .rng
            .random_range(-LAUNCH_SPREAD_DEG..=LAUNCH_SPREAD_DEG);
        ball.launch(angle);
    }
    state.run.phase = GamePhase::Playing;
    state.events.push(GameEvent::BallsLaunched);
    log::debug!("Launched {} ball(s) at speed {}", state.balls.len(), speed);
}

fn return_to_welcome(state: &mut GameState) {
    state.run.phase = GamePhase::Welcome;
    state.events.push(GameEvent::ReturnedToWelcome);
}

/// Vertical speed new pickups inherit: the primary ball's, else the level's
fn pickup_reference_speed(balls: &[Ball], fallback: f32) -> f32 {
    balls.first().map_or(fallback, |ball| ball.vel.y.abs())
}

fn update_playing(state: &mut GameState) {
    // Per ball: move, walls, paddle, bricks
    for i in 0..state.balls.len() {
        let ball = &mut state.balls[i];
        ball.advance();

        if wall_collision(ball, &state.field).hit() {
            state.events.push(GameEvent::WallBounce);
        }
        if paddle_collision(ball, &state.paddle) {
            state.events.push(GameEvent::PaddleBounce);
        }

        let Some(hit) = state.grid.resolve_collision(ball) else {
            continue;
        };
        state.run.add_score(hit.outcome.score_delta());
        state.events.push(GameEvent::BrickHit {
            column: hit.column,
            row: hit.row,
            kind: hit.kind,
            destroyed: hit.destroyed,
        });
        if hit.exploded {
            state.events.push(GameEvent::Explosion {
                column: hit.column,
                row: hit.row,
                destroyed: hit.outcome.destroyed,
            });
        }

        let reference = pickup_reference_speed(&state.balls, state.level_ball_speed);
        for drop in hit.outcome.drops {
            let kind = state.pickups.spawn(drop, reference, &mut state.rng);
            state.events.push(GameEvent::PickupSpawned { kind });
        }
    }

    // Balls whose next step leaves the bottom edge are gone
    let before = state.balls.len();
    let field = state.field;
    state.balls.retain(|ball| !ball.is_lost(&field));
    for remaining in (state.balls.len()..before).rev() {
        state.events.push(GameEvent::BallLost { remaining });
    }

    let mut targets = EffectTargets {
        run: &mut state.run,
        paddle: &mut state.paddle,
        balls: &mut state.balls,
        grid: &mut state.grid,
        field: &state.field,
    };
    for kind in state.pickups.update(&mut targets) {
        state.events.push(GameEvent::PickupCaught { kind });
    }

    // A cleared board wins over losing the last ball in the same tick
    if state.grid.all_bricks_destroyed() {
        advance_level(state);
    } else if state.balls.is_empty() {
        handle_ball_loss(state);
    }
}

/// All balls gone: spend an attempt or end the run
fn handle_ball_loss(state: &mut GameState) {
    if state.run.attempts > 1 {
        state.run.attempts -= 1;
        state.pickups.clear();
        reset_bonuses(
            &mut state.paddle,
            &mut state.balls,
            &state.field,
            state.levels.level(state.run.level),
        );
        state.paddle.recenter(&state.field);
        state.serve_ball();
        state.run.phase = GamePhase::Ready;
        state.events.push(GameEvent::LifeLost {
            attempts_left: state.run.attempts,
        });
        log::info!("Life lost, {} attempt(s) left", state.run.attempts);
    } else {
        state.run.attempts = 0;
        state.run.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.run.score,
        });
        log::info!(
            "Game over on level {} with score {}",
            state.run.level,
            state.run.score
        );
    }
}

/// Level cleared: move on, or win after the last level
fn advance_level(state: &mut GameState) {
    state.events.push(GameEvent::LevelCleared {
        level: state.run.level,
    });

    if state.run.level >= MAX_LEVEL {
        state.run.phase = GamePhase::GameWon;
        state.events.push(GameEvent::GameWon {
            score: state.run.score,
        });
        log::info!("All {} levels cleared, score {}", MAX_LEVEL, state.run.score);
        return;
    }

    state.run.level += 1;
    state.reset_for_level();
    state.run.phase = GamePhase::Ready;
}

/// Demo mode: auto-confirm on the title and serve screens, then track the
/// most dangerous ball, grabbing bonus pickups while every ball is safe.
fn steer_autopilot(state: &GameState, input: &mut TickInput) {
    match state.run.phase {
        GamePhase::Welcome | GamePhase::Ready => input.confirm = true,
        GamePhase::Playing => {}
        GamePhase::GameOver | GamePhase::GameWon => return,
    }

    let field = &state.field;
    let paddle = &state.paddle;

    // Lowest ball heading down is the one to save
    let threat = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let all_safe = state
        .balls
        .iter()
        .all(|b| b.vel.y <= 0.0 || b.pos.y < field.height * 0.5);

    let target_pickup = if all_safe {
        state
            .pickups
            .iter()
            .filter(|p| !p.kind.is_debuff())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|p| p.pos.x)
    } else {
        None
    };

    let target_x = if let Some(x) = target_pickup {
        x
    } else if let Some(ball) = threat {
        // Lead the ball slightly and wobble the impact point for varied angles
        let t = state.time_ticks as f32 * 0.01;
        let wobble = (t.sin() * 0.3 + (t * 0.7).sin() * 0.15) * paddle.width / 2.0;
        ball.pos.x + ball.vel.normalize_or_zero().x * 30.0 * field.scale + wobble
    } else {
        return;
    };

    let center = paddle.center_x();
    let deadband = paddle.speed;
    input.move_left = target_x < center - deadband;
    input.move_right = target_x > center + deadband;
}
