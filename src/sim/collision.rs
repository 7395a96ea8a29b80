//! Collision detection and response
//!
//! Discrete per-tick tests: the ball's projected next position is checked
//! against the walls and paddle, and its current bounding box against bricks.
//! Displacement per tick is small next to brick size, so no swept test is done.

use super::rect::Rect;
use super::state::{Ball, Field, Paddle};
use crate::consts::PADDLE_STEERING;

/// Which velocity components a wall bounce reversed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallCollision {
    pub reversed_x: bool,
    pub reversed_y: bool,
}

impl WallCollision {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn hit(&self) -> bool {
        self.reversed_x || self.reversed_y
    }
}

/// Side of a brick the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl CollisionSide {
    /// Left/right hits reverse horizontal velocity, top/bottom vertical
    pub fn is_horizontal(self) -> bool {
        matches!(self, CollisionSide::Left | CollisionSide::Right)
    }
}

/// Bounce off the left, right and top edges.
///
/// The bottom edge is not a wall; falling past it is ball loss.
pub fn wall_collision(ball: &mut Ball, field: &Field) -> WallCollision {
    let next = ball.next_pos();
    let r = ball.radius();
    let mut result = WallCollision::miss();

    if next.x > field.width - r || next.x < r {
        ball.reverse_x();
        result.reversed_x = true;
    }
    if next.y < r {
        ball.reverse_y();
        result.reversed_y = true;
    }
    result
}

/// Bounce off the paddle with steering by impact point.
///
/// Hits when the next vertical position enters the paddle band and the
/// current horizontal position is over the paddle. Vertical velocity
/// reverses; horizontal velocity becomes the offset from the paddle center
/// times [`PADDLE_STEERING`].
pub fn paddle_collision(ball: &mut Ball, paddle: &Paddle) -> bool {
    let next_y = ball.next_pos().y;
    let rect = paddle.rect();

    let in_band = next_y > rect.top() - ball.radius() && next_y < rect.bottom();
    if in_band && rect.spans_x(ball.pos.x, 0.0) {
        ball.reverse_y();
        ball.vel.x = (ball.pos.x - paddle.center_x()) * PADDLE_STEERING;
        return true;
    }
    false
}

/// Side of `brick` the ball overlaps the least, if their boxes intersect.
///
/// Ties resolve in the order left, right, top, bottom.
pub fn brick_collision_side(ball: &Ball, brick: &Rect) -> Option<CollisionSide> {
    let b = ball.bounds();
    if !b.intersects(brick) {
        return None;
    }

    let overlaps = [
        (CollisionSide::Left, b.right() - brick.left()),
        (CollisionSide::Right, brick.right() - b.left()),
        (CollisionSide::Top, b.bottom() - brick.top()),
        (CollisionSide::Bottom, brick.bottom() - b.top()),
    ];

    let mut best = overlaps[0];
    for candidate in &overlaps[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    Some(best.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let mut ball = Ball::new(&Field::default());
        ball.pos = Vec2::new(x, y);
        ball.vel = Vec2::new(vx, vy);
        ball
    }

    #[test]
    fn test_wall_reflects_left_right_top() {
        let field = Field::default();

        let mut ball = ball_at(12.0, 300.0, -3.0, 1.0);
        let hit = wall_collision(&mut ball, &field);
        assert!(hit.reversed_x && !hit.reversed_y);
        assert_eq!(ball.vel.x, 3.0);

        let mut ball = ball_at(field.width - 11.0, 300.0, 2.0, 1.0);
        assert!(wall_collision(&mut ball, &field).reversed_x);
        assert_eq!(ball.vel.x, -2.0);

        let mut ball = ball_at(500.0, 11.0, 0.0, -2.0);
        let hit = wall_collision(&mut ball, &field);
        assert!(hit.reversed_y && !hit.reversed_x);
        assert_eq!(ball.vel.y, 2.0);
    }

    #[test]
    fn test_bottom_is_not_a_wall() {
        let field = Field::default();
        let mut ball = ball_at(500.0, field.height - 5.0, 0.0, 3.0);
        assert!(!wall_collision(&mut ball, &field).hit());
        assert_eq!(ball.vel.y, 3.0);
        assert!(ball.is_lost(&field));
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let field = Field::default();
        let paddle = Paddle::new(&field, 120.0);
        let cx = paddle.center_x();
        let mut ball = ball_at(cx, paddle.pos.y - 12.0, 1.5, 3.0);
        assert!(paddle_collision(&mut ball, &paddle));
        assert_eq!(ball.vel.y, -3.0);
        assert!(ball.vel.x.abs() < 1e-6);
    }

    #[test]
    fn test_paddle_steering_proportional_to_offset() {
        let field = Field::default();
        let paddle = Paddle::new(&field, 120.0);
        let x = paddle.center_x() + 50.0;
        let mut ball = ball_at(x, paddle.pos.y - 12.0, 0.0, 3.0);
        assert!(paddle_collision(&mut ball, &paddle));
        assert!((ball.vel.x - 50.0 * PADDLE_STEERING).abs() < 1e-5);

        let x = paddle.center_x() - 20.0;
        let mut ball = ball_at(x, paddle.pos.y - 12.0, 0.0, 3.0);
        assert!(paddle_collision(&mut ball, &paddle));
        assert!((ball.vel.x + 20.0 * PADDLE_STEERING).abs() < 1e-5);
    }

    #[test]
    fn test_paddle_miss_outside_extent() {
        let field = Field::default();
        let paddle = Paddle::new(&field, 120.0);
        let mut ball = ball_at(paddle.pos.x - 1.0, paddle.pos.y - 12.0, 0.0, 3.0);
        assert!(!paddle_collision(&mut ball, &paddle));
        assert_eq!(ball.vel.y, 3.0);
    }

    #[test]
    fn test_brick_side_detection() {
        let brick = Rect::new(100.0, 100.0, 85.0, 20.0);

        // Coming in from the left edge
        let ball = ball_at(92.0, 110.0, 1.0, 0.0);
        assert_eq!(brick_collision_side(&ball, &brick), Some(CollisionSide::Left));

        // Right edge
        let ball = ball_at(193.0, 110.0, -1.0, 0.0);
        assert_eq!(brick_collision_side(&ball, &brick), Some(CollisionSide::Right));

        // From above
        let ball = ball_at(140.0, 92.0, 0.0, 1.0);
        assert_eq!(brick_collision_side(&ball, &brick), Some(CollisionSide::Top));

        // From below
        let ball = ball_at(140.0, 128.0, 0.0, -1.0);
        assert_eq!(brick_collision_side(&ball, &brick), Some(CollisionSide::Bottom));

        // No overlap
        let ball = ball_at(140.0, 200.0, 0.0, -1.0);
        assert_eq!(brick_collision_side(&ball, &brick), None);
    }

    #[test]
    fn test_brick_side_tie_prefers_left_then_top() {
        // Square brick, ball overlapping the top-left corner equally
        let brick = Rect::new(100.0, 100.0, 40.0, 40.0);
        let ball = ball_at(98.0, 98.0, 1.0, 1.0);
        assert_eq!(brick_collision_side(&ball, &brick), Some(CollisionSide::Left));

        // Bottom-right corner: right wins over bottom
        let ball = ball_at(142.0, 142.0, -1.0, -1.0);
        assert_eq!(brick_collision_side(&ball, &brick), Some(CollisionSide::Right));
    }
}
