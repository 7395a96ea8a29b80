//! Brick grid: layout, hit dispatch, chain explosions and row mutation
//!
//! Bricks are stored column-major (`columns[c][r]`) and scanned in that order,
//! so when a ball overlaps several bricks the first one found is the one hit.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{CollisionSide, brick_collision_side};
use super::rect::Rect;
use super::state::{Ball, Brick, BrickKind, Field};
use crate::consts::*;
use crate::levels::LevelConfig;

/// Orthogonal neighbor offsets: up, down, left, right
const NEIGHBORS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Brick cell geometry, already scaled to the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub brick_width: f32,
    pub brick_height: f32,
    pub padding: f32,
    pub offset_top: f32,
    pub offset_left: f32,
}

impl GridLayout {
    pub fn for_field(field: &Field) -> Self {
        let s = field.scale;
        Self {
            brick_width: BRICK_WIDTH * s,
            brick_height: BRICK_HEIGHT * s,
            padding: BRICK_PADDING * s,
            offset_top: BRICK_OFFSET_TOP * s,
            offset_left: BRICK_OFFSET_LEFT * s,
        }
    }

    /// Vertical distance between row origins
    pub fn row_step(&self) -> f32 {
        self.brick_height + self.padding
    }

    pub fn brick_rect(&self, column: usize, row: usize) -> Rect {
        Rect::new(
            column as f32 * (self.brick_width + self.padding) + self.offset_left,
            row as f32 * self.row_step() + self.offset_top,
            self.brick_width,
            self.brick_height,
        )
    }
}

/// A pickup to spawn where a special brick was destroyed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupDrop {
    pub pos: Vec2,
    pub debuff: bool,
}

/// Side effects of a grid operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridOutcome {
    /// Bricks that went from alive to destroyed
    pub destroyed: u32,
    /// Pickups to spawn, in destruction order
    pub drops: Vec<PickupDrop>,
}

impl GridOutcome {
    pub fn score_delta(&self) -> i64 {
        i64::from(self.destroyed) * BRICK_SCORE
    }

    fn record_destroyed(&mut self, brick: &Brick) {
        self.destroyed += 1;
        let debuff = match brick.kind {
            BrickKind::Bonus => false,
            BrickKind::Debuff => true,
            _ => return,
        };
        self.drops.push(PickupDrop {
            pos: Vec2::new(brick.rect.center().x, brick.rect.bottom()),
            debuff,
        });
    }
}

/// Result of a ball striking the grid
#[derive(Debug, Clone, PartialEq)]
pub struct BrickHit {
    pub column: usize,
    pub row: usize,
    pub side: CollisionSide,
    /// Kind of the struck brick at impact
    pub kind: BrickKind,
    /// The struck brick itself was destroyed
    pub destroyed: bool,
    /// The hit set off a chain explosion
    pub exploded: bool,
    pub outcome: GridOutcome,
}

/// Rectangular brick grid for one level
#[derive(Debug, Clone, PartialEq)]
pub struct BrickGrid {
    columns: Vec<Vec<Brick>>,
    rows: usize,
    layout: GridLayout,
}

impl BrickGrid {
    /// Lay out a level, drawing each brick's kind from the level's weight table
    pub fn generate(config: &LevelConfig, field: &Field, rng: &mut Pcg32) -> Self {
        let grid = Self::from_fn(
            config.columns,
            config.rows,
            GridLayout::for_field(field),
            |_, _| config.brick_types.sample(rng.random::<f32>() * 100.0),
        );
        log::debug!(
            "Generated {}x{} grid, {} bricks to clear",
            config.columns,
            config.rows,
            grid.remaining()
        );
        grid
    }

    /// Build a grid with an explicit kind per cell
    pub fn from_fn(
        columns: usize,
        rows: usize,
        layout: GridLayout,
        mut kind_at: impl FnMut(usize, usize) -> BrickKind,
    ) -> Self {
        let columns = (0..columns)
            .map(|c| {
                (0..rows)
                    .map(|r| Brick::new(layout.brick_rect(c, r), kind_at(c, r)))
                    .collect()
            })
            .collect();
        Self {
            columns,
            rows,
            layout,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        self.columns.get(column)?.get(row)
    }

    pub fn get_mut(&mut self, column: usize, row: usize) -> Option<&mut Brick> {
        self.columns.get_mut(column)?.get_mut(row)
    }

    /// All bricks with their (column, row), in scan order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Brick)> {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(c, column)| column.iter().enumerate().map(move |(r, b)| (c, r, b)))
    }

    /// Bricks still blocking level completion
    pub fn remaining(&self) -> usize {
        self.iter().filter(|(_, _, b)| b.blocks_clear()).count()
    }

    /// Find the first live brick the ball overlaps, damage it and bounce.
    ///
    /// Dynamite bricks and explosive balls set off a chain explosion at the
    /// struck cell instead of a single hit. The ball bounces off every brick,
    /// including ones that shrug off the hit.
    pub fn resolve_collision(&mut self, ball: &mut Ball) -> Option<BrickHit> {
        let (column, row, side) = self.iter().find_map(|(c, r, brick)| {
            if !brick.is_alive() {
                return None;
            }
            brick_collision_side(ball, &brick.rect).map(|side| (c, r, side))
        })?;

        let kind = self.columns[column][row].kind;
        let exploded = ball.explosive || kind == BrickKind::Dynamite;

        let outcome = if exploded {
            self.explode_dynamite(column, row)
        } else {
            let brick = &mut self.columns[column][row];
            let mut outcome = GridOutcome::default();
            if brick.hit(false) {
                outcome.record_destroyed(brick);
            }
            outcome
        };

        if side.is_horizontal() {
            ball.reverse_x();
        } else {
            ball.reverse_y();
        }

        let destroyed = !self.columns[column][row].is_alive();
        log::debug!(
            "Ball hit {:?} brick at ({}, {}) on {:?}, destroyed {}",
            kind,
            column,
            row,
            side,
            outcome.destroyed
        );
        Some(BrickHit {
            column,
            row,
            side,
            kind,
            destroyed,
            exploded,
            outcome,
        })
    }

    fn neighbor(&self, column: usize, row: usize, offset: (isize, isize)) -> Option<(usize, usize)> {
        let c = column.checked_add_signed(offset.0)?;
        let r = row.checked_add_signed(offset.1)?;
        (c < self.column_count() && r < self.rows).then_some((c, r))
    }

    /// Blast a cell and its orthogonal neighbors with explosive hits.
    ///
    /// Any destroyed Dynamite brick blasts its own neighbors in turn.
    /// Destroyed bricks are skipped, so each brick explodes at most once.
    pub fn explode_dynamite(&mut self, column: usize, row: usize) -> GridOutcome {
        let mut outcome = GridOutcome::default();
        if column >= self.column_count() || row >= self.rows {
            return outcome;
        }

        // Depth-first, center first, then up/down/left/right
        let mut pending: Vec<(usize, usize)> = NEIGHBORS
            .iter()
            .rev()
            .filter_map(|&offset| self.neighbor(column, row, offset))
            .collect();
        pending.push((column, row));

        while let Some((c, r)) = pending.pop() {
            let brick = &mut self.columns[c][r];
            if !brick.is_alive() || !brick.hit(true) {
                continue;
            }
            outcome.record_destroyed(brick);
            if brick.kind == BrickKind::Dynamite {
                pending.extend(
                    NEIGHBORS
                        .iter()
                        .rev()
                        .filter_map(|&offset| self.neighbor(c, r, offset)),
                );
            }
        }
        outcome
    }

    /// Shift every row down by one and add an empty row on top.
    ///
    /// The bottom row falls off the grid so column length never grows.
    /// Returns true if live bricks were discarded with it.
    pub fn drop_bricks_one_row(&mut self) -> bool {
        if self.rows == 0 {
            return false;
        }
        let step = self.layout.row_step();
        let mut discarded_live = false;

        for (c, column) in self.columns.iter_mut().enumerate() {
            if let Some(bottom) = column.pop() {
                discarded_live |= bottom.is_alive();
            }
            for brick in column.iter_mut() {
                brick.rect.pos.y += step;
            }
            column.insert(0, Brick::destroyed(self.layout.brick_rect(c, 0)));
        }

        if discarded_live {
            log::debug!("Dropped bricks, live bottom row discarded");
        }
        discarded_live
    }

    /// Destroy every live brick in the bottom row, no chain reaction
    pub fn explode_bottom_row(&mut self) -> GridOutcome {
        let mut outcome = GridOutcome::default();
        let Some(bottom) = self.rows.checked_sub(1) else {
            return outcome;
        };
        for column in &mut self.columns {
            if column[bottom].force_destroy() {
                outcome.destroyed += 1;
            }
        }
        outcome
    }

    /// True once nothing but destroyed or Invincible bricks remain
    pub fn all_bricks_destroyed(&self) -> bool {
        self.iter().all(|(_, _, brick)| !brick.blocks_clear())
    }

    /// Destroy every brick except Invincible ones (debug level skip)
    pub fn destroy_all_bricks(&mut self) -> GridOutcome {
        let mut outcome = GridOutcome::default();
        for brick in self.columns.iter_mut().flatten() {
            if brick.blocks_clear() && brick.force_destroy() {
                outcome.destroyed += 1;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::BrickWeights;
    use crate::sim::state::Hitpoints;
    use rand::SeedableRng;

    fn layout() -> GridLayout {
        GridLayout::for_field(&Field::default())
    }

    fn grid_3x3(center: BrickKind) -> BrickGrid {
        BrickGrid::from_fn(3, 3, layout(), |c, r| {
            if (c, r) == (1, 1) {
                center
            } else {
                BrickKind::Normal
            }
        })
    }

    /// A ball overlapping the top edge of a cell, moving down
    fn ball_on(grid: &BrickGrid, column: usize, row: usize) -> Ball {
        let rect = grid.get(column, row).unwrap().rect;
        let mut ball = Ball::new(&Field::default());
        ball.pos = Vec2::new(rect.center().x, rect.top() - 8.0);
        ball.vel = Vec2::new(0.0, 3.0);
        ball
    }

    fn alive(grid: &BrickGrid, column: usize, row: usize) -> bool {
        grid.get(column, row).unwrap().is_alive()
    }

    #[test]
    fn test_layout_positions() {
        let l = layout();
        let rect = l.brick_rect(2, 1);
        assert_eq!(rect.left(), 2.0 * 95.0 + 30.0);
        assert_eq!(rect.top(), 30.0 + 30.0);
        assert_eq!(rect.size, Vec2::new(85.0, 20.0));
    }

    #[test]
    fn test_generate_uses_weights() {
        let config = LevelConfig {
            rows: 4,
            columns: 6,
            paddle_width: 120.0,
            ball_speed: 3.0,
            background: String::new(),
            brick_types: BrickWeights {
                strong: 100.0,
                ..Default::default()
            },
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let grid = BrickGrid::generate(&config, &Field::default(), &mut rng);
        assert_eq!(grid.column_count(), 6);
        assert_eq!(grid.row_count(), 4);
        assert!(grid.iter().all(|(_, _, b)| b.kind == BrickKind::Strong));
    }

    #[test]
    fn test_generate_empty_table_is_all_normal() {
        let config = LevelConfig {
            rows: 2,
            columns: 2,
            paddle_width: 120.0,
            ball_speed: 3.0,
            background: String::new(),
            brick_types: BrickWeights::default(),
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let grid = BrickGrid::generate(&config, &Field::default(), &mut rng);
        assert!(grid.iter().all(|(_, _, b)| b.kind == BrickKind::Normal));
    }

    #[test]
    fn test_single_hit_on_normal_neighbor_of_dynamite() {
        let mut grid = grid_3x3(BrickKind::Dynamite);
        let mut ball = ball_on(&grid, 1, 0);

        let hit = grid.resolve_collision(&mut ball).unwrap();
        assert_eq!((hit.column, hit.row), (1, 0));
        assert!(hit.destroyed);
        assert!(!hit.exploded);
        assert_eq!(hit.outcome.score_delta(), 1);
        assert!(alive(&grid, 1, 1), "dynamite must not go off");
        assert_eq!(grid.remaining(), 8);
        // Bounced off the top face
        assert_eq!(ball.vel.y, -3.0);
    }

    #[test]
    fn test_hitting_dynamite_explodes_neighbors() {
        let mut grid = grid_3x3(BrickKind::Dynamite);
        let mut ball = ball_on(&grid, 1, 1);
        // Move the ball between rows so only the center is overlapped
        ball.pos.y = grid.get(1, 1).unwrap().rect.center().y;
        ball.pos.x = grid.get(1, 1).unwrap().rect.left() + 5.0;

        let hit = grid.resolve_collision(&mut ball).unwrap();
        assert_eq!((hit.column, hit.row), (1, 1));
        assert!(hit.exploded);
        assert_eq!(hit.outcome.destroyed, 5);
        for (c, r) in [(1, 1), (1, 0), (1, 2), (0, 1), (2, 1)] {
            assert!(!alive(&grid, c, r));
        }
        for (c, r) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert!(alive(&grid, c, r));
        }
    }

    #[test]
    fn test_explosive_ball_explodes_any_brick() {
        let mut grid = grid_3x3(BrickKind::Dynamite);
        let mut ball = ball_on(&grid, 0, 0);
        ball.explosive = true;

        let hit = grid.resolve_collision(&mut ball).unwrap();
        assert_eq!((hit.column, hit.row), (0, 0));
        assert!(hit.exploded);
        // (0,0), its neighbors (0,1) and (1,0); neither is dynamite
        assert_eq!(hit.outcome.destroyed, 3);
        assert!(alive(&grid, 1, 1));
        assert!(alive(&grid, 2, 2));
    }

    #[test]
    fn test_chain_through_adjacent_dynamite() {
        // Row 0 is all dynamite: exploding one end reaches the other
        let mut grid = BrickGrid::from_fn(5, 2, layout(), |_, r| {
            if r == 0 {
                BrickKind::Dynamite
            } else {
                BrickKind::Normal
            }
        });
        let outcome = grid.explode_dynamite(0, 0);
        assert_eq!(outcome.destroyed, 10);
        assert!(grid.all_bricks_destroyed());
    }

    #[test]
    fn test_explosion_downgrades_strong_and_breaks_metal() {
        let mut grid = BrickGrid::from_fn(3, 1, layout(), |c, _| match c {
            0 => BrickKind::Strong,
            1 => BrickKind::Normal,
            _ => BrickKind::Metal,
        });
        let outcome = grid.explode_dynamite(1, 0);
        assert_eq!(outcome.destroyed, 2);
        let strong = grid.get(0, 0).unwrap();
        assert_eq!(strong.kind, BrickKind::Sand);
        assert_eq!(strong.hp, Hitpoints::Finite(1));
        assert!(!alive(&grid, 2, 0));
    }

    #[test]
    fn test_explosion_spawns_drops_for_special_bricks() {
        let mut grid = BrickGrid::from_fn(3, 1, layout(), |c, _| match c {
            0 => BrickKind::Bonus,
            1 => BrickKind::Dynamite,
            _ => BrickKind::Debuff,
        });
        let outcome = grid.explode_dynamite(1, 0);
        assert_eq!(outcome.destroyed, 3);
        assert_eq!(outcome.drops.len(), 2);
        assert!(!outcome.drops[0].debuff);
        assert!(outcome.drops[1].debuff);
        let bonus_rect = grid.get(0, 0).unwrap().rect;
        assert_eq!(
            outcome.drops[0].pos,
            Vec2::new(bonus_rect.center().x, bonus_rect.bottom())
        );
    }

    #[test]
    fn test_explosion_out_of_bounds_is_ignored() {
        let mut grid = grid_3x3(BrickKind::Normal);
        assert_eq!(grid.explode_dynamite(7, 7), GridOutcome::default());
        assert_eq!(grid.remaining(), 9);
    }

    #[test]
    fn test_invincible_bounces_but_survives() {
        let mut grid = grid_3x3(BrickKind::Invincible);
        let mut ball = ball_on(&grid, 1, 1);
        ball.pos.y = grid.get(1, 1).unwrap().rect.center().y;
        ball.pos.x = grid.get(1, 1).unwrap().rect.left() + 5.0;
        ball.vel = Vec2::new(2.0, 0.0);

        let hit = grid.resolve_collision(&mut ball).unwrap();
        assert!(!hit.destroyed);
        assert_eq!(hit.outcome.destroyed, 0);
        assert_eq!(ball.vel.x, -2.0);
    }

    #[test]
    fn test_scan_order_picks_first_column() {
        // A ball straddling the gap between columns 0 and 1 hits column 0
        let mut grid = grid_3x3(BrickKind::Normal);
        let left = grid.get(0, 0).unwrap().rect;
        let mut ball = Ball::new(&Field::default());
        ball.pos = Vec2::new(left.right() + 5.0, left.center().y);
        ball.vel = Vec2::new(1.0, 0.0);

        let hit = grid.resolve_collision(&mut ball).unwrap();
        assert_eq!((hit.column, hit.row), (0, 0));
        assert!(alive(&grid, 1, 0));
    }

    #[test]
    fn test_drop_bricks_one_row() {
        let mut grid = BrickGrid::from_fn(2, 3, layout(), |_, r| match r {
            0 => BrickKind::Strong,
            1 => BrickKind::Metal,
            _ => BrickKind::Normal,
        });
        let old_top_y = grid.get(0, 0).unwrap().rect.top();

        assert!(grid.drop_bricks_one_row());
        assert_eq!(grid.row_count(), 3);
        assert!(!alive(&grid, 0, 0));
        assert_eq!(grid.get(0, 0).unwrap().rect.top(), old_top_y);
        assert_eq!(grid.get(0, 1).unwrap().kind, BrickKind::Strong);
        assert_eq!(grid.get(1, 2).unwrap().kind, BrickKind::Metal);
        assert_eq!(
            grid.get(0, 1).unwrap().rect.top(),
            old_top_y + grid.layout().row_step()
        );
        // Bottom row now dead-free: nothing live discarded after a destroy
        grid.get_mut(0, 2).unwrap().force_destroy();
        grid.get_mut(1, 2).unwrap().force_destroy();
        assert!(!grid.drop_bricks_one_row());
    }

    #[test]
    fn test_explode_bottom_row() {
        let mut grid = BrickGrid::from_fn(3, 2, layout(), |c, r| match (c, r) {
            (0, 1) => BrickKind::Invincible,
            (1, 1) => BrickKind::Metal,
            _ => BrickKind::Normal,
        });
        grid.get_mut(2, 1).unwrap().force_destroy();

        let outcome = grid.explode_bottom_row();
        assert_eq!(outcome.destroyed, 2);
        assert!(outcome.drops.is_empty());
        assert!((0..3).all(|c| !alive(&grid, c, 1)));
        assert!((0..3).all(|c| alive(&grid, c, 0)));
    }

    #[test]
    fn test_all_destroyed_ignores_invincible() {
        let mut grid = grid_3x3(BrickKind::Invincible);
        assert!(!grid.all_bricks_destroyed());
        let outcome = grid.destroy_all_bricks();
        assert_eq!(outcome.destroyed, 8);
        assert!(alive(&grid, 1, 1));
        assert!(grid.all_bricks_destroyed());

        let empty = BrickGrid::from_fn(0, 0, layout(), |_, _| BrickKind::Normal);
        assert!(empty.all_bricks_destroyed());
        let invincible = BrickGrid::from_fn(2, 2, layout(), |_, _| BrickKind::Invincible);
        assert!(invincible.all_bricks_destroyed());
    }
}
