//! Frame drawing onto a host-provided surface
//!
//! The host implements [`Surface`] (canvas, GPU, terminal, ...). Everything is
//! positioned in the field's coordinate space; the host maps that onto pixels.

use glam::Vec2;

use crate::sim::{BrickKind, GamePhase, GameState, Rect};

/// RGBA color, components 0.0 - 1.0
pub type Color = [f32; 4];

/// Paddle color, also used for bricks whose sprite is missing
pub const FALLBACK_FILL: Color = [0.0, 0.584, 0.867, 1.0];
pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.7];
pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];

const HUD_FONT: f32 = 20.0;
const TITLE_FONT: f32 = 40.0;
const SCORE_FONT: f32 = 30.0;
const LIFE_ICON_SIZE: f32 = 20.0;

/// Image resources the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite<'a> {
    /// Level background by asset path
    Background(&'a str),
    Brick(BrickKind),
    Ball,
    ExplosiveBall,
    BonusPickup,
    DebuffPickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Draw primitives the host provides
pub trait Surface {
    /// Logical size in field coordinates
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Draw an image stretched over `rect`. Returns false if it isn't loaded.
    fn draw_image(&mut self, sprite: Sprite<'_>, rect: Rect) -> bool;
    fn draw_text(&mut self, text: &str, pos: Vec2, font_size: f32, color: Color, align: TextAlign);
}

/// Draw one complete frame for the current state
pub fn draw_frame(state: &GameState, surface: &mut impl Surface) {
    surface.clear();
    let size = surface.size();
    let full = Rect::new(0.0, 0.0, size.x, size.y);
    surface.draw_image(Sprite::Background(&state.level_config().background), full);

    match state.run.phase {
        GamePhase::Welcome => {
            draw_overlay(surface, "Brick Breaker", None, "Press SPACE to start");
        }
        GamePhase::Ready | GamePhase::Playing => draw_playfield(state, surface),
        GamePhase::GameOver => {
            draw_overlay(
                surface,
                "Game Over",
                Some(state.run.score),
                "Press SPACE to restart",
            );
        }
        GamePhase::GameWon => {
            draw_overlay(
                surface,
                "Congratulations! You beat the game!",
                Some(state.run.score),
                "Press SPACE to restart",
            );
        }
    }
}

fn draw_playfield(state: &GameState, surface: &mut impl Surface) {
    // Bricks
    for (_, _, brick) in state.grid.iter() {
        if !brick.is_alive() {
            continue;
        }
        if !surface.draw_image(Sprite::Brick(brick.kind), brick.rect) {
            surface.fill_rect(brick.rect, FALLBACK_FILL);
        }
    }

    // Balls
    for ball in &state.balls {
        let sprite = if ball.explosive {
            Sprite::ExplosiveBall
        } else {
            Sprite::Ball
        };
        surface.draw_image(sprite, ball.bounds());
    }

    surface.fill_rect(state.paddle.rect(), FALLBACK_FILL);

    // Pickups, centered on their position
    let half = crate::consts::PICKUP_SIZE * state.field.scale / 2.0;
    for pickup in state.pickups.iter() {
        let sprite = if pickup.kind.is_debuff() {
            Sprite::DebuffPickup
        } else {
            Sprite::BonusPickup
        };
        let rect = Rect::new(pickup.pos.x - half, pickup.pos.y - half, half * 2.0, half * 2.0);
        surface.draw_image(sprite, rect);
    }

    draw_hud(state, surface);
}

fn draw_hud(state: &GameState, surface: &mut impl Surface) {
    let width = surface.size().x;
    let baseline = 25.0;
    surface.draw_text(
        &format!("Level: {}", state.run.level),
        Vec2::new(30.0, baseline),
        HUD_FONT,
        TEXT,
        TextAlign::Left,
    );
    surface.draw_text(
        &format!("Score: {}", state.run.score),
        Vec2::new(230.0, baseline),
        HUD_FONT,
        TEXT,
        TextAlign::Left,
    );
    surface.draw_text(
        "Attempts:",
        Vec2::new(width - 200.0, baseline),
        HUD_FONT,
        TEXT,
        TextAlign::Left,
    );
    for i in 0..state.run.attempts {
        let x = width - 110.0 + i as f32 * 30.0;
        let icon = Rect::new(x, 10.0, LIFE_ICON_SIZE, LIFE_ICON_SIZE);
        surface.draw_image(Sprite::Ball, icon);
    }
}

fn draw_overlay(surface: &mut impl Surface, title: &str, score: Option<i64>, prompt: &str) {
    let size = surface.size();
    surface.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), OVERLAY);

    let center = size / 2.0;
    surface.draw_text(
        title,
        center - Vec2::new(0.0, 50.0),
        TITLE_FONT,
        TEXT,
        TextAlign::Center,
    );
    if let Some(score) = score {
        surface.draw_text(
            &format!("Final score: {score}"),
            center + Vec2::new(0.0, 20.0),
            SCORE_FONT,
            TEXT,
            TextAlign::Center,
        );
    }
    let prompt_y = if score.is_some() { 80.0 } else { 50.0 };
    surface.draw_text(
        prompt,
        center + Vec2::new(0.0, prompt_y),
        HUD_FONT,
        TEXT,
        TextAlign::Center,
    );
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fill { rect: Rect, color: Color },
    /// `drawn` is false when the sprite wasn't available
    Image { sprite: String, rect: Rect, drawn: bool },
    Text { text: String, pos: Vec2 },
}

/// Surface that records draw calls instead of drawing (headless runs, tests)
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: Vec2,
    /// Whether image resources count as loaded
    pub images_loaded: bool,
    pub commands: Vec<DrawCommand>,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            images_loaded: true,
            commands: Vec::new(),
        }
    }

    /// All text drawn since the last clear
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn draw_image(&mut self, sprite: Sprite<'_>, rect: Rect) -> bool {
        self.commands.push(DrawCommand::Image {
            sprite: format!("{sprite:?}"),
            rect,
            drawn: self.images_loaded,
        });
        self.images_loaded
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, _font_size: f32, _color: Color, _align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
        });
    }
}
