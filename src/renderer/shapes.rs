//! Draw lists for each game scene
//!
//! Every scene is flattened into a list of primitives in playfield
//! coordinates. Sinks only need to know how to paint a `Shape`.

use glam::Vec2;

use super::{Hud, Scene};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::sim::{Cell, FlightSession, GamePhase, MazeSession, MemoryGame, SnakeGame};

pub type Color = [f32; 4];

/// Colors used by all scenes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub ground: Color,
    pub obstacle: Color,
    pub body: Color,
    pub wall: Color,
    pub path: Color,
    pub exit: Color,
    pub player: Color,
    pub snake: Color,
    pub food: Color,
    pub tile: Color,
    pub tile_lit: Color,
    pub text: Color,
}

impl Palette {
    /// Soft pastel theme
    pub fn calm() -> Self {
        Self {
            background: [0.86, 0.93, 0.96, 1.0],
            ground: [0.72, 0.84, 0.70, 1.0],
            obstacle: [0.55, 0.74, 0.66, 1.0],
            body: [0.98, 0.80, 0.55, 1.0],
            wall: [0.45, 0.55, 0.65, 1.0],
            path: [0.93, 0.96, 0.97, 1.0],
            exit: [0.60, 0.85, 0.65, 1.0],
            player: [0.95, 0.62, 0.55, 1.0],
            snake: [0.50, 0.72, 0.62, 1.0],
            food: [0.96, 0.58, 0.52, 1.0],
            tile: [0.75, 0.80, 0.92, 1.0],
            tile_lit: [0.99, 0.92, 0.60, 1.0],
            text: [0.25, 0.30, 0.38, 1.0],
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            ground: [0.6, 0.6, 0.6, 1.0],
            obstacle: [1.0, 1.0, 1.0, 1.0],
            body: [1.0, 0.9, 0.0, 1.0],
            wall: [1.0, 1.0, 1.0, 1.0],
            path: [0.0, 0.0, 0.0, 1.0],
            exit: [0.0, 1.0, 0.3, 1.0],
            player: [1.0, 0.9, 0.0, 1.0],
            snake: [0.0, 1.0, 0.3, 1.0],
            food: [1.0, 0.2, 0.2, 1.0],
            tile: [0.35, 0.35, 0.35, 1.0],
            tile_lit: [1.0, 1.0, 1.0, 1.0],
            text: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn for_contrast(high_contrast: bool) -> Self {
        if high_contrast {
            Self::high_contrast()
        } else {
            Self::calm()
        }
    }
}

/// Drawing primitive in playfield coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Tilted oval for the flying body
    Body {
        center: Vec2,
        radius: f32,
        rotation: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
}

fn rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> Shape {
    Shape::Rect {
        pos: Vec2::new(x, y),
        size: Vec2::new(w, h),
        color,
    }
}

/// Build the full draw list for a frame
pub fn scene_shapes(scene: &Scene<'_>, hud: &Hud, palette: &Palette) -> Vec<Shape> {
    let mut shapes = match scene {
        Scene::Flight(session) => flight(session, hud, palette),
        Scene::Maze(session) => maze(session, palette),
        Scene::Snake(game) => snake(game, palette),
        Scene::Memory(game) => memory(game, palette),
    };
    shapes.extend(hud_shapes(scene, hud, palette));
    shapes
}

fn flight(session: &FlightSession, hud: &Hud, palette: &Palette) -> Vec<Shape> {
    let t = &session.tuning;
    let floor_y = t.floor_y();
    let mut shapes = Vec::with_capacity(3 + session.obstacles.len() * 2);

    shapes.push(rect(
        0.0,
        0.0,
        t.playfield_width,
        t.playfield_height,
        palette.background,
    ));

    for obstacle in &session.obstacles {
        for b in obstacle.boxes(t.gap, t.obstacle_width, floor_y) {
            shapes.push(rect(b.x, b.y, b.w, b.h, palette.obstacle));
        }
    }

    shapes.push(rect(0.0, floor_y, t.playfield_width, t.ground_height, palette.ground));

    let rotation = if hud.reduced_motion {
        0.0
    } else {
        session.body.rotation
    };
    shapes.push(Shape::Body {
        center: session.body.pos,
        radius: session.body.radius,
        rotation,
        color: palette.body,
    });
    shapes
}

/// Side of a square board cell so that `cols x rows` fits the playfield
fn board_cell(cols: usize, rows: usize) -> f32 {
    (PLAYFIELD_WIDTH / cols.max(1) as f32).min(PLAYFIELD_HEIGHT / rows.max(1) as f32)
}

fn maze(session: &MazeSession, palette: &Palette) -> Vec<Shape> {
    let m = &session.maze;
    let cell = board_cell(m.width, m.height);
    let mut shapes = Vec::with_capacity(m.width * m.height + 2);
    shapes.push(rect(0.0, 0.0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT, palette.background));

    for (y, row) in m.rows().enumerate() {
        for (x, c) in row.iter().enumerate() {
            let color = match c {
                Cell::Wall => palette.wall,
                Cell::Path | Cell::Start => palette.path,
                Cell::Exit => palette.exit,
            };
            shapes.push(rect(x as f32 * cell, y as f32 * cell, cell, cell, color));
        }
    }

    let (px, py) = session.player;
    shapes.push(Shape::Circle {
        center: Vec2::new((px as f32 + 0.5) * cell, (py as f32 + 0.5) * cell),
        radius: cell * 0.35,
        color: palette.player,
    });
    shapes
}

fn snake(game: &SnakeGame, palette: &Palette) -> Vec<Shape> {
    let n = game.tuning.grid_size.max(1) as usize;
    let cell = board_cell(n, n);
    let mut shapes = Vec::with_capacity(game.body.len() + game.tuning.obstacles.len() + 2);
    shapes.push(rect(0.0, 0.0, cell * n as f32, cell * n as f32, palette.path));

    for &(x, y) in &game.tuning.obstacles {
        shapes.push(rect(x as f32 * cell, y as f32 * cell, cell, cell, palette.wall));
    }
    for &(x, y) in &game.body {
        // 1px inset so segments read as separate blocks
        shapes.push(rect(
            x as f32 * cell + 1.0,
            y as f32 * cell + 1.0,
            cell - 2.0,
            cell - 2.0,
            palette.snake,
        ));
    }
    if let Some((x, y)) = game.food {
        shapes.push(Shape::Circle {
            center: Vec2::new((x as f32 + 0.5) * cell, (y as f32 + 0.5) * cell),
            radius: cell * 0.4,
            color: palette.food,
        });
    }
    shapes
}

fn memory(game: &MemoryGame, palette: &Palette) -> Vec<Shape> {
    let n = game.tuning.grid_size.max(1) as usize;
    let cell = board_cell(n, n);
    let gap = cell * 0.08;
    let lit = game.lit_tile();
    let mut shapes = Vec::with_capacity(n * n + 1);
    shapes.push(rect(0.0, 0.0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT, palette.background));

    for i in 0..n * n {
        let (x, y) = ((i % n) as f32, (i / n) as f32);
        let color = if lit == Some(i as u8) {
            palette.tile_lit
        } else {
            palette.tile
        };
        shapes.push(rect(
            x * cell + gap,
            y * cell + gap,
            cell - 2.0 * gap,
            cell - 2.0 * gap,
            color,
        ));
    }
    shapes
}

fn hud_shapes(scene: &Scene<'_>, hud: &Hud, palette: &Palette) -> Vec<Shape> {
    let mut shapes = Vec::new();
    let mut line = |y: f32, text: String, size: f32| {
        shapes.push(Shape::Text {
            pos: Vec2::new(12.0, y),
            text,
            size,
            color: palette.text,
        })
    };

    line(28.0, format!("{}: {}", scene.score_label(), hud.score), 22.0);
    let mut y = 52.0;
    if let Some(best) = hud.high_score {
        line(y, format!("Best: {best}"), 16.0);
        y += 20.0;
    }
    if let Some(fps) = hud.fps {
        line(y, format!("{fps:.0} fps"), 14.0);
    }

    let prompt = match (hud.phase, scene) {
        (GamePhase::Idle, Scene::Maze(_) | Scene::Snake(_)) => Some("Use the arrow keys to begin"),
        (GamePhase::Idle, _) => Some("Tap or press space to begin"),
        (GamePhase::Over, Scene::Maze(_)) => Some("You found the way out. Press R for a new maze"),
        (GamePhase::Over, _) => Some("Take a breath. Tap to play again"),
        (GamePhase::Running, _) => None,
    };
    if let Some(prompt) = prompt {
        line(PLAYFIELD_HEIGHT * 0.5, prompt.to_string(), 20.0);
    }
    shapes
}
