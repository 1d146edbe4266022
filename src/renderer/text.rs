//! Plain-text render sink
//!
//! Rasterizes a draw list onto a character grid by sampling each
//! character cell at its center. Used by the native runner and in tests.

use std::convert::Infallible;

use glam::Vec2;

use super::{Color, Palette, RenderSink, Shape};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

pub struct TextSink {
    cols: usize,
    rows: usize,
    glyphs: Vec<(Color, char)>,
    grid: Vec<char>,
    captions: Vec<String>,
}

impl TextSink {
    pub fn new(cols: usize, rows: usize, palette: &Palette) -> Self {
        // Later entries win when two roles share a color
        let glyphs = vec![
            (palette.background, ' '),
            (palette.path, ' '),
            (palette.ground, '='),
            (palette.obstacle, '#'),
            (palette.wall, '#'),
            (palette.exit, 'E'),
            (palette.tile, '.'),
            (palette.tile_lit, 'X'),
            (palette.snake, 'o'),
            (palette.food, '*'),
            (palette.player, '@'),
            (palette.body, '@'),
        ];
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            glyphs,
            grid: vec![' '; cols.max(1) * rows.max(1)],
            captions: Vec::new(),
        }
    }

    fn glyph(&self, color: Color) -> char {
        self.glyphs
            .iter()
            .rev()
            .find(|(c, _)| *c == color)
            .map_or('?', |&(_, g)| g)
    }

    /// Playfield position sampled by character cell (col, row)
    fn sample_point(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * PLAYFIELD_WIDTH / self.cols as f32,
            (row as f32 + 0.5) * PLAYFIELD_HEIGHT / self.rows as f32,
        )
    }

    fn fill(&mut self, glyph: char, covers: impl Fn(Vec2) -> bool) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if covers(self.sample_point(col, row)) {
                    self.grid[row * self.cols + col] = glyph;
                }
            }
        }
    }

    /// Last rendered frame, grid first, then captions
    pub fn output(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.grid.chunks(self.cols) {
            out.extend(row.iter());
            out.push('\n');
        }
        for caption in &self.captions {
            out.push_str(caption);
            out.push('\n');
        }
        out
    }
}

impl RenderSink for TextSink {
    type Error = Infallible;

    fn render(&mut self, shapes: &[Shape]) -> Result<(), Infallible> {
        self.grid.fill(' ');
        self.captions.clear();
        for shape in shapes {
            match shape {
                Shape::Rect { pos, size, color } => {
                    let (min, max) = (*pos, *pos + *size);
                    self.fill(self.glyph(*color), |p| {
                        p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
                    });
                }
                Shape::Circle {
                    center,
                    radius,
                    color,
                }
                | Shape::Body {
                    center,
                    radius,
                    color,
                    ..
                } => {
                    let (center, radius) = (*center, *radius);
                    self.fill(self.glyph(*color), |p| p.distance(center) <= radius);
                }
                Shape::Text { text, .. } => self.captions.push(text.clone()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Hud, Scene, scene_shapes};
    use crate::sim::{GamePhase, MazeSession, MazeTuning};

    #[test]
    fn test_rect_covers_sampled_cells() {
        let palette = Palette::calm();
        let mut sink = TextSink::new(4, 4, &palette);
        let shapes = [Shape::Rect {
            pos: Vec2::ZERO,
            size: Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0),
            color: palette.wall,
        }];
        sink.render(&shapes).unwrap();
        assert_eq!(sink.output(), "##  \n##  \n    \n    \n");
    }

    #[test]
    fn test_unknown_color_is_visible() {
        let palette = Palette::calm();
        let mut sink = TextSink::new(1, 1, &palette);
        let shapes = [Shape::Circle {
            center: Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0),
            radius: 10.0,
            color: [0.1, 0.2, 0.3, 0.4],
        }];
        sink.render(&shapes).unwrap();
        assert_eq!(sink.output(), "?\n");
    }

    #[test]
    fn test_maze_frame_has_walls_player_and_caption() {
        let session = MazeSession::new(12, MazeTuning::default()).unwrap();
        let palette = Palette::calm();
        let hud = Hud {
            score: 0,
            high_score: None,
            fps: None,
            phase: GamePhase::Idle,
            reduced_motion: false,
        };
        // One character per maze cell horizontally
        let mut sink = TextSink::new(15, 20, &palette);
        sink.render(&scene_shapes(&Scene::Maze(&session), &hud, &palette))
            .unwrap();
        let out = sink.output();
        assert!(out.contains('#'));
        assert!(out.contains('@'));
        assert!(out.contains('E'));
        assert!(out.contains("Moves: 0"));
    }
}
