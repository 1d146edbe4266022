//! Rendering module
//!
//! The simulation never draws. Each frame the front end takes a `Scene`
//! snapshot of the active game, flattens it into `Shape`s and hands them to
//! a `RenderSink`: a 2D canvas in the browser, plain text elsewhere.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2dSink;
pub use shapes::{Color, Palette, Shape, scene_shapes};
pub use text::TextSink;

use crate::sim::{FlightSession, GamePhase, MazeSession, MemoryGame, SnakeGame};

/// Read-only view of the active game for one frame
#[derive(Debug, Clone, Copy)]
pub enum Scene<'a> {
    Flight(&'a FlightSession),
    Maze(&'a MazeSession),
    Snake(&'a SnakeGame),
    Memory(&'a MemoryGame),
}

impl Scene<'_> {
    pub fn score_label(&self) -> &'static str {
        match self {
            Scene::Maze(_) => "Moves",
            _ => "Score",
        }
    }
}

/// Overlay values that do not live in the game state
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub high_score: Option<u64>,
    pub fps: Option<f32>,
    pub phase: GamePhase,
    pub reduced_motion: bool,
}

/// Destination for a frame's draw list
pub trait RenderSink {
    type Error;

    fn render(&mut self, shapes: &[Shape]) -> Result<(), Self::Error>;
}
