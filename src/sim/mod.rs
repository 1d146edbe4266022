//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order / row-major)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod direction;
pub mod maze;
pub mod memory;
pub mod obstacle;
pub mod snake;
pub mod state;
pub mod tick;
pub mod tuning;

pub use body::Body;
pub use collision::{Aabb, Collision, bounds_collision, obstacle_collision};
pub use direction::Direction;
pub use maze::{Cell, Maze, MazeError, MazeSession, MoveOutcome};
pub use memory::{MemoryGame, Stage, TapOutcome};
pub use obstacle::{Obstacle, SpawnRule, Spawner};
pub use snake::{SnakeCrash, SnakeEvent, SnakeGame};
pub use state::{FlightEvent, FlightSession, GamePhase, RngState};
pub use tick::{FrameClock, TickInput, tick};
pub use tuning::{FlightTuning, MazeTuning, MemoryTuning, SnakeTuning};
