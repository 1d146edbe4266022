//! Calm Arcade - deterministic mini-games for a wellness app
//!
//! Core modules:
//! - `arcade`: The active game, input routing and finished-run reporting
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, maze, snake, memory grid)
//! - `renderer`: Render sinks consuming per-frame scene snapshots
//! - `platform`: Input mapping and browser/native differences
//! - `persistence`: Key-value storage and the daily check-in streak
//! - `assist`: Validated boundary to the external completion service

pub mod arcade;
pub mod assist;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::{GameKind, HighScores};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (physics constants are expressed per step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds covered by one simulation step
    pub const STEP_MS: f32 = SIM_DT * 1000.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap a single frame may feed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Flight playfield (canvas) dimensions
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 640.0;
    /// Ground strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 80.0;

    /// Body defaults
    pub const BODY_START_X: f32 = 110.0;
    pub const BODY_RADIUS: f32 = 16.0;

    /// Physics defaults (per step)
    pub const GRAVITY: f32 = 0.45;
    pub const IMPULSE_VELOCITY: f32 = -8.5;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_GAP: f32 = 150.0;
    /// Keep-out band above and below the gap when placing it
    pub const GAP_MARGIN: f32 = 60.0;
    pub const SPAWN_INTERVAL_MS: f32 = 1400.0;
}
