//! Data-driven game balance
//!
//! Every knob the simulations read lives here so presets can be persisted
//! in `Settings` and swapped without touching the tick code.

use serde::{Deserialize, Serialize};

use super::obstacle::SpawnRule;
use crate::consts::*;

/// Tuning for the gravity/impulse games (flappy, pulse runner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightTuning {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub ground_height: f32,
    /// Velocity added per step
    pub gravity: f32,
    /// Velocity set by an impulse (negative = upward)
    pub impulse: f32,
    pub obstacle_width: f32,
    pub gap: f32,
    pub gap_margin: f32,
    pub spawn: SpawnRule,
    /// Obstacle scroll speed per step at score 0
    pub base_speed: f32,
    /// Extra scroll speed per point scored
    pub speed_per_point: f32,
    /// Cap on the score-driven speed bonus
    pub max_speed_bonus: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self::flappy()
    }
}

impl FlightTuning {
    /// Pipes on a fixed timer
    pub fn flappy() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,
            gravity: GRAVITY,
            impulse: IMPULSE_VELOCITY,
            obstacle_width: OBSTACLE_WIDTH,
            gap: OBSTACLE_GAP,
            gap_margin: GAP_MARGIN,
            spawn: SpawnRule::Interval {
                millis: SPAWN_INTERVAL_MS,
            },
            base_speed: 2.2,
            speed_per_point: 0.03,
            max_speed_bonus: 2.0,
        }
    }

    /// Same physics, but obstacles arrive at randomized distances
    pub fn pulse_runner() -> Self {
        Self {
            spawn: SpawnRule::Spacing {
                min: 220.0,
                max: 320.0,
            },
            ..Self::flappy()
        }
    }

    /// Top of the ground strip
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.playfield_height - self.ground_height
    }

    /// Scroll speed for the current score
    pub fn scroll_speed(&self, score: u64) -> f32 {
        self.base_speed + (score as f32 * self.speed_per_point).min(self.max_speed_bonus)
    }
}

/// Tuning for the maze game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeTuning {
    pub width: usize,
    pub height: usize,
}

impl Default for MazeTuning {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
        }
    }
}

/// Tuning for the snake game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeTuning {
    pub grid_size: i32,
    pub step_ms: f32,
    pub start: (i32, i32),
    pub obstacles: Vec<(i32, i32)>,
    pub points_per_food: u64,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            grid_size: 20,
            step_ms: 200.0,
            start: (10, 10),
            obstacles: vec![(5, 5), (15, 15), (5, 15), (15, 5)],
            points_per_food: 10,
        }
    }
}

/// Largest memory grid whose tile indices fit in a `u8`
pub const MAX_MEMORY_GRID_SIZE: u8 = 15;

/// Tuning for the memory grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryTuning {
    /// Tiles per side
    pub grid_size: u8,
    /// Spacing between successive tile flashes
    pub flash_interval_ms: f32,
    /// How long each tile stays lit
    pub flash_ms: f32,
    /// Pause between a completed level and the next playback
    pub intermission_ms: f32,
    pub points_per_tap: u64,
    pub level_bonus: u64,
}

impl Default for MemoryTuning {
    fn default() -> Self {
        Self {
            grid_size: 3,
            flash_interval_ms: 700.0,
            flash_ms: 400.0,
            intermission_ms: 1000.0,
            points_per_tap: 10,
            level_bonus: 50,
        }
    }
}

impl MemoryTuning {
    /// Tiles on the board; the side is clamped to `1..=MAX_MEMORY_GRID_SIZE`
    pub fn tile_count(&self) -> u8 {
        let n = self.grid_size.clamp(1, MAX_MEMORY_GRID_SIZE);
        n * n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_speed_bonus_is_capped() {
        let t = FlightTuning::flappy();
        assert!((t.scroll_speed(0) - 2.2).abs() < 1e-6);
        assert!((t.scroll_speed(10) - 2.5).abs() < 1e-5);
        assert!((t.scroll_speed(1000) - 4.2).abs() < 1e-5);
    }

    #[test]
    fn test_tile_count_never_overflows() {
        let mut t = MemoryTuning::default();
        assert_eq!(t.tile_count(), 9);
        t.grid_size = 16;
        assert_eq!(t.tile_count(), 225);
        t.grid_size = u8::MAX;
        assert_eq!(t.tile_count(), 225);
        t.grid_size = 0;
        assert_eq!(t.tile_count(), 1);
    }

    #[test]
    fn test_runner_shares_physics() {
        let flappy = FlightTuning::flappy();
        let runner = FlightTuning::pulse_runner();
        assert_eq!(flappy.gravity, runner.gravity);
        assert_eq!(flappy.impulse, runner.impulse);
        assert!(matches!(runner.spawn, SpawnRule::Spacing { .. }));
        assert_eq!(flappy.floor_y(), 560.0);
    }
}
