//! Game settings and tuning
//!
//! Persisted separately from high scores in the key-value store. A stored
//! record that fails to decode or validate is replaced by the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};
use crate::sim::maze::MIN_MAZE_SIZE;
use crate::sim::tuning::MAX_MEMORY_GRID_SIZE;
use crate::sim::{FlightTuning, MazeTuning, MemoryTuning, SnakeTuning, SpawnRule};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("impulse must point upward (negative), got {0}")]
    ImpulseNotUpward(f32),
    #[error("obstacle gap {gap} does not fit above the ground at {floor_y}")]
    GapTooLarge { gap: f32, floor_y: f32 },
    #[error("spawn spacing range is inverted: {min} > {max}")]
    SpacingInverted { min: f32, max: f32 },
    #[error("maze must be at least {min}x{min}, got {width}x{height}")]
    MazeTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    #[error("snake start {0:?} is outside the grid or on an obstacle")]
    SnakeStartBlocked((i32, i32)),
    #[error("memory grid needs at least 2 tiles per side, got {0}")]
    MemoryGridTooSmall(u8),
    #[error("memory grid allows at most {max} tiles per side, got {size}")]
    MemoryGridTooLarge { size: u8, max: u8 },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Tuning ===
    pub flappy: FlightTuning,
    pub runner: FlightTuning,
    pub maze: MazeTuning,
    pub snake: SnakeTuning,
    pub memory: MemoryTuning,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the session high score next to the score
    pub show_high_score: bool,

    // === Accessibility ===
    /// Reduced motion (no body tilt, no flashing)
    pub reduced_motion: bool,
    /// High contrast palette
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flappy: FlightTuning::flappy(),
            runner: FlightTuning::pulse_runner(),
            maze: MazeTuning::default(),
            snake: SnakeTuning::default(),
            memory: MemoryTuning::default(),

            show_fps: false,
            show_high_score: true,

            reduced_motion: false,
            high_contrast: false,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Negative { field, value })
    }
}

fn validate_flight(t: &FlightTuning) -> Result<(), SettingsError> {
    positive("playfield_width", t.playfield_width)?;
    positive("playfield_height", t.playfield_height)?;
    positive("gravity", t.gravity)?;
    positive("obstacle_width", t.obstacle_width)?;
    positive("gap", t.gap)?;
    positive("base_speed", t.base_speed)?;
    non_negative("speed_per_point", t.speed_per_point)?;
    non_negative("max_speed_bonus", t.max_speed_bonus)?;
    if t.impulse >= 0.0 {
        return Err(SettingsError::ImpulseNotUpward(t.impulse));
    }
    if t.gap >= t.floor_y() {
        return Err(SettingsError::GapTooLarge {
            gap: t.gap,
            floor_y: t.floor_y(),
        });
    }
    match t.spawn {
        SpawnRule::Interval { millis } => positive("spawn interval", millis)?,
        SpawnRule::Spacing { min, max } => {
            positive("spawn spacing", min)?;
            if min > max {
                return Err(SettingsError::SpacingInverted { min, max });
            }
        }
    }
    Ok(())
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "calm_arcade_settings";

    /// Reject tuning that would make a game unplayable
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_flight(&self.flappy)?;
        validate_flight(&self.runner)?;

        if self.maze.width < MIN_MAZE_SIZE || self.maze.height < MIN_MAZE_SIZE {
            return Err(SettingsError::MazeTooSmall {
                width: self.maze.width,
                height: self.maze.height,
                min: MIN_MAZE_SIZE,
            });
        }

        positive("snake step", self.snake.step_ms)?;
        let (sx, sy) = self.snake.start;
        let n = self.snake.grid_size;
        if !(0..n).contains(&sx) || !(0..n).contains(&sy) || self.snake.obstacles.contains(&self.snake.start) {
            return Err(SettingsError::SnakeStartBlocked(self.snake.start));
        }

        if self.memory.grid_size < 2 {
            return Err(SettingsError::MemoryGridTooSmall(self.memory.grid_size));
        }
        if self.memory.grid_size > MAX_MEMORY_GRID_SIZE {
            return Err(SettingsError::MemoryGridTooLarge {
                size: self.memory.grid_size,
                max: MAX_MEMORY_GRID_SIZE,
            });
        }
        positive("flash interval", self.memory.flash_interval_ms)?;
        positive("flash duration", self.memory.flash_ms)?;
        Ok(())
    }

    /// Load settings, falling back to defaults on a missing, corrupt or invalid record
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings rejected: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_degenerate_tuning() {
        let mut s = Settings::default();
        s.flappy.impulse = 3.0;
        assert_eq!(s.validate(), Err(SettingsError::ImpulseNotUpward(3.0)));

        let mut s = Settings::default();
        s.runner.spawn = SpawnRule::Spacing { min: 300.0, max: 100.0 };
        assert!(matches!(s.validate(), Err(SettingsError::SpacingInverted { .. })));

        let mut s = Settings::default();
        s.maze.width = 2;
        assert!(matches!(s.validate(), Err(SettingsError::MazeTooSmall { .. })));

        let mut s = Settings::default();
        s.snake.start = (5, 5);
        assert_eq!(s.validate(), Err(SettingsError::SnakeStartBlocked((5, 5))));
    }

    #[test]
    fn test_rejects_oversized_memory_grid() {
        let mut s = Settings::default();
        s.memory.grid_size = 15;
        assert_eq!(s.validate(), Ok(()));
        s.memory.grid_size = 16;
        assert_eq!(
            s.validate(),
            Err(SettingsError::MemoryGridTooLarge { size: 16, max: 15 })
        );

        // A stored oversized grid never reaches the game
        let mut store = MemoryStore::new();
        s.save(&mut store).unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded.memory.grid_size, 3);
        let mut game = crate::sim::MemoryGame::new(1, loaded.memory);
        game.start();
        assert!(game.sequence.iter().all(|&t| t < 9));
    }

    #[test]
    fn test_rejects_negative_speed_terms() {
        let mut s = Settings::default();
        s.flappy.speed_per_point = -1.0;
        assert_eq!(
            s.validate(),
            Err(SettingsError::Negative {
                field: "speed_per_point",
                value: -1.0
            })
        );

        let mut s = Settings::default();
        s.runner.max_speed_bonus = -0.5;
        assert!(matches!(
            s.validate(),
            Err(SettingsError::Negative { field: "max_speed_bonus", .. })
        ));

        // Zero is a constant-speed game, not an error
        let mut s = Settings::default();
        s.flappy.speed_per_point = 0.0;
        s.flappy.max_speed_bonus = 0.0;
        assert_eq!(s.validate(), Ok(()));
        assert!((s.flappy.scroll_speed(100) - s.flappy.base_speed).abs() < 1e-6);
    }

    #[test]
    fn test_load_falls_back_on_invalid_record() {
        let mut store = MemoryStore::new();
        let mut bad = Settings::default();
        bad.flappy.gap = 10_000.0;
        bad.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.reduced_motion = true;
        s.maze.width = 21;
        s.save(&mut store).unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded, s);
    }
}
