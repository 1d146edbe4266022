//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names and taps mapped to game commands)
//! - Game selection from the page URL
//! - Calendar day for the check-in streak

use serde::{Deserialize, Serialize};

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::highscores::GameKind;
use crate::sim::Direction;

/// Discrete input delivered to the active game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Flap / jump / start
    Impulse,
    Move(Direction),
    Restart,
    /// Memory grid tile (row-major index)
    Tap(u8),
}

/// Map a `KeyboardEvent.key` value to an input
pub fn map_key(key: &str) -> Option<InputEvent> {
    match key {
        " " | "Spacebar" | "Enter" => Some(InputEvent::Impulse),
        "ArrowUp" | "w" | "W" => Some(InputEvent::Move(Direction::Up)),
        "ArrowDown" | "s" | "S" => Some(InputEvent::Move(Direction::Down)),
        "ArrowLeft" | "a" | "A" => Some(InputEvent::Move(Direction::Left)),
        "ArrowRight" | "d" | "D" => Some(InputEvent::Move(Direction::Right)),
        "r" | "R" => Some(InputEvent::Restart),
        _ => {
            // Number keys 1-9 address memory tiles
            let digit = key.parse::<u8>().ok()?;
            (1..=9).contains(&digit).then(|| InputEvent::Tap(digit - 1))
        }
    }
}

/// Which mini-game the page hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameChoice {
    #[default]
    Flappy,
    Runner,
    Maze,
    Snake,
    Memory,
}

impl GameChoice {
    /// Parse a location hash such as `#maze`
    pub fn from_hash(hash: &str) -> Self {
        match hash.trim_start_matches('#').to_lowercase().as_str() {
            "runner" | "pulserunner" | "pulse-runner" => GameChoice::Runner,
            "maze" | "mindful-maze" => GameChoice::Maze,
            "snake" | "serene-serpent" => GameChoice::Snake,
            "memory" | "memory-grid" => GameChoice::Memory,
            _ => GameChoice::Flappy,
        }
    }

    /// Leaderboard the game reports to (the maze keeps only a best move count)
    pub fn game_kind(self) -> Option<GameKind> {
        match self {
            GameChoice::Flappy => Some(GameKind::Flappy),
            GameChoice::Runner => Some(GameKind::PulseRunner),
            GameChoice::Snake => Some(GameKind::Snake),
            GameChoice::Memory => Some(GameKind::MemoryGrid),
            GameChoice::Maze => None,
        }
    }
}

/// Memory tile under a playfield point, for pointer taps
pub fn tile_at(x: f32, y: f32, grid_size: u8) -> Option<u8> {
    let n = grid_size.max(1) as f32;
    let cell = (PLAYFIELD_WIDTH / n).min(PLAYFIELD_HEIGHT / n);
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let (col, row) = ((x / cell) as u32, (y / cell) as u32);
    if col >= grid_size as u32 || row >= grid_size as u32 {
        return None;
    }
    Some((row * grid_size as u32 + col) as u8)
}

const MS_PER_DAY: f64 = 86_400_000.0;

/// Whole days since the Unix epoch, rolling over at local midnight
#[cfg(target_arch = "wasm32")]
pub fn today() -> u32 {
    let date = js_sys::Date::new_0();
    // Shift to local time so the day rolls over at local midnight
    let local_ms = date.get_time() - date.get_timezone_offset() * 60_000.0;
    (local_ms / MS_PER_DAY).floor() as u32
}

/// Whole days since the Unix epoch in UTC
///
/// std has no time zone database, so the native build rolls over at UTC
/// midnight.
#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> u32 {
    let ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    (ms / MS_PER_DAY).floor() as u32
}

/// Wall-clock milliseconds for timestamps and seeds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(" "), Some(InputEvent::Impulse));
        assert_eq!(map_key("ArrowLeft"), Some(InputEvent::Move(Direction::Left)));
        assert_eq!(map_key("R"), Some(InputEvent::Restart));
        assert_eq!(map_key("1"), Some(InputEvent::Tap(0)));
        assert_eq!(map_key("9"), Some(InputEvent::Tap(8)));
        assert_eq!(map_key("0"), None);
        assert_eq!(map_key("Shift"), None);
    }

    #[test]
    fn test_game_choice_from_hash() {
        assert_eq!(GameChoice::from_hash("#maze"), GameChoice::Maze);
        assert_eq!(GameChoice::from_hash("#Pulse-Runner"), GameChoice::Runner);
        assert_eq!(GameChoice::from_hash(""), GameChoice::Flappy);
    }

    #[test]
    fn test_tile_at_maps_board_cells() {
        // 3x3 board of 160px cells
        assert_eq!(tile_at(10.0, 10.0, 3), Some(0));
        assert_eq!(tile_at(170.0, 10.0, 3), Some(1));
        assert_eq!(tile_at(470.0, 470.0, 3), Some(8));
        assert_eq!(tile_at(10.0, 500.0, 3), None);
        assert_eq!(tile_at(-1.0, 10.0, 3), None);
    }

    #[test]
    fn test_today_is_after_2020() {
        // 2020-01-01 is day 18262
        assert!(today() > 18_262);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_day_is_utc_epoch_day() {
        let before = (now_ms() / MS_PER_DAY).floor() as u32;
        let day = today();
        let after = (now_ms() / MS_PER_DAY).floor() as u32;
        assert!(before <= day && day <= after);
    }
}
