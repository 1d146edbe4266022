//! High score leaderboards, one per game
//!
//! Persisted through a `KeyValueStore`, tracks the top 10 scores per game.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Games that keep a leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Flappy,
    PulseRunner,
    Snake,
    MemoryGrid,
}

impl GameKind {
    pub fn storage_key(&self) -> &'static str {
        match self {
            GameKind::Flappy => "calm_arcade_highscores_flappy",
            GameKind::PulseRunner => "calm_arcade_highscores_runner",
            GameKind::Snake => "calm_arcade_highscores_snake",
            GameKind::MemoryGrid => "calm_arcade_highscores_memory",
        }
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard (sorted descending by score)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, timestamp };

        // Ties keep the older entry ahead
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a game's leaderboard, starting fresh on a missing or corrupt record
    pub fn load(store: &dyn KeyValueStore, game: GameKind) -> Self {
        match load_json::<HighScores>(store, game.storage_key()) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores for {:?}", scores.entries.len(), game);
                scores
            }
            Ok(None) => {
                log::info!("No high scores for {:?}, starting fresh", game);
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding high scores for {:?}: {e}", game);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore, game: GameKind) -> Result<(), StoreError> {
        save_json(store, game.storage_key(), self)?;
        log::info!("High scores saved for {:?} ({} entries)", game, self.entries.len());
        Ok(())
    }
}
