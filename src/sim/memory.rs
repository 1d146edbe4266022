//! Memory grid: watch a growing tile sequence, then repeat it
//!
//! Playback timing is driven by `tick` so the whole game stays a pure
//! function of (seed, elapsed time, taps).

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, RngState};
use super::tuning::MemoryTuning;

/// Sub-stage of a running game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stage {
    /// Sequence playback; taps are ignored
    Watching { elapsed_ms: f32 },
    /// Waiting for the player to repeat the sequence
    Repeating,
    /// Short pause after a completed level
    Intermission { elapsed_ms: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapOutcome {
    Ignored,
    Correct,
    LevelComplete { level: u32 },
    Wrong,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    pub rng_state: RngState,
    pub tuning: MemoryTuning,
    pub phase: GamePhase,
    pub stage: Stage,
    pub sequence: Vec<u8>,
    /// How much of the sequence the player has repeated this level
    pub progress: usize,
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    rng: Pcg32,
}

impl MemoryGame {
    pub fn new(seed: u64, tuning: MemoryTuning) -> Self {
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        Self {
            rng_state,
            tuning,
            phase: GamePhase::Idle,
            stage: Stage::Repeating,
            sequence: Vec::new(),
            progress: 0,
            level: 1,
            score: 0,
            high_score: 0,
            rng,
        }
    }

    /// Begin a new game (from Idle or after a game over)
    pub fn start(&mut self) {
        if self.phase == GamePhase::Running {
            return;
        }
        self.sequence.clear();
        self.level = 1;
        self.score = 0;
        self.phase = GamePhase::Running;
        self.next_level();
    }

    /// Back to the start screen; the high score survives
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.stage = Stage::Repeating;
        self.sequence.clear();
        self.progress = 0;
        self.level = 1;
        self.score = 0;
    }

    fn next_level(&mut self) {
        let tile = self.rng.random_range(0..self.tuning.tile_count());
        self.sequence.push(tile);
        self.progress = 0;
        self.stage = Stage::Watching { elapsed_ms: 0.0 };
    }

    /// Time at which the last tile of the playback goes dark
    fn playback_ms(&self) -> f32 {
        self.sequence.len() as f32 * self.tuning.flash_interval_ms + self.tuning.flash_ms
    }

    /// Tile currently lit during playback
    pub fn lit_tile(&self) -> Option<u8> {
        let Stage::Watching { elapsed_ms } = self.stage else {
            return None;
        };
        self.sequence.iter().enumerate().find_map(|(i, &tile)| {
            let on = (i + 1) as f32 * self.tuning.flash_interval_ms;
            (elapsed_ms >= on && elapsed_ms < on + self.tuning.flash_ms).then_some(tile)
        })
    }

    pub fn tick(&mut self, elapsed: f32) {
        if self.phase != GamePhase::Running {
            return;
        }
        match self.stage {
            Stage::Watching { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + elapsed;
                self.stage = if elapsed_ms >= self.playback_ms() {
                    Stage::Repeating
                } else {
                    Stage::Watching { elapsed_ms }
                };
            }
            Stage::Intermission { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + elapsed;
                if elapsed_ms >= self.tuning.intermission_ms {
                    self.next_level();
                } else {
                    self.stage = Stage::Intermission { elapsed_ms };
                }
            }
            Stage::Repeating => {}
        }
    }

    pub fn tap(&mut self, tile: u8) -> TapOutcome {
        if self.phase != GamePhase::Running || self.stage != Stage::Repeating {
            return TapOutcome::Ignored;
        }

        if self.sequence.get(self.progress) != Some(&tile) {
            self.phase = GamePhase::Over;
            self.high_score = self.high_score.max(self.score);
            return TapOutcome::Wrong;
        }

        self.progress += 1;
        self.score += self.tuning.points_per_tap;

        if self.progress == self.sequence.len() {
            self.score += self.tuning.level_bonus;
            self.level += 1;
            self.high_score = self.high_score.max(self.score);
            self.stage = Stage::Intermission { elapsed_ms: 0.0 };
            return TapOutcome::LevelComplete { level: self.level };
        }
        TapOutcome::Correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> MemoryGame {
        let mut g = MemoryGame::new(31, MemoryTuning::default());
        g.start();
        g
    }

    #[test]
    fn test_playback_lights_tiles_in_order() {
        let mut g = started();
        assert_eq!(g.sequence.len(), 1);
        assert_eq!(g.lit_tile(), None);
        g.tick(700.0);
        assert_eq!(g.lit_tile(), Some(g.sequence[0]));
        g.tick(399.0);
        assert_eq!(g.lit_tile(), Some(g.sequence[0]));
        g.tick(1.0);
        assert_eq!(g.stage, Stage::Repeating);
        assert_eq!(g.lit_tile(), None);
    }

    #[test]
    fn test_taps_ignored_while_watching() {
        let mut g = started();
        let tile = g.sequence[0];
        assert_eq!(g.tap(tile), TapOutcome::Ignored);
        assert_eq!(g.score, 0);
    }

    #[test]
    fn test_level_completion_scores_and_grows() {
        let mut g = started();
        g.tick(1100.0);
        let tile = g.sequence[0];
        assert_eq!(g.tap(tile), TapOutcome::LevelComplete { level: 2 });
        assert_eq!(g.score, 60);

        g.tick(999.0);
        assert_eq!(g.sequence.len(), 1);
        g.tick(1.0);
        assert_eq!(g.sequence.len(), 2);
        assert!(matches!(g.stage, Stage::Watching { .. }));

        g.tick(2 as f32 * 700.0 + 400.0);
        assert_eq!(g.stage, Stage::Repeating);
        let seq = g.sequence.clone();
        assert_eq!(g.tap(seq[0]), TapOutcome::Correct);
        assert_eq!(g.tap(seq[1]), TapOutcome::LevelComplete { level: 3 });
        assert_eq!(g.score, 60 + 2 * 10 + 50);
    }

    #[test]
    fn test_wrong_tap_ends_game() {
        let mut g = started();
        g.tick(1100.0);
        let wrong = (g.sequence[0] + 1) % 9;
        assert_eq!(g.tap(wrong), TapOutcome::Wrong);
        assert_eq!(g.phase, GamePhase::Over);
        assert_eq!(g.tap(g.sequence[0]), TapOutcome::Ignored);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut g = started();
        g.tick(1100.0);
        let tile = g.sequence[0];
        g.tap(tile);
        g.tick(1000.0);
        g.tick(1800.0);
        g.tap((g.sequence[0] + 1) % 9);
        assert_eq!(g.high_score, 60);

        g.start();
        assert_eq!(g.phase, GamePhase::Running);
        assert_eq!(g.level, 1);
        assert_eq!(g.score, 0);
        assert_eq!(g.sequence.len(), 1);
        assert_eq!(g.high_score, 60);
    }

    #[test]
    fn test_tiles_within_grid() {
        let mut g = MemoryGame::new(5, MemoryTuning::default());
        for _ in 0..100 {
            g.next_level();
        }
        assert!(g.sequence.iter().all(|&t| t < 9));
    }
}
