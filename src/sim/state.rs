//! Session state shared by the flight games
//!
//! A session owns the body, the obstacle stream and the score. It is
//! created idle, mutated once per step while running, and reset in place.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::Collision;
use super::obstacle::{Obstacle, Spawner, random_gap_top};
use super::tuning::FlightTuning;

/// Lifecycle shared by every mini-game: `Idle -> Running -> Over -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended, waiting for a reset
    Over,
}

/// Something the front end may want to react to (sounds, saves, logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightEvent {
    Started,
    Impulse,
    Scored { score: u64 },
    Crashed(Collision),
    Reset,
}

/// RNG state wrapper so sessions can be recreated from their seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete state of one flappy / pulse-runner session
#[derive(Debug, Clone)]
pub struct FlightSession {
    pub rng_state: RngState,
    pub tuning: FlightTuning,
    pub phase: GamePhase,
    pub body: Body,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub spawner: Spawner,
    pub score: u64,
    /// Best score seen by this session object (survives resets)
    pub high_score: u64,
    /// Steps simulated while running
    pub time_ticks: u64,
    /// What ended the last run
    pub collision: Option<Collision>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl FlightSession {
    pub fn new(seed: u64, tuning: FlightTuning) -> Self {
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        Self {
            body: Body::spawn(tuning.playfield_height),
            spawner: Spawner::new(tuning.spawn),
            rng_state,
            tuning,
            phase: GamePhase::Idle,
            obstacles: Vec::new(),
            score: 0,
            high_score: 0,
            time_ticks: 0,
            collision: None,
            rng,
            next_id: 1,
        }
    }

    /// Return every per-run field to its initial value
    ///
    /// The RNG keeps running so the next run sees a different obstacle stream.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.body = Body::spawn(self.tuning.playfield_height);
        self.obstacles.clear();
        self.spawner.reset();
        self.score = 0;
        self.time_ticks = 0;
        self.collision = None;
        self.next_id = 1;
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an obstacle at the right edge with a random gap
    pub fn spawn_obstacle(&mut self) {
        let id = self.next_entity_id();
        let gap_top = random_gap_top(
            &mut self.rng,
            self.tuning.floor_y(),
            self.tuning.gap,
            self.tuning.gap_margin,
        );
        self.obstacles
            .push(Obstacle::new(id, self.tuning.playfield_width, gap_top));
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let s = FlightSession::new(42, FlightTuning::flappy());
        assert_eq!(s.phase, GamePhase::Idle);
        assert!(s.obstacles.is_empty());
        assert_eq!(s.score, 0);
        assert_eq!(s.body.pos.y, 320.0);
    }

    #[test]
    fn test_spawned_obstacles_enter_at_right_edge_in_order() {
        let mut s = FlightSession::new(42, FlightTuning::flappy());
        s.spawn_obstacle();
        s.spawn_obstacle();
        assert_eq!(s.obstacles[0].id, 1);
        assert_eq!(s.obstacles[1].id, 2);
        assert!(s.obstacles.iter().all(|o| o.x == 480.0 && !o.passed));
    }
}
