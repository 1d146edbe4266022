//! Grid snake with fixed obstacles
//!
//! The snake advances one cell per `step_ms` of accumulated time. Turns are
//! queued and applied at the start of the next step, so a burst of key
//! presses between steps can never fold the snake back onto itself.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::state::{GamePhase, RngState};
use super::tuning::SnakeTuning;

pub type Point = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeCrash {
    Wall,
    Itself,
    Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeEvent {
    Ate { score: u64 },
    Crashed(SnakeCrash),
    /// No free cell left for food
    BoardFull,
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    pub rng_state: RngState,
    pub tuning: SnakeTuning,
    pub phase: GamePhase,
    /// Head first
    pub body: VecDeque<Point>,
    pub direction: Direction,
    pending: Option<Direction>,
    pub food: Option<Point>,
    pub score: u64,
    pub high_score: u64,
    since_step_ms: f32,
    rng: Pcg32,
}

impl SnakeGame {
    pub fn new(seed: u64, tuning: SnakeTuning) -> Self {
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        let mut game = Self {
            rng_state,
            body: VecDeque::from([tuning.start]),
            tuning,
            phase: GamePhase::Idle,
            direction: Direction::Up,
            pending: None,
            food: None,
            score: 0,
            high_score: 0,
            since_step_ms: 0.0,
            rng,
        };
        game.food = game.random_free_cell();
        game
    }

    pub fn head(&self) -> Point {
        self.body.front().copied().unwrap_or(self.tuning.start)
    }

    pub fn in_bounds(&self, (x, y): Point) -> bool {
        let n = self.tuning.grid_size;
        (0..n).contains(&x) && (0..n).contains(&y)
    }

    pub fn is_obstacle(&self, p: Point) -> bool {
        self.tuning.obstacles.contains(&p)
    }

    /// Queue a turn; the first turn also starts the game
    ///
    /// Turns along the current axis (reversals included) are ignored.
    pub fn turn(&mut self, dir: Direction) {
        match self.phase {
            GamePhase::Over => return,
            GamePhase::Idle => self.phase = GamePhase::Running,
            GamePhase::Running => {}
        }
        if !dir.same_axis(self.direction) {
            self.pending = Some(dir);
        }
    }

    /// Start moving in the current direction without turning
    pub fn start(&mut self) {
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::Running;
        }
    }

    /// Feed elapsed time; runs every step that has come due
    pub fn tick(&mut self, elapsed_ms: f32) -> Vec<SnakeEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Running {
            return events;
        }
        self.since_step_ms += elapsed_ms;
        while self.since_step_ms >= self.tuning.step_ms && self.phase == GamePhase::Running {
            self.since_step_ms -= self.tuning.step_ms;
            events.extend(self.step());
        }
        events
    }

    /// Advance exactly one cell
    pub fn step(&mut self) -> Option<SnakeEvent> {
        if self.phase != GamePhase::Running {
            return None;
        }
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }

        let (hx, hy) = self.head();
        let (dx, dy) = self.direction.delta();
        let next = (hx + dx, hy + dy);

        let crash = if !self.in_bounds(next) {
            Some(SnakeCrash::Wall)
        } else if self.body.contains(&next) {
            Some(SnakeCrash::Itself)
        } else if self.is_obstacle(next) {
            Some(SnakeCrash::Obstacle)
        } else {
            None
        };
        if let Some(crash) = crash {
            self.phase = GamePhase::Over;
            return Some(SnakeEvent::Crashed(crash));
        }

        self.body.push_front(next);
        if self.food == Some(next) {
            self.score += self.tuning.points_per_food;
            self.high_score = self.high_score.max(self.score);
            self.food = self.random_free_cell();
            if self.food.is_none() {
                self.phase = GamePhase::Over;
                return Some(SnakeEvent::BoardFull);
            }
            return Some(SnakeEvent::Ate { score: self.score });
        }
        self.body.pop_back();
        None
    }

    /// Uniform pick among cells not covered by the snake or an obstacle
    fn random_free_cell(&mut self) -> Option<Point> {
        let n = self.tuning.grid_size;
        let free: Vec<Point> = (0..n)
            .flat_map(|y| (0..n).map(move |x| (x, y)))
            .filter(|p| !self.body.contains(p) && !self.is_obstacle(*p))
            .collect();
        if free.is_empty() {
            None
        } else {
            Some(free[self.rng.random_range(0..free.len())])
        }
    }

    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.body = VecDeque::from([self.tuning.start]);
        self.direction = Direction::Up;
        self.pending = None;
        self.score = 0;
        self.since_step_ms = 0.0;
        self.food = self.random_free_cell();
    }
}
