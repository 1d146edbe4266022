//! The active mini-game behind a single canvas
//!
//! Owns one game session, buffers discrete input between frames, and drives
//! the session with a whole number of fixed steps per frame. Front ends
//! (browser loop, headless runner) only talk to this type.

use crate::consts::*;
use crate::highscores::GameKind;
use crate::platform::{GameChoice, InputEvent};
use crate::renderer::Scene;
use crate::settings::Settings;
use crate::sim::{
    FlightEvent, FlightSession, GamePhase, MazeError, MazeSession, MemoryGame, MoveOutcome,
    SnakeGame, TickInput, tick,
};

pub enum ActiveGame {
    Flight {
        kind: GameKind,
        session: FlightSession,
        /// One-shot input waiting for the next step
        pending: TickInput,
    },
    Maze(MazeSession),
    Snake(SnakeGame),
    Memory(MemoryGame),
}

/// A finished run worth offering to the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunEnded {
    pub game: GameKind,
    pub score: u64,
}

pub struct Arcade {
    pub game: ActiveGame,
    last_phase: GamePhase,
}

impl Arcade {
    pub fn new(choice: GameChoice, seed: u64, settings: &Settings) -> Result<Self, MazeError> {
        let game = match choice {
            GameChoice::Flappy => ActiveGame::Flight {
                kind: GameKind::Flappy,
                session: FlightSession::new(seed, settings.flappy.clone()),
                pending: TickInput::default(),
            },
            GameChoice::Runner => ActiveGame::Flight {
                kind: GameKind::PulseRunner,
                session: FlightSession::new(seed, settings.runner.clone()),
                pending: TickInput::default(),
            },
            GameChoice::Maze => ActiveGame::Maze(MazeSession::new(seed, settings.maze)?),
            GameChoice::Snake => ActiveGame::Snake(SnakeGame::new(seed, settings.snake.clone())),
            GameChoice::Memory => ActiveGame::Memory(MemoryGame::new(seed, settings.memory)),
        };
        log::info!("Started {:?} with seed {}", choice, seed);
        Ok(Self {
            game,
            last_phase: GamePhase::Idle,
        })
    }

    pub fn phase(&self) -> GamePhase {
        match &self.game {
            ActiveGame::Flight { session, .. } => session.phase,
            ActiveGame::Maze(m) => m.phase,
            ActiveGame::Snake(s) => s.phase,
            ActiveGame::Memory(m) => m.phase,
        }
    }

    pub fn score(&self) -> u64 {
        match &self.game {
            ActiveGame::Flight { session, .. } => session.score,
            ActiveGame::Maze(m) => m.moves,
            ActiveGame::Snake(s) => s.score,
            ActiveGame::Memory(m) => m.score,
        }
    }

    /// Apply a discrete input
    ///
    /// Flight input is buffered and consumed by the next step; grid games
    /// react immediately since they have no physics to interleave with.
    pub fn handle(&mut self, event: InputEvent) -> Option<RunEnded> {
        match &mut self.game {
            ActiveGame::Flight { pending, .. } => match event {
                InputEvent::Impulse | InputEvent::Tap(_) | InputEvent::Move(_) => {
                    pending.impulse = true
                }
                InputEvent::Restart => pending.restart = true,
            },
            ActiveGame::Maze(maze) => match event {
                InputEvent::Move(dir) => {
                    if maze.step(dir) == MoveOutcome::Finished {
                        log::info!("Maze finished in {} moves", maze.moves);
                    }
                }
                InputEvent::Restart => {
                    if let Err(e) = maze.reset() {
                        log::error!("Could not generate a new maze: {e}");
                    }
                }
                InputEvent::Impulse | InputEvent::Tap(_) => {}
            },
            ActiveGame::Snake(snake) => match event {
                InputEvent::Move(dir) => snake.turn(dir),
                InputEvent::Impulse => {
                    if snake.phase == GamePhase::Over {
                        snake.reset();
                    }
                    snake.start();
                }
                InputEvent::Restart => snake.reset(),
                InputEvent::Tap(_) => {}
            },
            ActiveGame::Memory(memory) => match event {
                InputEvent::Tap(tile) => {
                    memory.tap(tile);
                }
                InputEvent::Impulse => memory.start(),
                InputEvent::Restart => memory.reset(),
                InputEvent::Move(_) => {}
            },
        }
        self.observe_phase()
    }

    /// Run `steps` fixed steps
    pub fn update(&mut self, steps: u32) -> Option<RunEnded> {
        let elapsed_ms = steps as f32 * STEP_MS;
        match &mut self.game {
            ActiveGame::Flight {
                session, pending, ..
            } => {
                for _ in 0..steps {
                    for event in tick(session, pending, SIM_DT) {
                        match event {
                            FlightEvent::Crashed(c) => {
                                log::info!("Crashed into {:?} with score {}", c, session.score)
                            }
                            FlightEvent::Reset => log::debug!("Flight session reset"),
                            _ => {}
                        }
                    }
                    // Clear one-shot inputs after processing
                    *pending = TickInput::default();
                }
            }
            ActiveGame::Maze(_) => {}
            ActiveGame::Snake(snake) => {
                snake.tick(elapsed_ms);
            }
            ActiveGame::Memory(memory) => memory.tick(elapsed_ms),
        }
        self.observe_phase()
    }

    /// Report each transition into Over exactly once
    fn observe_phase(&mut self) -> Option<RunEnded> {
        let phase = self.phase();
        // A flight run can start and end inside one batch of steps
        let ended = self.last_phase != GamePhase::Over && phase == GamePhase::Over;
        self.last_phase = phase;
        if !ended {
            return None;
        }
        let game = match &self.game {
            ActiveGame::Flight { kind, .. } => *kind,
            ActiveGame::Snake(_) => GameKind::Snake,
            ActiveGame::Memory(_) => GameKind::MemoryGrid,
            ActiveGame::Maze(_) => return None,
        };
        Some(RunEnded {
            game,
            score: self.score(),
        })
    }

    /// Snapshot for the render sink
    pub fn scene(&self) -> Scene<'_> {
        match &self.game {
            ActiveGame::Flight { session, .. } => Scene::Flight(session),
            ActiveGame::Maze(m) => Scene::Maze(m),
            ActiveGame::Snake(s) => Scene::Snake(s),
            ActiveGame::Memory(m) => Scene::Memory(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;

    #[test]
    fn test_flight_input_consumed_by_one_step() {
        let mut arcade = Arcade::new(GameChoice::Flappy, 1, &Settings::default()).unwrap();
        arcade.handle(InputEvent::Impulse);
        // No step yet: still idle
        assert_eq!(arcade.phase(), GamePhase::Idle);
        arcade.update(1);
        assert_eq!(arcade.phase(), GamePhase::Running);
        let ActiveGame::Flight { session, pending, .. } = &arcade.game else {
            panic!("expected flight game");
        };
        assert_eq!(*pending, TickInput::default());
        assert!((session.body.vy - (-8.5 + 0.45)).abs() < 1e-5);
    }

    #[test]
    fn test_flight_crash_reports_run_once() {
        let mut arcade = Arcade::new(GameChoice::Runner, 2, &Settings::default()).unwrap();
        arcade.handle(InputEvent::Impulse);
        let mut ended = Vec::new();
        for _ in 0..600 {
            if let Some(run) = arcade.update(1) {
                ended.push(run);
            }
        }
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].game, GameKind::PulseRunner);
        assert_eq!(arcade.phase(), GamePhase::Over);
    }

    #[test]
    fn test_snake_runs_on_elapsed_time() {
        let mut arcade = Arcade::new(GameChoice::Snake, 3, &Settings::default()).unwrap();
        arcade.handle(InputEvent::Impulse);
        // 13 steps of 16.7 ms cover exactly one 200 ms snake step
        arcade.update(13);
        let ActiveGame::Snake(snake) = &arcade.game else {
            panic!("expected snake");
        };
        assert_eq!(snake.head(), (10, 9));
    }

    #[test]
    fn test_maze_moves_apply_immediately() {
        let mut arcade = Arcade::new(GameChoice::Maze, 4, &Settings::default()).unwrap();
        // Entrance sits in the top-left corner
        assert_eq!(arcade.handle(InputEvent::Move(Direction::Up)), None);
        assert_eq!(arcade.score(), 0);
        assert_eq!(arcade.phase(), GamePhase::Idle);

        let path = match &arcade.game {
            ActiveGame::Maze(m) => m.maze.solve().unwrap(),
            _ => unreachable!(),
        };
        for pair in path.windows(2) {
            let (dx, dy) = (
                pair[1].0 as i64 - pair[0].0 as i64,
                pair[1].1 as i64 - pair[0].1 as i64,
            );
            let dir = match (dx, dy) {
                (1, 0) => Direction::Right,
                (-1, 0) => Direction::Left,
                (0, 1) => Direction::Down,
                _ => Direction::Up,
            };
            // Maze runs never reach the leaderboard
            assert_eq!(arcade.handle(InputEvent::Move(dir)), None);
        }
        assert_eq!(arcade.phase(), GamePhase::Over);
        assert_eq!(arcade.score() as usize, path.len() - 1);

        arcade.handle(InputEvent::Restart);
        assert_eq!(arcade.phase(), GamePhase::Idle);
        assert_eq!(arcade.score(), 0);
    }

    #[test]
    fn test_memory_wrong_tap_ends_run() {
        let mut arcade = Arcade::new(GameChoice::Memory, 5, &Settings::default()).unwrap();
        arcade.handle(InputEvent::Impulse);
        arcade.update(120);
        let wrong = match &arcade.game {
            ActiveGame::Memory(m) => (m.sequence[0] + 1) % 9,
            _ => unreachable!(),
        };
        let ended = arcade.handle(InputEvent::Tap(wrong));
        assert_eq!(
            ended,
            Some(RunEnded {
                game: GameKind::MemoryGrid,
                score: 0
            })
        );
    }
}
