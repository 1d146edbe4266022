//! Perfect-maze generation and the maze walking game
//!
//! Cells at even coordinates are rooms; the backtracker moves two cells at a
//! time and knocks out the wall cell in between. Every room ends up carved
//! and the carved cells form a tree, so there is exactly one route between
//! any two open cells.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;
use super::state::{GamePhase, RngState};
use super::tuning::MazeTuning;

/// Smallest grid that still has distinct entrance and exit rooms
pub const MIN_MAZE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze must be at least {min}x{min}, got {width}x{height}")]
    TooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Path,
    Start,
    Exit,
}

impl Cell {
    #[inline]
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }
}

/// A generated maze; entrance top-left, exit bottom-right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    pub width: usize,
    pub height: usize,
    /// Row-major
    cells: Vec<Cell>,
    pub start: (usize, usize),
    pub exit: (usize, usize),
}

impl Maze {
    /// Carve a maze with an iterative recursive-backtracker
    pub fn generate<R: Rng>(width: usize, height: usize, rng: &mut R) -> Result<Self, MazeError> {
        if width < MIN_MAZE_SIZE || height < MIN_MAZE_SIZE {
            return Err(MazeError::TooSmall {
                width,
                height,
                min: MIN_MAZE_SIZE,
            });
        }

        let mut maze = Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
            start: (0, 0),
            exit: (width - 1, height - 1),
        };

        maze.set(0, 0, Cell::Path);
        let mut stack = vec![(0usize, 0usize)];
        let mut candidates = Vec::with_capacity(4);

        while let Some(&(cx, cy)) = stack.last() {
            candidates.clear();
            for dir in Direction::ALL {
                if let Some((nx, ny)) = maze.offset(cx, cy, dir, 2) {
                    if maze.get(nx, ny) == Some(Cell::Wall) {
                        candidates.push(dir);
                    }
                }
            }

            if candidates.is_empty() {
                stack.pop();
                continue;
            }

            let dir = candidates[rng.random_range(0..candidates.len())];
            let Some((wx, wy)) = maze.offset(cx, cy, dir, 1) else {
                continue;
            };
            let Some((nx, ny)) = maze.offset(cx, cy, dir, 2) else {
                continue;
            };
            maze.set(wx, wy, Cell::Path);
            maze.set(nx, ny, Cell::Path);
            stack.push((nx, ny));
        }

        maze.connect_exit();

        let (sx, sy) = maze.start;
        maze.set(sx, sy, Cell::Start);
        let (ex, ey) = maze.exit;
        maze.set(ex, ey, Cell::Exit);

        Ok(maze)
    }

    /// With even dimensions the exit sits off the room lattice; hang it off
    /// the nearest room with a short dead-end corridor.
    fn connect_exit(&mut self) {
        let (ex, ey) = self.exit;
        let room_x = ex - ex % 2;
        let room_y = ey - ey % 2;
        for x in room_x..=ex {
            self.set(x, room_y, Cell::Path);
        }
        for y in room_y..=ey {
            self.set(ex, y, Cell::Path);
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let i = self.index(x, y);
        self.cells[i] = cell;
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Neighbor `steps` cells away, if it is inside the grid
    pub fn offset(&self, x: usize, y: usize, dir: Direction, steps: i32) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = x as i32 + dx * steps;
        let ny = y as i32 + dy * steps;
        if nx < 0 || ny < 0 || nx as usize >= self.width || ny as usize >= self.height {
            None
        } else {
            Some((nx as usize, ny as usize))
        }
    }

    pub fn is_open(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(Cell::is_open)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_open()).count()
    }

    /// Number of adjacent open-cell pairs (graph edges)
    pub fn passages(&self) -> usize {
        let mut edges = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.is_open(x, y) {
                    continue;
                }
                if self.is_open(x + 1, y) {
                    edges += 1;
                }
                if self.is_open(x, y + 1) {
                    edges += 1;
                }
            }
        }
        edges
    }

    /// BFS distances from the entrance (`None` for walls and unreachable cells)
    fn distances(&self) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.cells.len()];
        let (sx, sy) = self.start;
        dist[self.index(sx, sy)] = Some(0);
        let mut queue = VecDeque::from([(sx, sy)]);

        while let Some((x, y)) = queue.pop_front() {
            let d = dist[self.index(x, y)].unwrap_or(0);
            for dir in Direction::ALL {
                if let Some((nx, ny)) = self.offset(x, y, dir, 1) {
                    let i = self.index(nx, ny);
                    if self.cells[i].is_open() && dist[i].is_none() {
                        dist[i] = Some(d + 1);
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        dist
    }

    /// Open cells reachable from the entrance (including it)
    pub fn reachable_cells(&self) -> usize {
        self.distances().iter().filter(|d| d.is_some()).count()
    }

    /// Shortest route from entrance to exit, both ends included
    pub fn solve(&self) -> Option<Vec<(usize, usize)>> {
        let dist = self.distances();
        let (ex, ey) = self.exit;
        let mut remaining = dist[self.index(ex, ey)]?;

        // Walk back downhill from the exit
        let mut path = vec![(ex, ey)];
        let (mut x, mut y) = (ex, ey);
        while remaining > 0 {
            let prev = Direction::ALL.iter().find_map(|&dir| {
                let (nx, ny) = self.offset(x, y, dir, 1)?;
                (dist[self.index(nx, ny)] == Some(remaining - 1)).then_some((nx, ny))
            })?;
            (x, y) = prev;
            path.push(prev);
            remaining -= 1;
        }
        path.reverse();
        Some(path)
    }
}

/// Result of a directional move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Wall or edge of the grid
    Blocked,
    Moved,
    /// Stepped onto the exit
    Finished,
    /// Session already over
    Ignored,
}

/// One playthrough of the maze game
#[derive(Debug, Clone)]
pub struct MazeSession {
    pub rng_state: RngState,
    pub tuning: MazeTuning,
    pub maze: Maze,
    pub player: (usize, usize),
    pub phase: GamePhase,
    /// Successful moves this run
    pub moves: u64,
    /// Fewest moves of any finished run
    pub best_moves: Option<u64>,
    rng: Pcg32,
}

impl MazeSession {
    pub fn new(seed: u64, tuning: MazeTuning) -> Result<Self, MazeError> {
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let maze = Maze::generate(tuning.width, tuning.height, &mut rng)?;
        Ok(Self {
            rng_state,
            tuning,
            player: maze.start,
            maze,
            phase: GamePhase::Idle,
            moves: 0,
            best_moves: None,
            rng,
        })
    }

    /// Try to move the player one cell
    pub fn step(&mut self, dir: Direction) -> MoveOutcome {
        if self.phase == GamePhase::Over {
            return MoveOutcome::Ignored;
        }

        let (x, y) = self.player;
        let target = self
            .maze
            .offset(x, y, dir, 1)
            .filter(|&(nx, ny)| self.maze.is_open(nx, ny));
        let Some((nx, ny)) = target else {
            return MoveOutcome::Blocked;
        };

        self.player = (nx, ny);
        self.moves += 1;
        self.phase = GamePhase::Running;

        if self.maze.get(nx, ny) == Some(Cell::Exit) {
            self.phase = GamePhase::Over;
            self.best_moves = Some(self.best_moves.map_or(self.moves, |b| b.min(self.moves)));
            log::debug!("maze finished in {} moves", self.moves);
            return MoveOutcome::Finished;
        }
        MoveOutcome::Moved
    }

    /// Generate a fresh maze and put the player back at the entrance
    pub fn reset(&mut self) -> Result<(), MazeError> {
        self.maze = Maze::generate(self.tuning.width, self.tuning.height, &mut self.rng)?;
        self.player = self.maze.start;
        self.phase = GamePhase::Idle;
        self.moves = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn maze(width: usize, height: usize, seed: u64) -> Maze {
        let mut rng = Pcg32::seed_from_u64(seed);
        Maze::generate(width, height, &mut rng).unwrap()
    }

    fn assert_perfect(m: &Maze) {
        // Connected and acyclic: a tree over every open cell
        assert_eq!(m.reachable_cells(), m.open_cells());
        assert_eq!(m.passages(), m.open_cells() - 1);
        assert!(m.solve().is_some());
    }

    #[test]
    fn test_rejects_tiny_grids() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            Maze::generate(2, 9, &mut rng),
            Err(MazeError::TooSmall {
                width: 2,
                height: 9,
                min: 3
            })
        );
        assert!(Maze::generate(3, 0, &mut rng).is_err());
    }

    #[test]
    fn test_entrance_and_exit_marked() {
        let m = maze(15, 15, 1);
        assert_eq!(m.get(0, 0), Some(Cell::Start));
        assert_eq!(m.get(14, 14), Some(Cell::Exit));
        assert_eq!(m.rows().flatten().filter(|c| **c == Cell::Start).count(), 1);
        assert_eq!(m.rows().flatten().filter(|c| **c == Cell::Exit).count(), 1);
    }

    #[test]
    fn test_every_room_is_carved() {
        let m = maze(11, 9, 4);
        for y in (0..9).step_by(2) {
            for x in (0..11).step_by(2) {
                assert!(m.is_open(x, y), "room ({x},{y}) left as wall");
            }
        }
        // Odd/odd cells are pillars
        for y in (1..9).step_by(2) {
            for x in (1..11).step_by(2) {
                assert!(!m.is_open(x, y));
            }
        }
    }

    #[test]
    fn test_small_and_even_grids_are_perfect() {
        for (w, h) in [(3, 3), (4, 4), (3, 8), (10, 7), (16, 16)] {
            for seed in 0..20 {
                assert_perfect(&maze(w, h, seed));
            }
        }
    }

    #[test]
    fn test_solution_is_a_walk_from_start_to_exit() {
        let m = maze(21, 15, 99);
        let path = m.solve().unwrap();
        assert_eq!(path.first(), Some(&m.start));
        assert_eq!(path.last(), Some(&m.exit));
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let manhattan = a.0.abs_diff(b.0) + a.1.abs_diff(b.1);
            assert_eq!(manhattan, 1);
            assert!(m.is_open(b.0, b.1));
        }
    }

    #[test]
    fn test_new_seed_changes_layout() {
        let first = maze(15, 15, 1);
        assert!((2..40).any(|seed| maze(15, 15, seed) != first));
    }

    #[test]
    fn test_session_walk_to_exit() {
        let mut session = MazeSession::new(7, MazeTuning::default()).unwrap();
        assert_eq!(session.phase, GamePhase::Idle);
        let path = session.maze.solve().unwrap();

        let mut outcome = MoveOutcome::Ignored;
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let dir = Direction::ALL
                .into_iter()
                .find(|&d| session.maze.offset(a.0, a.1, d, 1) == Some(b))
                .unwrap();
            outcome = session.step(dir);
        }
        assert_eq!(outcome, MoveOutcome::Finished);
        assert_eq!(session.phase, GamePhase::Over);
        assert_eq!(session.moves as usize, path.len() - 1);
        assert_eq!(session.best_moves, Some(session.moves));
        assert_eq!(session.step(Direction::Left), MoveOutcome::Ignored);
    }

    #[test]
    fn test_session_blocked_moves_are_noops() {
        let mut session = MazeSession::new(3, MazeTuning::default()).unwrap();
        // Off the top edge
        assert_eq!(session.step(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(session.step(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(session.moves, 0);
        assert_eq!(session.phase, GamePhase::Idle);
    }

    #[test]
    fn test_session_reset_restores_entrance() {
        let mut session = MazeSession::new(11, MazeTuning::default()).unwrap();
        let open = Direction::ALL
            .into_iter()
            .find(|&d| session.maze.offset(0, 0, d, 1).is_some_and(|(x, y)| session.maze.is_open(x, y)))
            .unwrap();
        assert_eq!(session.step(open), MoveOutcome::Moved);
        assert_eq!(session.phase, GamePhase::Running);

        session.reset().unwrap();
        assert_eq!(session.player, (0, 0));
        assert_eq!(session.moves, 0);
        assert_eq!(session.phase, GamePhase::Idle);
    }

    proptest! {
        #[test]
        fn prop_generated_mazes_are_perfect(w in 3usize..31, h in 3usize..31, seed in any::<u64>()) {
            let m = maze(w, h, seed);
            prop_assert_eq!(m.reachable_cells(), m.open_cells());
            prop_assert_eq!(m.passages(), m.open_cells() - 1);
            prop_assert!(m.solve().is_some());
        }
    }
}
