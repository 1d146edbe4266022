//! Fixed timestep simulation tick for the flight games
//!
//! `tick` is pure with respect to its inputs: no clocks, no rendering, only
//! the session's own seeded RNG. `FrameClock` turns variable frame times
//! into a whole number of fixed steps.

use super::collision::{bounds_collision, obstacle_collision};
use super::state::{FlightEvent, FlightSession, GamePhase};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Flap / jump (space, click, tap)
    pub impulse: bool,
    /// Explicit restart (R key, restart button)
    pub restart: bool,
}

/// Advance the session by one fixed step
///
/// Pending input is applied before integration so an impulse affects the
/// same step it arrives in.
pub fn tick(state: &mut FlightSession, input: &TickInput, dt: f32) -> Vec<FlightEvent> {
    let mut events = Vec::new();

    if input.restart {
        state.reset();
        events.push(FlightEvent::Reset);
        return events;
    }

    if input.impulse {
        match state.phase {
            GamePhase::Idle => {
                state.phase = GamePhase::Running;
                state.body.impulse(state.tuning.impulse);
                events.push(FlightEvent::Started);
            }
            GamePhase::Running => {
                state.body.impulse(state.tuning.impulse);
                events.push(FlightEvent::Impulse);
            }
            GamePhase::Over => {
                state.reset();
                events.push(FlightEvent::Reset);
                return events;
            }
        }
    }

    // Physics and spawning are frozen outside of Running
    if state.phase != GamePhase::Running {
        return events;
    }

    state.time_ticks += 1;

    state.body.integrate(state.tuning.gravity);

    let speed = state.tuning.scroll_speed(state.score);
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed;
    }

    let entry_x = state.tuning.playfield_width;
    if state
        .spawner
        .due(&state.obstacles, entry_x, dt * 1000.0, &mut state.rng)
    {
        state.spawn_obstacle();
    }

    let floor_y = state.tuning.floor_y();
    let hit = obstacle_collision(
        &state.body,
        &state.obstacles,
        state.tuning.gap,
        state.tuning.obstacle_width,
        floor_y,
    )
    .or_else(|| bounds_collision(&state.body, floor_y));

    if let Some(collision) = hit {
        state.phase = GamePhase::Over;
        state.collision = Some(collision);
        events.push(FlightEvent::Crashed(collision));
        return events;
    }

    let width = state.tuning.obstacle_width;
    let body_left = state.body.left();
    for obstacle in &mut state.obstacles {
        if !obstacle.passed && obstacle.trailing_edge(width) < body_left {
            obstacle.passed = true;
            state.score += 1;
            state.high_score = state.high_score.max(state.score);
            events.push(FlightEvent::Scored { score: state.score });
        }
    }

    state.obstacles.retain(|o| !o.is_offscreen(width));

    events
}

/// Accumulates frame time and hands out fixed steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an animation-frame timestamp (ms) and get the steps to run
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.advance(dt)
    }

    /// Feed an elapsed duration (seconds) and get the steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Forget partial time (after a restart or a long pause)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}
