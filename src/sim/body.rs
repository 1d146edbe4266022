//! The player-controlled body and its integrator
//!
//! Physics constants are per step: `vy += gravity; y += vy`. There is no
//! clamping here; leaving the playfield is detected by the collision pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Rotation limits for rendering (radians)
const ROTATION_MIN: f32 = -0.6;
const ROTATION_MAX: f32 = 1.0;
const ROTATION_PER_VELOCITY: f32 = 0.04;

/// The single moving entity in a flight game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Vertical velocity (positive = downward)
    pub vy: f32,
    pub radius: f32,
    /// Visual tilt derived from velocity
    pub rotation: f32,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vy: 0.0,
            radius,
            rotation: 0.0,
        }
    }

    /// Body at its spawn point for a playfield of the given height
    pub fn spawn(playfield_height: f32) -> Self {
        Self::new(Vec2::new(BODY_START_X, playfield_height / 2.0), BODY_RADIUS)
    }

    /// Override accumulated velocity with the impulse constant
    #[inline]
    pub fn impulse(&mut self, velocity: f32) {
        self.vy = velocity;
    }

    /// Advance one step under constant gravity
    pub fn integrate(&mut self, gravity: f32) {
        self.vy += gravity;
        self.pos.y += self.vy;
        self.rotation = (self.vy * ROTATION_PER_VELOCITY).clamp(ROTATION_MIN, ROTATION_MAX);
    }

    /// Square bounding box enclosing the body
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}
