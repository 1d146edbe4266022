//! Collision detection for the flight games
//!
//! Everything is an axis-aligned box: the body's square hull against the two
//! boxes each obstacle contributes (above and below its gap), plus the
//! ceiling/floor of the playfield. Overlap is strict, so boxes that only
//! share an edge do not collide.

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::obstacle::Obstacle;

/// Axis-aligned box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap test: zero-area contact is not a hit
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Hit the obstacle with this id
    Obstacle { id: u32 },
    Ceiling,
    Floor,
}

/// Check the body against the playfield bounds
///
/// `floor_y` is the top of the ground strip.
pub fn bounds_collision(body: &Body, floor_y: f32) -> Option<Collision> {
    if body.bottom() > floor_y {
        Some(Collision::Floor)
    } else if body.top() < 0.0 {
        Some(Collision::Ceiling)
    } else {
        None
    }
}

/// Check the body against every active obstacle, first hit wins
pub fn obstacle_collision(
    body: &Body,
    obstacles: &[Obstacle],
    gap: f32,
    width: f32,
    floor_y: f32,
) -> Option<Collision> {
    let hull = body.bounds();
    obstacles
        .iter()
        .find(|o| {
            o.boxes(gap, width, floor_y)
                .iter()
                .any(|b| hull.overlaps(b))
        })
        .map(|o| Collision::Obstacle { id: o.id })
}
