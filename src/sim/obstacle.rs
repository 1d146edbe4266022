//! Scrolling obstacles and the spawner that feeds them
//!
//! Obstacles are kept in spawn order, which is also increasing x since they
//! all enter at the right edge and scroll at the same speed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// A pipe pair with a gap the body must fly through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Height of the upper pipe (top of the gap)
    pub gap_top: f32,
    /// Set once the body has cleared this obstacle
    pub passed: bool,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, gap_top: f32) -> Self {
        Self {
            id,
            x,
            gap_top,
            passed: false,
        }
    }

    /// Upper and lower boxes around the gap
    pub fn boxes(&self, gap: f32, width: f32, floor_y: f32) -> [Aabb; 2] {
        let gap_bottom = self.gap_top + gap;
        [
            Aabb::new(self.x, 0.0, width, self.gap_top),
            Aabb::new(self.x, gap_bottom, width, (floor_y - gap_bottom).max(0.0)),
        ]
    }

    /// Right edge
    #[inline]
    pub fn trailing_edge(&self, width: f32) -> f32 {
        self.x + width
    }

    /// Fully scrolled past the left edge of the playfield
    #[inline]
    pub fn is_offscreen(&self, width: f32) -> bool {
        self.trailing_edge(width) < 0.0
    }
}

/// When to append the next obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnRule {
    /// Fixed wall-clock interval between spawns
    Interval { millis: f32 },
    /// Newest obstacle must recede a random distance in `[min, max]` first
    Spacing { min: f32, max: f32 },
}

/// Decides when to spawn and where to put the gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub rule: SpawnRule,
    /// Time accumulated since the last spawn (Interval rule)
    pub since_last_ms: f32,
    /// Distance the newest obstacle must travel before the next spawn (Spacing rule)
    pub next_spacing: f32,
}

impl Spawner {
    pub fn new(rule: SpawnRule) -> Self {
        Self {
            rule,
            since_last_ms: 0.0,
            next_spacing: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.since_last_ms = 0.0;
        self.next_spacing = 0.0;
    }

    /// Advance the spawn timer and report whether an obstacle is due
    ///
    /// `entry_x` is where new obstacles appear (the playfield's right edge).
    pub fn due<R: Rng>(
        &mut self,
        obstacles: &[Obstacle],
        entry_x: f32,
        elapsed_ms: f32,
        rng: &mut R,
    ) -> bool {
        match self.rule {
            SpawnRule::Interval { millis } => {
                self.since_last_ms += elapsed_ms;
                if self.since_last_ms >= millis {
                    self.since_last_ms = 0.0;
                    true
                } else {
                    false
                }
            }
            SpawnRule::Spacing { min, max } => {
                let ready = match obstacles.last() {
                    None => true,
                    Some(newest) => entry_x - newest.x >= self.next_spacing,
                };
                if ready {
                    self.next_spacing = if max > min {
                        rng.random_range(min..=max)
                    } else {
                        min
                    };
                }
                ready
            }
        }
    }
}

/// Pick a gap offset that keeps the whole gap on screen
///
/// Uniform over `[margin, floor_y - gap - margin]`; collapses to `margin`
/// when that range is empty.
pub fn random_gap_top<R: Rng>(rng: &mut R, floor_y: f32, gap: f32, margin: f32) -> f32 {
    let max_top = floor_y - gap - margin;
    if max_top > margin {
        rng.random_range(margin..=max_top)
    } else {
        margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_boxes_frame_the_gap() {
        let o = Obstacle::new(7, 300.0, 120.0);
        let [top, bottom] = o.boxes(150.0, 60.0, 560.0);
        assert_eq!(top, Aabb::new(300.0, 0.0, 60.0, 120.0));
        assert_eq!(bottom, Aabb::new(300.0, 270.0, 60.0, 290.0));
    }

    #[test]
    fn test_offscreen_once_trailing_edge_passes_zero() {
        let mut o = Obstacle::new(1, -59.0, 100.0);
        assert!(!o.is_offscreen(60.0));
        o.x = -60.0;
        assert!(!o.is_offscreen(60.0));
        o.x = -60.5;
        assert!(o.is_offscreen(60.0));
    }

    #[test]
    fn test_interval_rule_fires_on_threshold() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = Spawner::new(SpawnRule::Interval { millis: 100.0 });
        assert!(!spawner.due(&[], 480.0, 60.0, &mut rng));
        assert!(spawner.due(&[], 480.0, 40.0, &mut rng));
        // Timer restarted
        assert!(!spawner.due(&[], 480.0, 60.0, &mut rng));
    }

    #[test]
    fn test_spacing_rule_waits_for_newest_to_recede() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut spawner = Spawner::new(SpawnRule::Spacing { min: 200.0, max: 260.0 });
        assert!(spawner.due(&[], 480.0, 16.0, &mut rng));
        let threshold = spawner.next_spacing;
        assert!((200.0..=260.0).contains(&threshold));

        let mut newest = Obstacle::new(1, 480.0, 100.0);
        assert!(!spawner.due(std::slice::from_ref(&newest), 480.0, 16.0, &mut rng));
        newest.x = 480.0 - threshold;
        assert!(spawner.due(std::slice::from_ref(&newest), 480.0, 16.0, &mut rng));
    }

    #[test]
    fn test_gap_top_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let top = random_gap_top(&mut rng, 560.0, 150.0, 60.0);
            assert!((60.0..=350.0).contains(&top));
        }
        // Degenerate range collapses to the margin
        assert_eq!(random_gap_top(&mut rng, 200.0, 150.0, 60.0), 60.0);
    }
}
