//! Math utilities
//!
//! Re-exports glam with the small vector helpers the simulation needs.

pub use glam::*;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Lengths below this are treated as zero when normalizing.
pub const EPSILON: f32 = 1.0e-5;

/// A uniformly distributed direction on the unit circle.
pub fn rand_unit_vec2<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    Vec2::from_angle(angle)
}

/// Rotate counter-clockwise by a quarter turn.
#[inline]
pub fn rotate90(v: Vec2) -> Vec2 {
    v.perp()
}

/// Rotate clockwise by a quarter turn.
#[inline]
pub fn rotate_neg90(v: Vec2) -> Vec2 {
    -v.perp()
}

/// Split a vector into a unit direction and its length, or `None` when it is
/// too short (or not finite) to have a direction.
pub fn direction_and_length(v: Vec2) -> Option<(Vec2, f32)> {
    let length = v.length();
    if length.is_finite() && length > EPSILON {
        Some((v / length, length))
    } else {
        None
    }
}

/// Axis-aligned rectangle used for border wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max).all()
    }

    /// Wrap `point` toroidally so it lies inside `[min, max)` on both axes.
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        let size = self.size();
        let wrap_axis = |value: f32, min: f32, extent: f32| {
            if extent <= 0.0 {
                min
            } else {
                min + (value - min).rem_euclid(extent)
            }
        };
        Vec2::new(
            wrap_axis(point.x, self.min.x, size.x),
            wrap_axis(point.y, self.min.y, size.y),
        )
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::new(660.0, 500.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_directions_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            assert_relative_eq!(rand_unit_vec2(&mut rng).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn quarter_turns_are_opposite() {
        let v = Vec2::new(3.0, 1.0);
        assert_eq!(rotate90(v), Vec2::new(-1.0, 3.0));
        assert_eq!(rotate_neg90(v), Vec2::new(1.0, -3.0));
        assert_relative_eq!(rotate90(v).dot(v), 0.0);
    }

    #[test]
    fn degenerate_vectors_have_no_direction() {
        assert!(direction_and_length(Vec2::ZERO).is_none());
        assert!(direction_and_length(Vec2::new(f32::NAN, 1.0)).is_none());
        let (dir, len) = direction_and_length(Vec2::new(0.0, 2.0)).unwrap();
        assert_eq!(dir, Vec2::Y);
        assert_relative_eq!(len, 2.0);
    }

    #[test]
    fn wrap_keeps_points_inside() {
        let bounds = WorldBounds::default();
        assert_eq!(bounds.wrap(Vec2::new(670.0, -10.0)), Vec2::new(10.0, 490.0));
        assert_eq!(bounds.wrap(Vec2::new(100.0, 100.0)), Vec2::new(100.0, 100.0));
        assert!(bounds.contains(bounds.wrap(Vec2::new(-1320.5, 1001.0))));
    }
}
