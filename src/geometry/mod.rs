//! Arrow geometry engine
//!
//! Turns a path of waypoints and a shaft width into the closed outline of a
//! multi-segment arrow. Axis-aligned paths produce a mitered polygon
//! ([`Arrow`]); curved paths are interpolated as a bezier centerline
//! ([`CurvedArrow`]).

pub mod arrow;
pub mod curve;
pub mod direction;
pub mod error;

pub use arrow::{expected_vertex_count, Arrow, Outline};
pub use curve::{CurvedArrow, DEFAULT_SAMPLES};
pub use direction::Direction;
pub use error::PathError;

use std::fmt;

/// Half-angle between the arrowhead flank and the shaft, in degrees
pub const HEAD_HALF_ANGLE_DEG: f64 = 50.0;

/// Arrowhead overhang on each side of the shaft, as a fraction of shaft width
pub const HEAD_WIDTH_RATIO: f64 = 0.55;

/// A 2D point in data coordinates (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Translate by a vector scaled by `factor`
    pub fn offset_by(self, (vx, vy): (f64, f64), factor: f64) -> Self {
        Self::new(self.x + vx * factor, self.y + vy * factor)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Distance the arrowhead base sits back from the tip for a given shaft width
pub fn head_length(width: f64) -> f64 {
    HEAD_HALF_ANGLE_DEG.to_radians().tan() * (head_overhang(width) + width / 2.0)
}

/// How far the arrowhead extends beyond each side of the shaft
pub fn head_overhang(width: f64) -> f64 {
    width * HEAD_WIDTH_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_display() {
        assert_eq!(Point::new(10.0, -0.5).to_string(), "(10, -0.5)");
    }

    #[test]
    fn test_head_length_matches_fixed_constants() {
        let expected = 50f64.to_radians().tan() * (0.55 * 2.0 + 1.0);
        assert!((head_length(2.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_offset_by_vector() {
        let p = Point::new(1.0, 1.0).offset_by((0.0, -1.0), 3.0);
        assert_eq!(p, Point::new(1.0, -2.0));
    }
}
