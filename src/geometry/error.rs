//! Errors raised while building arrow geometry

use thiserror::Error;

use super::Point;

/// A path that cannot be turned into an arrow outline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Fewer than two waypoints
    #[error("arrow path needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    /// A segment that is neither horizontal nor vertical (or has zero length)
    #[error(
        "arrow path must be limited to segments along the x or y axis; \
         the segment from {from} to {to} does not fall on an axis"
    )]
    NotAxisAligned { from: Point, to: Point },

    /// A waypoint or control point with a NaN or infinite coordinate
    #[error("arrow point {at} has a coordinate that is not a finite number")]
    NonFinite { at: Point },

    /// A segment that doubles back over the previous one
    #[error("arrow path folds back on itself at {at}")]
    FoldsBack { at: Point },

    /// Non-positive or non-finite shaft width
    #[error("arrow width must be a positive finite number, got {width}")]
    InvalidWidth { width: f64 },

    /// Curved arrows take a start point, 1-2 controls and an end point
    #[error("curved arrow needs 2 to 4 control points, got {count}")]
    TooFewControlPoints { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_axis_aligned_names_endpoints() {
        let err = PathError::NotAxisAligned {
            from: Point::new(0.0, 0.0),
            to: Point::new(2.0, 2.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("(0, 0)"));
        assert!(msg.contains("(2, 2)"));
    }

    #[test]
    fn test_too_few_points_display() {
        let err = PathError::TooFewPoints { count: 1 };
        assert!(err.to_string().contains("got 1"));
    }
}
