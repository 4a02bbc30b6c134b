//! Segment direction classification and the offset tables built on it

use std::fmt;

use super::error::PathError;
use super::Point;

/// One of the four canonical segment directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 0 degrees, +x
    East,
    /// 90 degrees, +y
    North,
    /// 180 degrees, -x
    West,
    /// 270 degrees, -y
    South,
}

/// Perpendicular offset (unit vector) of the first polygon side for each
/// direction. Walking the path with this side on the left keeps the outline
/// clockwise.
const SIDE_OFFSETS: [(Direction, (f64, f64)); 4] = [
    (Direction::East, (0.0, 1.0)),
    (Direction::North, (-1.0, 0.0)),
    (Direction::West, (0.0, -1.0)),
    (Direction::South, (1.0, 0.0)),
];

/// Miter corner (in half-width units) for every ordered pair of
/// perpendicular directions meeting at a joint.
const MITER_CORNERS: [((Direction, Direction), (f64, f64)); 8] = [
    ((Direction::East, Direction::North), (-1.0, 1.0)),
    ((Direction::North, Direction::East), (-1.0, 1.0)),
    ((Direction::East, Direction::South), (1.0, 1.0)),
    ((Direction::South, Direction::East), (1.0, 1.0)),
    ((Direction::West, Direction::North), (-1.0, -1.0)),
    ((Direction::North, Direction::West), (-1.0, -1.0)),
    ((Direction::West, Direction::South), (1.0, -1.0)),
    ((Direction::South, Direction::West), (1.0, -1.0)),
];

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// Classify the segment `from -> to` using exact comparisons.
    ///
    /// Returns `None` for diagonal, zero-length or non-finite segments.
    pub fn classify(from: Point, to: Point) -> Option<Direction> {
        if !from.is_finite() || !to.is_finite() {
            return None;
        }
        if to.y == from.y {
            if to.x > from.x {
                return Some(Direction::East);
            }
            if to.x < from.x {
                return Some(Direction::West);
            }
        } else if to.x == from.x {
            if to.y > from.y {
                return Some(Direction::North);
            }
            if to.y < from.y {
                return Some(Direction::South);
            }
        }
        None
    }

    /// Classify every segment of `path`, failing on the first invalid one
    pub fn classify_path(path: &[Point]) -> Result<Vec<Direction>, PathError> {
        path.windows(2)
            .map(|pair| {
                Direction::classify(pair[0], pair[1]).ok_or(PathError::NotAxisAligned {
                    from: pair[0],
                    to: pair[1],
                })
            })
            .collect()
    }

    /// Angle with the +x axis, counter-clockwise, in degrees
    pub fn degrees(self) -> f64 {
        match self {
            Direction::East => 0.0,
            Direction::North => 90.0,
            Direction::West => 180.0,
            Direction::South => 270.0,
        }
    }

    /// Unit vector pointing along the direction
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::East => (1.0, 0.0),
            Direction::North => (0.0, 1.0),
            Direction::West => (-1.0, 0.0),
            Direction::South => (0.0, -1.0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::North => Direction::South,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
        }
    }

    /// Unit offset of the first outline side relative to the centerline
    pub fn side_offset(self) -> (f64, f64) {
        SIDE_OFFSETS
            .iter()
            .find(|(dir, _)| *dir == self)
            .map(|(_, offset)| *offset)
            .unwrap_or((0.0, 0.0))
    }

    /// Miter corner for a turn from `self` into `next`, in half-width units.
    ///
    /// Collinear continuation falls back to the single-side offset; a
    /// reversal has no corner.
    pub fn miter_corner(self, next: Direction) -> Option<(f64, f64)> {
        if next == self {
            return Some(self.side_offset());
        }
        MITER_CORNERS
            .iter()
            .find(|(pair, _)| *pair == (self, next))
            .map(|(_, corner)| *corner)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::East => "east",
            Direction::North => "north",
            Direction::West => "west",
            Direction::South => "south",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_cardinal_segments() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(Direction::classify(o, Point::new(3.0, 0.0)), Some(Direction::East));
        assert_eq!(Direction::classify(o, Point::new(0.0, 3.0)), Some(Direction::North));
        assert_eq!(Direction::classify(o, Point::new(-3.0, 0.0)), Some(Direction::West));
        assert_eq!(Direction::classify(o, Point::new(0.0, -3.0)), Some(Direction::South));
    }

    #[test]
    fn test_classify_rejects_diagonal_and_degenerate() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(Direction::classify(o, Point::new(1.0, 1.0)), None);
        assert_eq!(Direction::classify(o, o), None);
        // exact comparison, no tolerance
        assert_eq!(Direction::classify(o, Point::new(5.0, 1e-12)), None);
    }

    #[test]
    fn test_classify_rejects_non_finite() {
        let o = Point::new(0.0, 0.0);
        assert_eq!(Direction::classify(o, Point::new(0.0, f64::NAN)), None);
        assert_eq!(Direction::classify(o, Point::new(f64::NAN, 0.0)), None);
        assert_eq!(Direction::classify(o, Point::new(0.0, f64::INFINITY)), None);
        assert_eq!(Direction::classify(Point::new(f64::NEG_INFINITY, 0.0), o), None);
    }

    #[test]
    fn test_classify_path_reports_offending_segment() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(6.0, 2.0),
        ];
        let err = Direction::classify_path(&path).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAxisAligned {
                from: Point::new(5.0, 0.0),
                to: Point::new(6.0, 2.0),
            }
        );
    }

    #[test]
    fn test_reverse_classification_is_traversal_direction() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ];
        let mut reversed = path.to_vec();
        reversed.reverse();
        assert_eq!(
            Direction::classify_path(&reversed).unwrap(),
            vec![Direction::South, Direction::West]
        );
    }

    #[test]
    fn test_every_perpendicular_pair_has_a_corner() {
        for a in Direction::ALL {
            for b in Direction::ALL {
                let corner = a.miter_corner(b);
                if b == a.opposite() {
                    assert!(corner.is_none(), "{a} -> {b} should have no corner");
                } else {
                    assert!(corner.is_some(), "{a} -> {b} is missing a corner");
                }
            }
        }
    }

    #[test]
    fn test_miter_corner_is_symmetric_in_turn_order() {
        for ((a, b), corner) in MITER_CORNERS {
            assert_eq!(b.miter_corner(a), Some(corner));
        }
    }

    #[test]
    fn test_side_offsets_are_perpendicular_unit_vectors() {
        for dir in Direction::ALL {
            let (ux, uy) = dir.unit();
            let (ox, oy) = dir.side_offset();
            assert_eq!(ux * ox + uy * oy, 0.0);
            assert_eq!(ox.abs() + oy.abs(), 1.0);
        }
    }
}
