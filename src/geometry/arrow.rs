//! Mitered polygon outline for axis-aligned multi-segment arrows
//!
//! The outline is traced in two passes. The forward pass walks the path from
//! butt to tip and emits one vertex per waypoint on the left side of the
//! shaft; the reverse pass walks back from tip to butt doing the same, which
//! lands on the other side. With a head, the last forward vertex is replaced
//! by the five head vertices and the first reverse vertex is dropped.

use crate::log::{debug, warn};

use super::direction::Direction;
use super::error::PathError;
use super::{head_length, head_overhang, Point};

/// Closed polygon outline, wound clockwise, last vertex equal to the first
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    vertices: Vec<Point>,
}

impl Outline {
    /// Close an open vertex ring by repeating its first vertex
    fn close(mut vertices: Vec<Point>) -> Self {
        if let Some(first) = vertices.first().copied() {
            vertices.push(first);
        }
        Self { vertices }
    }

    /// Vertices including the closing duplicate, ready for filling
    pub fn fill_points(&self) -> &[Point] {
        &self.vertices
    }

    /// Vertices without the closing duplicate, for drawing primitives that
    /// close the polygon themselves
    pub fn stroke_points(&self) -> &[Point] {
        &self.vertices[..self.vertices.len().saturating_sub(1)]
    }

    /// Number of vertices, closing duplicate included
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Direction of each outline edge, `None` for edges off the four axes
    pub fn edge_directions(&self) -> Vec<Option<Direction>> {
        self.vertices
            .windows(2)
            .map(|pair| Direction::classify(pair[0], pair[1]))
            .collect()
    }

    /// Signed area (shoelace); negative for clockwise winding in y-up space
    pub fn signed_area(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| pair[0].x * pair[1].y - pair[1].x * pair[0].y)
            .sum::<f64>()
            / 2.0
    }

    /// Axis-aligned extent as `(min, max)` corners
    pub fn extent(&self) -> Option<(Point, Point)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// A multi-segment arrow built from axis-aligned waypoints.
///
/// Construction validates the path and computes the outline eagerly; the
/// value is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    path: Vec<Point>,
    width: f64,
    has_head: bool,
    directions: Vec<Direction>,
    reverse_directions: Vec<Direction>,
    outline: Outline,
}

impl Arrow {
    /// Build the outline for `path` with shaft `width`, optionally ending in
    /// a triangular head at the last point.
    pub fn new(path: Vec<Point>, width: f64, has_head: bool) -> Result<Self, PathError> {
        if path.len() < 2 {
            return Err(PathError::TooFewPoints { count: path.len() });
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(PathError::InvalidWidth { width });
        }
        if let Some(&at) = path.iter().find(|p| !p.is_finite()) {
            return Err(PathError::NonFinite { at });
        }

        let directions = Direction::classify_path(&path)?;
        let reversed: Vec<Point> = path.iter().rev().copied().collect();
        let reverse_directions = Direction::classify_path(&reversed)?;

        for (i, pair) in directions.windows(2).enumerate() {
            if pair[1] == pair[0].opposite() {
                return Err(PathError::FoldsBack { at: path[i + 1] });
            }
        }

        let mut vertices = Vec::with_capacity(expected_vertex_count(directions.len(), has_head));
        trace_side(&path, &directions, width, true, &mut vertices);

        if has_head {
            let last = directions[directions.len() - 1];
            let tip = path[path.len() - 1];
            let final_len = path[path.len() - 2].distance(tip);
            if head_length(width) > final_len {
                warn!(
                    head_length = head_length(width),
                    final_len, "arrowhead is longer than the final segment"
                );
            }
            if let Some(shaft_end) = vertices.pop() {
                vertices.extend(head_vertices(shaft_end, tip, last, width));
            }
        }

        trace_side(&reversed, &reverse_directions, width, !has_head, &mut vertices);

        debug!(
            segments = directions.len(),
            has_head,
            vertices = vertices.len() + 1,
            "built arrow outline"
        );

        Ok(Self {
            path,
            width,
            has_head,
            directions,
            reverse_directions,
            outline: Outline::close(vertices),
        })
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn has_head(&self) -> bool {
        self.has_head
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Direction of each segment walking butt to tip
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Direction of each segment walking tip to butt
    pub fn reverse_directions(&self) -> &[Direction] {
        &self.reverse_directions
    }

    pub fn segment_count(&self) -> usize {
        self.directions.len()
    }

    pub fn segment_lengths(&self) -> Vec<f64> {
        self.path
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect()
    }

    pub fn butt(&self) -> Point {
        self.path[0]
    }

    pub fn tip(&self) -> Point {
        self.path[self.path.len() - 1]
    }
}

/// Outline size for a path of `segments` segments, closing vertex excluded
pub fn expected_vertex_count(segments: usize, has_head: bool) -> usize {
    let shaft = 2 * (1 + segments);
    if has_head {
        shaft + 3
    } else {
        shaft
    }
}

/// Emit one side of the shaft: an optional start vertex, then one vertex per
/// joint (miter corner) and one at the far end (plain offset).
fn trace_side(
    path: &[Point],
    directions: &[Direction],
    width: f64,
    include_start: bool,
    out: &mut Vec<Point>,
) {
    let half = width / 2.0;
    if include_start {
        out.push(path[0].offset_by(directions[0].side_offset(), half));
    }
    for (i, dir) in directions.iter().enumerate() {
        let corner = match directions.get(i + 1) {
            Some(next) => dir
                .miter_corner(*next)
                .unwrap_or_else(|| dir.side_offset()),
            None => dir.side_offset(),
        };
        out.push(path[i + 1].offset_by(corner, half));
    }
}

/// Head vertices replacing the last forward vertex: the pulled-back shaft
/// corner, the outer flank, the tip, the opposite flank and the rejoin point.
fn head_vertices(shaft_end: Point, tip: Point, dir: Direction, width: f64) -> [Point; 5] {
    let normal = dir.side_offset();
    let overhang = head_overhang(width);
    let base = shaft_end.offset_by(dir.unit(), -head_length(width));
    let flank = base.offset_by(normal, overhang);
    let rejoin = base.offset_by(normal, -width);
    let far_flank = rejoin.offset_by(normal, -overhang);
    [base, flank, tip, far_flank, rejoin]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a} != {b}"
        );
    }

    #[test]
    fn test_straight_rectangle() {
        let arrow = Arrow::new(pts(&[(0.0, 0.0), (10.0, 0.0)]), 2.0, false).unwrap();
        assert_eq!(
            arrow.outline().fill_points(),
            pts(&[(0.0, 1.0), (10.0, 1.0), (10.0, -1.0), (0.0, -1.0), (0.0, 1.0)])
        );
    }

    #[test]
    fn test_straight_with_head() {
        let arrow = Arrow::new(pts(&[(0.0, 0.0), (10.0, 0.0)]), 2.0, true).unwrap();
        let back = 10.0 - 50f64.to_radians().tan() * (0.55 * 2.0 + 1.0);
        let v = arrow.outline().fill_points();
        assert_eq!(v.len(), 8);
        assert_close(v[0], Point::new(0.0, 1.0));
        assert_close(v[1], Point::new(back, 1.0));
        assert_close(v[2], Point::new(back, 2.1));
        assert_close(v[3], Point::new(10.0, 0.0));
        assert_close(v[4], Point::new(back, -2.1));
        assert_close(v[5], Point::new(back, -1.0));
        assert_close(v[6], Point::new(0.0, -1.0));
        assert_close(v[7], Point::new(0.0, 1.0));
    }

    #[test]
    fn test_head_for_each_direction_points_at_tip() {
        let paths = [
            pts(&[(0.0, 0.0), (0.0, 10.0)]),
            pts(&[(0.0, 0.0), (-10.0, 0.0)]),
            pts(&[(0.0, 0.0), (0.0, -10.0)]),
        ];
        for path in paths {
            let tip = path[1];
            let arrow = Arrow::new(path, 1.0, true).unwrap();
            let v = arrow.outline().fill_points();
            assert_eq!(v[3], tip);
            // head flanks straddle the shaft symmetrically
            let mid = v[2].midpoint(v[4]);
            let (ux, uy) = arrow.directions()[0].unit();
            assert_close(mid, tip.offset_by((ux, uy), -head_length(1.0)));
        }
    }

    #[test]
    fn test_l_shaped_miter() {
        // east then north: inner corner of a left turn
        let arrow = Arrow::new(pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]), 2.0, false).unwrap();
        assert_eq!(
            arrow.outline().fill_points(),
            pts(&[
                (0.0, 1.0),
                (9.0, 1.0),
                (9.0, 10.0),
                (11.0, 10.0),
                (11.0, -1.0),
                (0.0, -1.0),
                (0.0, 1.0),
            ])
        );
    }

    #[test]
    fn test_outline_is_clockwise() {
        let paths = [
            pts(&[(0.0, 0.0), (10.0, 0.0)]),
            pts(&[(0.0, 0.0), (0.0, -10.0), (8.0, -10.0)]),
            pts(&[(0.0, 0.0), (0.0, 5.0), (-5.0, 5.0), (-5.0, 20.0)]),
        ];
        for path in paths {
            for head in [false, true] {
                let arrow = Arrow::new(path.clone(), 1.0, head).unwrap();
                assert!(arrow.outline().signed_area() < 0.0);
            }
        }
    }

    #[test]
    fn test_collinear_segments_continue_straight() {
        let arrow = Arrow::new(pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]), 2.0, false).unwrap();
        let v = arrow.outline().fill_points();
        assert_eq!(v[1], Point::new(5.0, 1.0));
        assert_eq!(v.len(), expected_vertex_count(2, false) + 1);
    }

    #[test]
    fn test_rejects_fold_back() {
        let err = Arrow::new(pts(&[(0.0, 0.0), (5.0, 0.0), (2.0, 0.0)]), 1.0, false).unwrap_err();
        assert_eq!(err, PathError::FoldsBack { at: Point::new(5.0, 0.0) });
    }

    #[test]
    fn test_rejects_short_path_and_bad_width() {
        assert_eq!(
            Arrow::new(pts(&[(0.0, 0.0)]), 1.0, false).unwrap_err(),
            PathError::TooFewPoints { count: 1 }
        );
        assert!(matches!(
            Arrow::new(pts(&[(0.0, 0.0), (1.0, 0.0)]), 0.0, false),
            Err(PathError::InvalidWidth { .. })
        ));
        assert!(matches!(
            Arrow::new(pts(&[(0.0, 0.0), (1.0, 0.0)]), f64::NAN, false),
            Err(PathError::InvalidWidth { .. })
        ));
    }

    #[test]
    fn test_stroke_points_drop_closing_vertex() {
        let arrow = Arrow::new(pts(&[(0.0, 0.0), (10.0, 0.0)]), 2.0, false).unwrap();
        assert_eq!(arrow.outline().stroke_points().len(), 4);
        assert_eq!(arrow.outline().len(), 5);
    }

    #[test]
    fn test_accessors() {
        let arrow = Arrow::new(pts(&[(0.0, 0.0), (0.0, 3.0), (4.0, 3.0)]), 0.5, true).unwrap();
        assert_eq!(arrow.segment_count(), 2);
        assert_eq!(arrow.segment_lengths(), vec![3.0, 4.0]);
        assert_eq!(arrow.butt(), Point::new(0.0, 0.0));
        assert_eq!(arrow.tip(), Point::new(4.0, 3.0));
        assert_eq!(arrow.directions(), &[Direction::North, Direction::East]);
        assert_eq!(arrow.reverse_directions(), &[Direction::West, Direction::South]);
        assert!(arrow.has_head());
        assert_eq!(arrow.width(), 0.5);
    }

    #[test]
    fn test_extent_covers_head() {
        let arrow = Arrow::new(pts(&[(0.0, 0.0), (10.0, 0.0)]), 2.0, true).unwrap();
        let (lo, hi) = arrow.outline().extent().unwrap();
        assert_close(lo, Point::new(0.0, -2.1));
        assert_close(hi, Point::new(10.0, 2.1));
    }
}
