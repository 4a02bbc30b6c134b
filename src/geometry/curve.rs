//! Curved (bezier) arrows
//!
//! These bypass the miter algorithm: the centerline is sampled from the
//! bezier defined by the control points and stroked at constant width, with
//! an optional triangular head filled at the tip.

use crate::log::{debug, warn};

use super::error::PathError;
use super::{head_length, head_overhang, Point};

/// Default number of samples along the curve
pub const DEFAULT_SAMPLES: usize = 600;

/// A bezier arrow with 2-4 control points (start, 0-2 controls, end)
#[derive(Debug, Clone, PartialEq)]
pub struct CurvedArrow {
    controls: Vec<Point>,
    width: f64,
    shaft: Vec<Point>,
    head: Option<[Point; 3]>,
}

impl CurvedArrow {
    pub fn new(
        controls: Vec<Point>,
        width: f64,
        has_head: bool,
        samples: usize,
    ) -> Result<Self, PathError> {
        if !(2..=4).contains(&controls.len()) {
            return Err(PathError::TooFewControlPoints {
                count: controls.len(),
            });
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(PathError::InvalidWidth { width });
        }
        if let Some(&at) = controls.iter().find(|p| !p.is_finite()) {
            return Err(PathError::NonFinite { at });
        }

        let samples = samples.max(2);
        let mut shaft: Vec<Point> = (0..samples)
            .map(|i| bezier_point(&controls, i as f64 / (samples - 1) as f64))
            .collect();

        let head = if has_head {
            let tip = controls[controls.len() - 1];
            let base = trim_to_head(&mut shaft, head_length(width));
            let (dx, dy) = (tip.x - base.x, tip.y - base.y);
            let len = dx.hypot(dy);
            if len == 0.0 {
                warn!("curved arrow has no room for a head");
                None
            } else {
                let normal = (-dy / len, dx / len);
                let half_span = head_overhang(width) + width / 2.0;
                Some([
                    base.offset_by(normal, half_span),
                    tip,
                    base.offset_by(normal, -half_span),
                ])
            }
        } else {
            None
        };

        debug!(
            controls = controls.len(),
            samples = shaft.len(),
            has_head,
            "built curved arrow"
        );

        Ok(Self {
            controls,
            width,
            shaft,
            head,
        })
    }

    pub fn controls(&self) -> &[Point] {
        &self.controls
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sampled centerline of the shaft, ending at the head base when a head
    /// is present
    pub fn shaft(&self) -> &[Point] {
        &self.shaft
    }

    /// Head triangle as (flank, tip, opposite flank), clockwise
    pub fn head(&self) -> Option<&[Point; 3]> {
        self.head.as_ref()
    }

    pub fn has_head(&self) -> bool {
        self.head.is_some()
    }
}

/// Evaluate the bezier curve of degree `controls.len() - 1` at `t`
pub fn bezier_point(controls: &[Point], t: f64) -> Point {
    let n = controls.len().saturating_sub(1);
    let mut point = Point::default();
    for (i, c) in controls.iter().enumerate() {
        let weight = binomial(n, i) as f64 * (1.0 - t).powi((n - i) as i32) * t.powi(i as i32);
        point.x += weight * c.x;
        point.y += weight * c.y;
    }
    point
}

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Cut the sampled shaft where the head begins, walking back from the tip
/// until `length` of arc has been covered. Returns the head base.
fn trim_to_head(shaft: &mut Vec<Point>, length: f64) -> Point {
    let mut covered = 0.0;
    let mut idx = shaft.len() - 1;
    while idx > 0 && covered < length {
        covered += shaft[idx].distance(shaft[idx - 1]);
        idx -= 1;
    }
    if covered < length {
        warn!(covered, length, "curved arrow is shorter than its head");
    }
    shaft.truncate(idx + 1);
    shaft[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bezier_endpoints() {
        let controls = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(10.0, 0.0),
        ];
        assert_eq!(bezier_point(&controls, 0.0), controls[0]);
        assert_eq!(bezier_point(&controls, 1.0), controls[2]);
        let mid = bezier_point(&controls, 0.5);
        assert!((mid.x - 5.0).abs() < 1e-12);
        assert!((mid.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(3, 0), 1);
        assert_eq!(binomial(3, 1), 3);
        assert_eq!(binomial(3, 2), 3);
        assert_eq!(binomial(3, 3), 1);
    }

    #[test]
    fn test_headless_curve_samples_full_length() {
        let arrow = CurvedArrow::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            1.0,
            false,
            11,
        )
        .unwrap();
        assert_eq!(arrow.shaft().len(), 11);
        assert_eq!(arrow.shaft()[10], Point::new(10.0, 0.0));
        assert!(arrow.head().is_none());
    }

    #[test]
    fn test_head_sits_at_tip_and_shaft_stops_short() {
        let arrow = CurvedArrow::new(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            2.0,
            true,
            DEFAULT_SAMPLES,
        )
        .unwrap();
        let head = arrow.head().unwrap();
        assert_eq!(head[1], Point::new(100.0, 0.0));
        let end = arrow.shaft()[arrow.shaft().len() - 1];
        assert!(100.0 - end.x >= head_length(2.0) - 1e-9);
        // flank on the +y side first (clockwise)
        assert!(head[0].y > 0.0 && head[2].y < 0.0);
        assert!((head[0].y - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_too_many_controls() {
        let controls = vec![Point::default(); 5];
        assert_eq!(
            CurvedArrow::new(controls, 1.0, false, 10).unwrap_err(),
            PathError::TooFewControlPoints { count: 5 }
        );
    }
}
