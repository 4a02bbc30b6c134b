//! Connection routing between boxes

use serde::Deserialize;

use crate::log::debug;

use super::error::LayoutError;
use super::types::*;

/// Routing mode for box-to-box connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Single straight segment; endpoints must share a row or column
    #[default]
    Direct,
    /// Orthogonal routing with one or two bends
    Elbow,
}

/// Shape of the control polygon for curved connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveStyle {
    /// Gentle arc bowed to the left of the travel direction
    #[default]
    Smooth,
    /// Right-angle corner softened by the curve
    Elbow,
    /// Symmetric double bend
    #[serde(alias = "s_curve", alias = "scurve")]
    SCurve,
}

/// Attachment options shared by every router
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteOptions {
    /// Side of the source box; inferred from the box centers when unset
    pub from_side: Option<Side>,
    /// Side of the target box; inferred from the box centers when unset
    pub to_side: Option<Side>,
    /// Distance the start is pushed away from the source
    pub butt_offset: f64,
    /// Distance the tip is held back from the target
    pub tip_offset: f64,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sides(mut self, from: Option<Side>, to: Option<Side>) -> Self {
        self.from_side = from;
        self.to_side = to;
        self
    }

    pub fn with_offsets(mut self, butt: f64, tip: f64) -> Self {
        self.butt_offset = butt;
        self.tip_offset = tip;
        self
    }
}

/// Resolved attachment of a connection
#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchors {
    start: Point,
    end: Point,
    from_side: Side,
    to_side: Side,
    /// Offset from the source center to the target center (or point)
    delta: (f64, f64),
    from_layout: BoxLayout,
    /// Target extents, or a zero-size layout at the target point
    to_layout: BoxLayout,
}

fn resolve_anchors(
    from: &LogicBox,
    to: Endpoint<'_>,
    opts: &RouteOptions,
) -> Result<Anchors, LayoutError> {
    let from_layout = from.layout()?;
    let to_layout = match to {
        Endpoint::Box(b) => {
            let layout = b.layout()?;
            if layout.center() == from_layout.center() {
                return Err(LayoutError::ambiguous(format!(
                    "boxes '{}' and '{}' share the same center",
                    from.name, b.name
                )));
            }
            layout
        }
        Endpoint::Point(p) => {
            if p == from_layout.center() {
                return Err(LayoutError::ambiguous(format!(
                    "point {} is the center of box '{}'",
                    p, from.name
                )));
            }
            BoxLayout::from_extents(p.x, p.x, p.y, p.y)
        }
    };

    let delta = (
        to_layout.x_center - from_layout.x_center,
        to_layout.y_center - from_layout.y_center,
    );
    let theta = delta.1.atan2(delta.0).to_degrees();
    let from_side = opts.from_side.unwrap_or_else(|| Side::from_angle(theta, true));
    let to_side = opts.to_side.unwrap_or_else(|| Side::from_angle(theta, false));

    let start = from_layout.side_point(from_side, opts.butt_offset);
    let end = match to {
        Endpoint::Box(_) => to_layout.side_point(to_side, opts.tip_offset),
        Endpoint::Point(p) => to_side.nudge(p, opts.tip_offset),
    };

    debug!(
        from = %from.name,
        ?from_side,
        ?to_side,
        start = %start,
        end = %end,
        "resolved connection anchors"
    );

    Ok(Anchors {
        start,
        end,
        from_side,
        to_side,
        delta,
        from_layout,
        to_layout,
    })
}

/// Route a connection from a box to another box or a point.
///
/// Both boxes must be laid out. Direct routing requires the resolved
/// endpoints to share an axis; elbow routing inserts one bend when the two
/// legs leave on different axes and two bends at the midpoint between the
/// facing edges otherwise.
pub fn route_connection(
    from: &LogicBox,
    to: Endpoint<'_>,
    mode: RoutingMode,
    opts: &RouteOptions,
) -> Result<Vec<Point>, LayoutError> {
    let a = resolve_anchors(from, to, opts)?;
    let aligned = a.start.x == a.end.x || a.start.y == a.end.y;

    let path = match mode {
        RoutingMode::Direct if aligned => vec![a.start, a.end],
        RoutingMode::Direct => {
            return Err(LayoutError::ambiguous(format!(
                "direct connection from '{}' needs endpoints in a shared row or column, \
                 got {} and {}; use elbow routing",
                from.name, a.start, a.end
            )))
        }
        RoutingMode::Elbow if aligned => vec![a.start, a.end],
        RoutingMode::Elbow => elbow_path(&a),
    };

    debug!(from = %from.name, ?mode, points = path.len(), "routed connection");
    Ok(path)
}

fn elbow_path(a: &Anchors) -> Vec<Point> {
    let from_axis = a
        .from_side
        .axis()
        .or_else(|| a.to_side.axis())
        .unwrap_or(Axis::Vertical);
    let to_axis = a.to_side.axis().unwrap_or(from_axis);

    let path = match (from_axis, to_axis) {
        (Axis::Vertical, Axis::Vertical) => {
            let mid_y = if a.delta.1 > 0.0 {
                (a.from_layout.y_top + a.to_layout.y_bottom) / 2.0
            } else {
                (a.from_layout.y_bottom + a.to_layout.y_top) / 2.0
            };
            vec![
                a.start,
                Point::new(a.start.x, mid_y),
                Point::new(a.end.x, mid_y),
                a.end,
            ]
        }
        (Axis::Horizontal, Axis::Horizontal) => {
            let mid_x = if a.delta.0 > 0.0 {
                (a.from_layout.x_right + a.to_layout.x_left) / 2.0
            } else {
                (a.from_layout.x_left + a.to_layout.x_right) / 2.0
            };
            vec![
                a.start,
                Point::new(mid_x, a.start.y),
                Point::new(mid_x, a.end.y),
                a.end,
            ]
        }
        (Axis::Horizontal, Axis::Vertical) => {
            vec![a.start, Point::new(a.end.x, a.start.y), a.end]
        }
        (Axis::Vertical, Axis::Horizontal) => {
            vec![a.start, Point::new(a.start.x, a.end.y), a.end]
        }
    };
    dedup_points(path)
}

fn dedup_points(mut path: Vec<Point>) -> Vec<Point> {
    path.dedup();
    path
}

/// One branch of a bifurcation
#[derive(Debug, Clone, PartialEq)]
pub struct Branch<'a> {
    pub target: &'a LogicBox,
    pub path: Vec<Point>,
}

/// Stem and the two branches of a bifurcation, ordered by child x-center
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRoute<'a> {
    pub stem: Vec<Point>,
    pub left: Branch<'a>,
    pub right: Branch<'a>,
}

/// Route a parent box to two children stacked on the same side of it.
///
/// The stem leaves the parent's facing edge and stops halfway to the nearer
/// child edge; each branch runs horizontally to its child's center and then
/// vertically into the child. The parent must be strictly above or strictly
/// below both children.
pub fn route_bisplit<'a>(
    parent: &LogicBox,
    first: &'a LogicBox,
    second: &'a LogicBox,
    butt_offset: f64,
    tip_offset: f64,
) -> Result<SplitRoute<'a>, LayoutError> {
    let p = parent.layout()?;
    let f = first.layout()?;
    let s = second.layout()?;

    let (start, stem_y) = if p.y_center > f.y_center && p.y_center > s.y_center {
        let start = Point::new(p.x_center, p.y_bottom - butt_offset);
        (start, (start.y + f.y_top.max(s.y_top)) / 2.0)
    } else if p.y_center < f.y_center && p.y_center < s.y_center {
        let start = Point::new(p.x_center, p.y_top + butt_offset);
        (start, (start.y + f.y_bottom.min(s.y_bottom)) / 2.0)
    } else {
        return Err(LayoutError::ambiguous(format!(
            "box '{}' must be strictly above or below both '{}' and '{}'",
            parent.name, first.name, second.name
        )));
    };

    let ((left, ll), (right, rl)) = if f.x_center < s.x_center {
        ((first, f), (second, s))
    } else if s.x_center < f.x_center {
        ((second, s), (first, f))
    } else {
        return Err(LayoutError::ambiguous(format!(
            "boxes '{}' and '{}' share the same x-center; cannot tell left from right",
            first.name, second.name
        )));
    };

    let stem_end = Point::new(start.x, stem_y);
    let branch = |layout: &BoxLayout| {
        let tip_y = if stem_y > layout.y_center {
            layout.y_top + tip_offset
        } else {
            layout.y_bottom - tip_offset
        };
        dedup_points(vec![
            stem_end,
            Point::new(layout.x_center, stem_y),
            Point::new(layout.x_center, tip_y),
        ])
    };

    debug!(
        parent = %parent.name,
        left = %left.name,
        right = %right.name,
        stem_y,
        "routed bifurcation"
    );

    Ok(SplitRoute {
        stem: vec![start, stem_end],
        left: Branch {
            target: left,
            path: branch(&ll),
        },
        right: Branch {
            target: right,
            path: branch(&rl),
        },
    })
}

/// Control points for a curved connection: start, zero to two controls, end.
///
/// Explicit `controls` replace the styled ones.
pub fn route_curve(
    from: &LogicBox,
    to: Endpoint<'_>,
    style: CurveStyle,
    controls: Option<&[Point]>,
    opts: &RouteOptions,
) -> Result<Vec<Point>, LayoutError> {
    let a = resolve_anchors(from, to, opts)?;
    let (start, end) = (a.start, a.end);
    let (dx, dy) = a.delta;

    let points = match controls {
        Some(controls) => {
            let mut points = Vec::with_capacity(controls.len() + 2);
            points.push(start);
            points.extend_from_slice(controls);
            points.push(end);
            points
        }
        None => match style {
            CurveStyle::Smooth => {
                let ctrl = start.midpoint(end).offset_by((-dy, dx), 0.2);
                vec![start, ctrl, end]
            }
            CurveStyle::Elbow => vec![start, Point::new(end.x, start.y), end],
            CurveStyle::SCurve => {
                let d = 0.3 * dx.hypot(dy);
                let ctrl1 = Point::new(
                    (2.0 * start.x + end.x) / 3.0,
                    (2.0 * start.y + end.y) / 3.0 - d,
                );
                let ctrl2 = Point::new(
                    (start.x + 2.0 * end.x) / 3.0,
                    (start.y + 2.0 * end.y) / 3.0 + d,
                );
                vec![start, ctrl1, ctrl2, end]
            }
        },
    };

    debug!(from = %from.name, ?style, controls = points.len(), "routed curve");
    Ok(points)
}
