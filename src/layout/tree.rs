//! The logic tree canvas: named boxes, drawn arrows and text labels

use std::collections::HashMap;

use serde::Deserialize;

use crate::geometry::{Arrow, CurvedArrow, PathError, DEFAULT_SAMPLES};
use crate::log::{debug, warn};

use super::config::TreeConfig;
use super::error::LayoutError;
use super::find_similar;
use super::routing::{
    route_bisplit, route_connection, route_curve, CurveStyle, RouteOptions, RoutingMode,
};
use super::text::{measure_box, CharWidthMeasure, TextMeasure};
use super::types::*;

/// Stacking order of boxes; arrows below it are hidden behind boxes
pub const BOX_Z_ORDER: i32 = 3;

/// Stacking order of bifurcation branches
pub const BRANCH_Z_ORDER: i32 = 1000;

/// Stroke pattern for arrow outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// How an arrow is painted
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowStyle {
    /// Fill color; `None` draws the outline only
    pub fill: Option<String>,
    pub edge: String,
    /// Outline width in points
    pub line_width: f64,
    pub line_style: LineStyle,
    pub z_order: i32,
    /// Stroke the edge across the butt end
    pub close_butt: bool,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            fill: Some("black".to_string()),
            edge: "black".to_string(),
            line_width: 1.0,
            line_style: LineStyle::Solid,
            z_order: 1,
            close_butt: true,
        }
    }
}

/// Geometry of a drawn arrow
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowShape {
    Polygon(Arrow),
    Curve(CurvedArrow),
}

/// An arrow placed on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnArrow {
    pub shape: ArrowShape,
    pub style: ArrowStyle,
}

impl DrawnArrow {
    pub fn polygon(arrow: Arrow, style: ArrowStyle) -> Self {
        Self {
            shape: ArrowShape::Polygon(arrow),
            style,
        }
    }

    pub fn curve(arrow: CurvedArrow, style: ArrowStyle) -> Self {
        Self {
            shape: ArrowShape::Curve(arrow),
            style,
        }
    }
}

/// Free text placed on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Point,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub style: TextStyle,
}

/// Horizontal placement of the title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePosition {
    #[default]
    Left,
    Center,
    Right,
}

/// Where a branch label sits relative to the horizontal branch leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPlacement {
    #[default]
    Above,
    Below,
}

/// Target of a connection by name or by coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionTarget {
    Box(String),
    Point(Point),
}

impl From<&str> for ConnectionTarget {
    fn from(name: &str) -> Self {
        ConnectionTarget::Box(name.to_string())
    }
}

impl From<String> for ConnectionTarget {
    fn from(name: String) -> Self {
        ConnectionTarget::Box(name)
    }
}

impl From<Point> for ConnectionTarget {
    fn from(point: Point) -> Self {
        ConnectionTarget::Point(point)
    }
}

/// Request to add a box measured from its text
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpec {
    pub name: String,
    pub text: String,
    pub position: Point,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub face_color: String,
    pub edge_color: String,
    /// Outline width; the tree default when unset
    pub line_width: Option<f64>,
    pub shape: BoxShape,
    /// Padding in font sizes; the tree default when unset
    pub padding: Option<f64>,
    pub text_style: TextOverrides,
}

impl BoxSpec {
    pub fn new(name: impl Into<String>, text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            position: Point::new(x, y),
            h_align: HAlign::default(),
            v_align: VAlign::default(),
            face_color: "black".to_string(),
            edge_color: "white".to_string(),
            line_width: None,
            shape: BoxShape::default(),
            padding: None,
            text_style: TextOverrides::default(),
        }
    }

    pub fn with_colors(mut self, face: impl Into<String>, edge: impl Into<String>) -> Self {
        self.face_color = face.into();
        self.edge_color = edge.into();
        self
    }

    pub fn with_align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn with_text_style(mut self, overrides: TextOverrides) -> Self {
        self.text_style = overrides;
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }
}

/// Options for [`LogicTree::add_connection`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionOptions {
    pub mode: RoutingMode,
    pub route: RouteOptions,
    pub head: bool,
    /// Shaft width; the tree default when unset
    pub width: Option<f64>,
    pub fill: bool,
    pub fill_color: ColorChoice,
    pub edge_color: ColorChoice,
    /// Outline width; the tree default when unset
    pub line_width: Option<f64>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            mode: RoutingMode::Direct,
            route: RouteOptions::default(),
            head: true,
            width: None,
            fill: true,
            fill_color: ColorChoice::Inherit,
            edge_color: ColorChoice::Inherit,
            line_width: None,
        }
    }
}

impl ConnectionOptions {
    pub fn elbow() -> Self {
        Self {
            mode: RoutingMode::Elbow,
            ..Self::default()
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_route(mut self, route: RouteOptions) -> Self {
        self.route = route;
        self
    }
}

/// Label drawn beside one branch of a bifurcation
#[derive(Debug, Clone, PartialEq)]
pub struct BranchLabel {
    pub text: String,
    pub placement: LabelPlacement,
}

/// Colors for one box's part of a bifurcation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrowColors {
    pub fill: ColorChoice,
    pub edge: ColorChoice,
}

/// Options for [`LogicTree::add_bisplit`]
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    pub head: bool,
    pub width: Option<f64>,
    pub fill: bool,
    pub butt_offset: f64,
    pub tip_offset: f64,
    pub line_width: f64,
    /// Stem colors, resolved against the parent
    pub parent_colors: ArrowColors,
    /// Colors of the branch into the first child
    pub first_colors: ArrowColors,
    /// Colors of the branch into the second child
    pub second_colors: ArrowColors,
    pub left_label: Option<BranchLabel>,
    pub right_label: Option<BranchLabel>,
    pub label_style: TextStyle,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            head: true,
            width: None,
            fill: true,
            butt_offset: 0.0,
            tip_offset: 0.0,
            line_width: 0.5,
            parent_colors: ArrowColors::default(),
            first_colors: ArrowColors::default(),
            second_colors: ArrowColors::default(),
            left_label: None,
            right_label: None,
            label_style: TextStyle {
                font_family: "sans-serif".to_string(),
                font_size: 12.0,
                ..TextStyle::default()
            },
        }
    }
}

/// Options for [`LogicTree::add_curved_connection`]
#[derive(Debug, Clone, PartialEq)]
pub struct CurveOptions {
    pub style: CurveStyle,
    /// Explicit interior control points, overriding `style`
    pub controls: Option<Vec<Point>>,
    pub route: RouteOptions,
    pub head: bool,
    pub width: Option<f64>,
    pub fill: bool,
    pub fill_color: ColorChoice,
    pub edge_color: ColorChoice,
    pub line_width: Option<f64>,
    pub samples: usize,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            style: CurveStyle::default(),
            controls: None,
            route: RouteOptions::default(),
            head: true,
            width: None,
            fill: true,
            fill_color: ColorChoice::Inherit,
            edge_color: ColorChoice::Inherit,
            line_width: None,
            samples: DEFAULT_SAMPLES,
        }
    }
}

/// Options for [`LogicTree::add_arrow_between`]
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowOptions {
    pub width: f64,
    pub head: bool,
    pub butt_offset: f64,
    pub tip_offset: f64,
    pub fill: bool,
    pub style: ArrowStyle,
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self {
            width: 0.5,
            head: true,
            butt_offset: 0.0,
            tip_offset: 0.0,
            fill: true,
            style: ArrowStyle::default(),
        }
    }
}

/// A diagram under construction.
///
/// Boxes are registered once under unique names and never replaced; arrows
/// and labels are appended in drawing order. A failed operation leaves the
/// tree unchanged.
#[derive(Debug)]
pub struct LogicTree {
    config: TreeConfig,
    title: Option<String>,
    title_style: TextStyle,
    boxes: Vec<LogicBox>,
    index: HashMap<String, usize>,
    arrows: Vec<DrawnArrow>,
    labels: Vec<TextLabel>,
    title_label: Option<TextLabel>,
    measure: Box<dyn TextMeasure>,
}

impl LogicTree {
    pub fn new(config: TreeConfig) -> Self {
        let title_style = TextStyle {
            font_size: config.title_font_size,
            ..config.text_style.clone()
        };
        Self {
            config,
            title: None,
            title_style,
            boxes: Vec::new(),
            index: HashMap::new(),
            arrows: Vec::new(),
            labels: Vec::new(),
            title_label: None,
            measure: Box::new(CharWidthMeasure),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the title text style
    pub fn with_title_style(mut self, style: TextStyle) -> Self {
        self.title_style = style;
        self
    }

    /// Replace the text measurement used to size boxes
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Boxes in registration order
    pub fn boxes(&self) -> &[LogicBox] {
        &self.boxes
    }

    pub fn arrows(&self) -> &[DrawnArrow] {
        &self.arrows
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn title_label(&self) -> Option<&TextLabel> {
        self.title_label.as_ref()
    }

    /// Look up a box by name
    pub fn get(&self, name: &str) -> Result<&LogicBox, LayoutError> {
        self.index
            .get(name)
            .map(|&i| &self.boxes[i])
            .ok_or_else(|| {
                let names: Vec<&str> = self.boxes.iter().map(|b| b.name.as_str()).collect();
                LayoutError::unknown(name, find_similar(name, &names, 2))
            })
    }

    /// Add a box sized from its measured text
    pub fn add_box(&mut self, spec: BoxSpec) -> Result<&LogicBox, LayoutError> {
        if self.index.contains_key(&spec.name) {
            return Err(LayoutError::duplicate(spec.name));
        }

        let mut b = LogicBox::new(spec.name, spec.text, spec.position)
            .with_colors(spec.face_color, spec.edge_color);
        b.h_align = spec.h_align;
        b.v_align = spec.v_align;
        b.shape = spec.shape;
        b.line_width = spec.line_width.unwrap_or(self.config.box_line_width);
        b.text_style = self.config.text_style.merged(&spec.text_style);

        let config = match spec.padding {
            Some(padding) => self.config.clone().with_box_padding(padding),
            None => self.config.clone(),
        };
        let layout = measure_box(&b, &config, self.measure.as_ref());
        b.set_layout(layout);

        self.register_box(b)
    }

    /// Register a box laid out elsewhere (or not yet laid out)
    pub fn register_box(&mut self, b: LogicBox) -> Result<&LogicBox, LayoutError> {
        if self.index.contains_key(&b.name) {
            return Err(LayoutError::duplicate(b.name));
        }
        debug!(
            name = %b.name,
            laid_out = b.is_laid_out(),
            x_left = ?b.x_left,
            x_right = ?b.x_right,
            y_bottom = ?b.y_bottom,
            y_top = ?b.y_top,
            "registered box"
        );
        let idx = self.boxes.len();
        self.index.insert(b.name.clone(), idx);
        self.boxes.push(b);
        Ok(&self.boxes[idx])
    }

    /// Append a pre-built arrow
    pub fn add_arrow(&mut self, arrow: DrawnArrow) {
        self.arrows.push(arrow);
    }

    /// Append free text
    pub fn add_label(&mut self, label: TextLabel) {
        self.labels.push(label);
    }

    /// Straight arrow between two points, shortened by the butt and tip
    /// offsets along the line. Axis-aligned arrows are mitered polygons;
    /// any other angle is drawn as a straight stroked curve.
    pub fn add_arrow_between(
        &mut self,
        start: Point,
        end: Point,
        opts: &ArrowOptions,
    ) -> Result<(), LayoutError> {
        if start == end {
            return Err(PathError::NotAxisAligned {
                from: start,
                to: end,
            }
            .into());
        }
        let length = start.distance(end);
        let unit = ((end.x - start.x) / length, (end.y - start.y) / length);
        let start = start.offset_by(unit, opts.butt_offset);
        let end = end.offset_by(unit, -opts.tip_offset);

        let mut style = opts.style.clone();
        if !opts.fill {
            style.fill = None;
        }

        let shape = if start.x == end.x || start.y == end.y {
            ArrowShape::Polygon(Arrow::new(vec![start, end], opts.width, opts.head)?)
        } else {
            ArrowShape::Curve(CurvedArrow::new(vec![start, end], opts.width, opts.head, 2)?)
        };
        self.arrows.push(DrawnArrow { shape, style });
        Ok(())
    }

    /// Connect a box to another box or to a point.
    ///
    /// Colors left to inherit come from the target box, or from the source
    /// box when the target is a point.
    pub fn add_connection(
        &mut self,
        from: &str,
        to: impl Into<ConnectionTarget>,
        opts: &ConnectionOptions,
    ) -> Result<(), LayoutError> {
        let to = to.into();
        let source = self.get(from)?;
        let (endpoint, color_box) = self.endpoint(source, &to)?;

        let path = route_connection(source, endpoint, opts.mode, &opts.route)?;
        let arrow = Arrow::new(path, self.width_or_default(opts.width), opts.head)?;
        let style = ArrowStyle {
            fill: opts
                .fill
                .then(|| opts.fill_color.resolve(color_box, true)),
            edge: opts.edge_color.resolve(color_box, false),
            line_width: opts
                .line_width
                .unwrap_or(self.config.connection_line_width),
            ..ArrowStyle::default()
        };

        self.arrows.push(DrawnArrow::polygon(arrow, style));
        Ok(())
    }

    /// Split from `parent` into two children, with optional branch labels.
    ///
    /// Branches are assigned left and right by child x-center, so the
    /// argument order of the children does not change the drawing.
    pub fn add_bisplit(
        &mut self,
        parent: &str,
        first: &str,
        second: &str,
        opts: &SplitOptions,
    ) -> Result<(), LayoutError> {
        let p = self.get(parent)?;
        let a = self.get(first)?;
        let b = self.get(second)?;
        let width = self.width_or_default(opts.width);

        let split = route_bisplit(p, a, b, opts.butt_offset, opts.tip_offset)?;

        let style_for = |target: &LogicBox, colors: &ArrowColors, z_order: i32, close_butt| {
            ArrowStyle {
                fill: opts.fill.then(|| colors.fill.resolve(target, true)),
                edge: colors.edge.resolve(target, false),
                line_width: opts.line_width,
                z_order,
                close_butt,
                ..ArrowStyle::default()
            }
        };
        let colors_of = |target: &LogicBox| {
            if target.name == a.name {
                &opts.first_colors
            } else {
                &opts.second_colors
            }
        };

        let stem = DrawnArrow::polygon(
            Arrow::new(split.stem.clone(), width, false)?,
            style_for(p, &opts.parent_colors, 1, true),
        );
        let mut drawn = vec![stem];
        let mut labels = Vec::new();
        for (branch, label) in [
            (&split.left, &opts.left_label),
            (&split.right, &opts.right_label),
        ] {
            let arrow = Arrow::new(branch.path.clone(), width, opts.head)?;
            let style = style_for(branch.target, colors_of(branch.target), BRANCH_Z_ORDER, false);
            drawn.push(DrawnArrow::polygon(arrow, style));
            if let Some(label) = label {
                labels.push(branch_label(label, &branch.path, width, &opts.label_style));
            }
        }

        debug!(
            parent,
            left = %split.left.target.name,
            right = %split.right.target.name,
            "added bifurcation"
        );
        self.arrows.extend(drawn);
        self.labels.extend(labels);
        Ok(())
    }

    /// Connect a box to another box or a point with a bezier arrow
    pub fn add_curved_connection(
        &mut self,
        from: &str,
        to: impl Into<ConnectionTarget>,
        opts: &CurveOptions,
    ) -> Result<(), LayoutError> {
        let to = to.into();
        let source = self.get(from)?;
        let (endpoint, color_box) = self.endpoint(source, &to)?;

        let controls = route_curve(
            source,
            endpoint,
            opts.style,
            opts.controls.as_deref(),
            &opts.route,
        )?;
        let arrow = CurvedArrow::new(
            controls,
            self.width_or_default(opts.width),
            opts.head,
            opts.samples,
        )?;
        let style = ArrowStyle {
            fill: opts
                .fill
                .then(|| opts.fill_color.resolve(color_box, true)),
            edge: opts.edge_color.resolve(color_box, false),
            line_width: opts
                .line_width
                .unwrap_or(self.config.connection_line_width),
            ..ArrowStyle::default()
        };

        self.arrows.push(DrawnArrow::curve(arrow, style));
        Ok(())
    }

    /// Place the title at the top of the canvas.
    ///
    /// With `consider_box_extents` the title aligns to the horizontal span of
    /// all boxes, otherwise to the canvas limits.
    pub fn make_title(
        &mut self,
        position: TitlePosition,
        consider_box_extents: bool,
        new_title: Option<String>,
    ) -> Result<&TextLabel, LayoutError> {
        let text = match new_title.or_else(|| self.title.clone()) {
            Some(text) => text,
            None => return Err(LayoutError::MissingTitle),
        };

        let (x_min, x_max) = if consider_box_extents && !self.boxes.is_empty() {
            let mut extent: Option<BoxLayout> = None;
            for b in &self.boxes {
                let layout = b.layout()?;
                extent = Some(match extent {
                    Some(e) => e.union(&layout),
                    None => layout,
                });
            }
            extent.map_or(self.config.x_lims, |e| (e.x_left, e.x_right))
        } else {
            if consider_box_extents {
                warn!("no boxes to align the title to; using the canvas limits");
            }
            self.config.x_lims
        };

        let (x, h_align) = match position {
            TitlePosition::Left => (x_min, HAlign::Left),
            TitlePosition::Center => ((x_min + x_max) / 2.0, HAlign::Center),
            TitlePosition::Right => (x_max, HAlign::Right),
        };

        self.title = Some(text.clone());
        Ok(self.title_label.insert(TextLabel {
            text,
            position: Point::new(x, self.config.y_lims.1),
            h_align,
            v_align: VAlign::Top,
            style: self.title_style.clone(),
        }))
    }

    fn width_or_default(&self, width: Option<f64>) -> f64 {
        width.unwrap_or(self.config.connection_width)
    }

    fn endpoint<'a>(
        &'a self,
        source: &'a LogicBox,
        to: &ConnectionTarget,
    ) -> Result<(Endpoint<'a>, &'a LogicBox), LayoutError> {
        match to {
            ConnectionTarget::Box(name) => {
                let target = self.get(name)?;
                Ok((Endpoint::Box(target), target))
            }
            ConnectionTarget::Point(p) => Ok((Endpoint::Point(*p), source)),
        }
    }
}

/// Label centered on the horizontal leg of a branch, nudged toward the child
fn branch_label(label: &BranchLabel, path: &[Point], width: f64, style: &TextStyle) -> TextLabel {
    let (first, last) = (path[0], path[path.len() - 1]);
    let nudge = if first.x < last.x { width / 2.0 } else { -width / 2.0 };
    let (y, v_align) = match label.placement {
        LabelPlacement::Above => (first.y + width * 0.95, VAlign::Bottom),
        LabelPlacement::Below => (first.y - width * 0.95, VAlign::Top),
    };
    TextLabel {
        text: label.text.clone(),
        position: Point::new((first.x + last.x) / 2.0 + nudge, y),
        h_align: HAlign::Center,
        v_align,
        style: style.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn laid_out(name: &str, x_left: f64, x_right: f64, y_bottom: f64, y_top: f64) -> LogicBox {
        LogicBox::new(name, name, Point::default())
            .with_colors(format!("{name}-face"), format!("{name}-edge"))
            .with_layout(BoxLayout::from_extents(x_left, x_right, y_bottom, y_top))
    }

    fn tree() -> LogicTree {
        let mut tree = LogicTree::new(TreeConfig::default());
        tree.register_box(laid_out("root", 40.0, 60.0, 80.0, 90.0)).unwrap();
        tree.register_box(laid_out("yes", 10.0, 30.0, 40.0, 50.0)).unwrap();
        tree.register_box(laid_out("no", 70.0, 90.0, 40.0, 50.0)).unwrap();
        tree
    }

    #[test]
    fn test_add_box_measures_layout() {
        let mut tree = LogicTree::new(TreeConfig::default());
        let b = tree
            .add_box(BoxSpec::new("start", "Start here", 50.0, 50.0))
            .unwrap();
        let layout = b.layout().unwrap();
        assert!(layout.width > 0.0);
        assert!((layout.x_center - 50.0).abs() < 1e-9);
        assert_eq!(b.text_style.font_family, "Times New Roman");
    }

    #[test]
    fn test_duplicate_name_is_rejected_without_mutation() {
        let mut tree = tree();
        let err = tree
            .add_box(BoxSpec::new("root", "again", 10.0, 10.0))
            .unwrap_err();
        assert_eq!(err, LayoutError::duplicate("root"));
        assert_eq!(tree.boxes().len(), 3);
        assert_eq!(tree.get("root").unwrap().text, "root");
    }

    #[test]
    fn test_unknown_box_suggests_close_names() {
        let tree = tree();
        let err = tree.get("rot").unwrap_err();
        assert_eq!(err.suggestions(), Some(&["root".to_string()][..]));
    }

    #[test]
    fn test_connection_inherits_target_colors() {
        let mut tree = tree();
        tree.add_connection("root", "no", &ConnectionOptions::elbow())
            .unwrap();
        let drawn = &tree.arrows()[0];
        assert_eq!(drawn.style.fill.as_deref(), Some("no-face"));
        assert_eq!(drawn.style.edge, "no-edge");
        assert_eq!(drawn.style.line_width, 0.7);
        match &drawn.shape {
            ArrowShape::Polygon(arrow) => assert_eq!(arrow.width(), 0.5),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_connection_color_shorthands() {
        let mut tree = tree();
        let opts = ConnectionOptions {
            fill_color: ColorChoice::Edge,
            edge_color: ColorChoice::Value("red".to_string()),
            ..ConnectionOptions::elbow()
        };
        tree.add_connection("root", "yes", &opts).unwrap();
        let style = &tree.arrows()[0].style;
        assert_eq!(style.fill.as_deref(), Some("yes-edge"));
        assert_eq!(style.edge, "red");
    }

    #[test]
    fn test_unfilled_connection() {
        let mut tree = tree();
        let opts = ConnectionOptions {
            fill: false,
            ..ConnectionOptions::elbow()
        };
        tree.add_connection("root", "yes", &opts).unwrap();
        assert_eq!(tree.arrows()[0].style.fill, None);
    }

    #[test]
    fn test_connection_to_point_uses_source_colors() {
        let mut tree = tree();
        tree.add_connection("root", Point::new(50.0, 99.0), &ConnectionOptions::default())
            .unwrap();
        assert_eq!(tree.arrows()[0].style.fill.as_deref(), Some("root-face"));
    }

    #[test]
    fn test_failed_connection_leaves_tree_unchanged() {
        let mut tree = tree();
        tree.register_box(LogicBox::new("pending", "P", Point::new(5.0, 5.0)))
            .unwrap();
        let err = tree
            .add_connection("root", "pending", &ConnectionOptions::default())
            .unwrap_err();
        assert_eq!(err, LayoutError::uninitialized("pending", "x_left"));
        assert!(tree.arrows().is_empty());

        let err = tree
            .add_bisplit("root", "yes", "pending", &SplitOptions::default())
            .unwrap_err();
        assert!(matches!(err, LayoutError::UninitializedLayout { .. }));
        assert!(tree.arrows().is_empty());
    }

    #[test]
    fn test_bisplit_draws_stem_and_branches() {
        let mut tree = tree();
        let opts = SplitOptions {
            parent_colors: ArrowColors {
                fill: ColorChoice::Edge,
                edge: ColorChoice::Inherit,
            },
            left_label: Some(BranchLabel {
                text: "Yes".to_string(),
                placement: LabelPlacement::Above,
            }),
            ..SplitOptions::default()
        };
        tree.add_bisplit("root", "no", "yes", &opts).unwrap();

        let arrows = tree.arrows();
        assert_eq!(arrows.len(), 3);
        assert_eq!(arrows[0].style.fill.as_deref(), Some("root-edge"));
        assert_eq!(arrows[1].style.fill.as_deref(), Some("yes-face"));
        assert_eq!(arrows[1].style.z_order, BRANCH_Z_ORDER);
        assert!(!arrows[1].style.close_butt);
        assert_eq!(arrows[2].style.edge, "no-edge");

        let label = &tree.labels()[0];
        assert_eq!(label.text, "Yes");
        assert_eq!(label.v_align, VAlign::Bottom);
        // stem at y = 65, branch leg from x = 50 to x = 20
        assert!((label.position.x - 34.75).abs() < 1e-9);
        assert!((label.position.y - 65.475).abs() < 1e-9);
    }

    #[test]
    fn test_bisplit_is_commutative_in_children() {
        let mut forward = tree();
        let mut swapped = tree();
        forward
            .add_bisplit("root", "yes", "no", &SplitOptions::default())
            .unwrap();
        swapped
            .add_bisplit("root", "no", "yes", &SplitOptions::default())
            .unwrap();
        assert_eq!(forward.arrows(), swapped.arrows());
    }

    #[test]
    fn test_curved_connection() {
        let mut tree = tree();
        tree.add_curved_connection("yes", "no", &CurveOptions::default())
            .unwrap();
        match &tree.arrows()[0].shape {
            ArrowShape::Curve(curve) => {
                assert_eq!(curve.controls().len(), 3);
                assert!(curve.has_head());
            }
            other => panic!("expected curve, got {other:?}"),
        }
    }

    #[test]
    fn test_arrow_between_offsets_and_shape() {
        let mut tree = tree();
        let opts = ArrowOptions {
            butt_offset: 1.0,
            tip_offset: 2.0,
            head: false,
            ..ArrowOptions::default()
        };
        tree.add_arrow_between(Point::new(0.0, 0.0), Point::new(10.0, 0.0), &opts)
            .unwrap();
        tree.add_arrow_between(Point::new(0.0, 0.0), Point::new(10.0, 10.0), &opts)
            .unwrap();

        match &tree.arrows()[0].shape {
            ArrowShape::Polygon(arrow) => {
                assert_eq!(arrow.path(), &[Point::new(1.0, 0.0), Point::new(8.0, 0.0)]);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
        assert!(matches!(tree.arrows()[1].shape, ArrowShape::Curve(_)));

        let err = tree
            .add_arrow_between(Point::new(3.0, 3.0), Point::new(3.0, 3.0), &opts)
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPath(_)));
    }

    #[test]
    fn test_make_title_positions() {
        let mut tree = tree().with_title("Decisions");

        let label = tree.make_title(TitlePosition::Left, true, None).unwrap();
        assert_eq!(label.position, Point::new(10.0, 100.0));
        assert_eq!(label.h_align, HAlign::Left);
        assert_eq!(label.style.font_size, 34.0);

        let label = tree.make_title(TitlePosition::Center, false, None).unwrap();
        assert_eq!(label.position, Point::new(50.0, 100.0));

        let label = tree
            .make_title(TitlePosition::Right, true, Some("Renamed".to_string()))
            .unwrap();
        assert_eq!(label.position.x, 90.0);
        assert_eq!(tree.title(), Some("Renamed"));
    }

    #[test]
    fn test_make_title_requires_text() {
        let mut tree = tree();
        assert_eq!(
            tree.make_title(TitlePosition::Left, false, None).unwrap_err(),
            LayoutError::MissingTitle
        );
    }
}
