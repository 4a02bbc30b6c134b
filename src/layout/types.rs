//! Core types for box layout and routing

use serde::Deserialize;

pub use crate::geometry::Point;

use super::error::LayoutError;

/// Computed extents of a box in data coordinates (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayout {
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bottom: f64,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxLayout {
    /// Derive a layout from the four edge coordinates
    pub fn from_extents(x_left: f64, x_right: f64, y_bottom: f64, y_top: f64) -> Self {
        Self {
            x_left,
            x_right,
            y_top,
            y_bottom,
            x_center: (x_left + x_right) / 2.0,
            y_center: (y_bottom + y_top) / 2.0,
            width: x_right - x_left,
            height: y_top - y_bottom,
        }
    }

    /// Center point of the box
    pub fn center(&self) -> Point {
        Point::new(self.x_center, self.y_center)
    }

    /// Point on an edge, corner or the center of the box, pushed outward
    /// along the side's direction by `offset`
    pub fn side_point(&self, side: Side, offset: f64) -> Point {
        let base = match side {
            Side::Left => Point::new(self.x_left, self.y_center),
            Side::Right => Point::new(self.x_right, self.y_center),
            Side::Top => Point::new(self.x_center, self.y_top),
            Side::Bottom => Point::new(self.x_center, self.y_bottom),
            Side::Center => self.center(),
            Side::TopLeft => Point::new(self.x_left, self.y_top),
            Side::TopRight => Point::new(self.x_right, self.y_top),
            Side::BottomLeft => Point::new(self.x_left, self.y_bottom),
            Side::BottomRight => Point::new(self.x_right, self.y_bottom),
        };
        side.nudge(base, offset)
    }

    /// Smallest layout containing both
    pub fn union(&self, other: &BoxLayout) -> BoxLayout {
        BoxLayout::from_extents(
            self.x_left.min(other.x_left),
            self.x_right.max(other.x_right),
            self.y_bottom.min(other.y_bottom),
            self.y_top.max(other.y_top),
        )
    }
}

/// Axis a box side faces along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Attachment location on a box: four edges, four corners or the center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    #[serde(alias = "topLeft")]
    TopLeft,
    Top,
    #[serde(alias = "topRight")]
    TopRight,
    Right,
    #[serde(alias = "bottomRight")]
    BottomRight,
    Bottom,
    #[serde(alias = "bottomLeft")]
    BottomLeft,
    Center,
}

/// Outward direction of each side, one unit per axis
const SIDE_NORMALS: [(Side, (f64, f64)); 9] = [
    (Side::Left, (-1.0, 0.0)),
    (Side::TopLeft, (-1.0, 1.0)),
    (Side::Top, (0.0, 1.0)),
    (Side::TopRight, (1.0, 1.0)),
    (Side::Right, (1.0, 0.0)),
    (Side::BottomRight, (1.0, -1.0)),
    (Side::Bottom, (0.0, -1.0)),
    (Side::BottomLeft, (-1.0, -1.0)),
    (Side::Center, (0.0, 0.0)),
];

impl Side {
    /// Outward direction of the side; zero for the center
    pub fn normal(self) -> (f64, f64) {
        SIDE_NORMALS
            .iter()
            .find(|(side, _)| *side == self)
            .map(|(_, n)| *n)
            .unwrap_or((0.0, 0.0))
    }

    /// Push `point` outward from this side by `offset`
    pub fn nudge(self, point: Point, offset: f64) -> Point {
        if offset == 0.0 {
            return point;
        }
        point.offset_by(self.normal(), offset)
    }

    /// Axis a straight leg leaves this side along, if the side is an edge
    pub fn axis(self) -> Option<Axis> {
        match self {
            Side::Left | Side::Right => Some(Axis::Horizontal),
            Side::Top | Side::Bottom => Some(Axis::Vertical),
            _ => None,
        }
    }

    /// Pick the edge facing a target at `theta` degrees (atan2 of the center
    /// offset). Quadrants are 90 degrees wide and centered on the cardinal
    /// directions; the source takes the facing edge, the target the opposite.
    pub fn from_angle(theta: f64, for_source: bool) -> Side {
        let (source, target) = if (-45.0..=45.0).contains(&theta) {
            (Side::Right, Side::Left)
        } else if theta > 45.0 && theta <= 135.0 {
            (Side::Top, Side::Bottom)
        } else if !(-135.0..=135.0).contains(&theta) {
            (Side::Left, Side::Right)
        } else {
            (Side::Bottom, Side::Top)
        };
        if for_source {
            source
        } else {
            target
        }
    }
}

/// Horizontal anchoring of a box's text relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical anchoring of a box's text relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Outline shape of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxShape {
    Square,
    #[default]
    Round,
}

/// Text rendering settings carried with each draw request
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in points
    pub font_size: f64,
    pub color: String,
    pub weight: FontWeight,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            font_size: 15.0,
            color: "white".to_string(),
            weight: FontWeight::Normal,
            underline: false,
        }
    }
}

impl TextStyle {
    /// Apply per-request overrides on top of this style
    pub fn merged(&self, overrides: &TextOverrides) -> TextStyle {
        TextStyle {
            font_family: overrides
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            font_size: overrides.font_size.unwrap_or(self.font_size),
            color: overrides.color.clone().unwrap_or_else(|| self.color.clone()),
            weight: overrides.weight.unwrap_or(self.weight),
            underline: overrides.underline.unwrap_or(self.underline),
        }
    }
}

/// Optional overrides for a [`TextStyle`]
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextOverrides {
    #[serde(alias = "family")]
    pub font_family: Option<String>,
    #[serde(alias = "size")]
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub weight: Option<FontWeight>,
    pub underline: Option<bool>,
}

/// Which box attribute an arrow color is taken from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Face color for fills, edge color for outlines
    #[default]
    Inherit,
    /// The box's face color
    Face,
    /// The box's edge color
    Edge,
    /// An explicit color value
    Value(String),
}

impl ColorChoice {
    /// Parse the shorthand used in diagram files: `fc` / `ec` select a box
    /// attribute, anything else is a literal color
    pub fn parse(value: &str) -> Self {
        match value {
            "fc" | "face" => ColorChoice::Face,
            "ec" | "edge" => ColorChoice::Edge,
            other => ColorChoice::Value(other.to_string()),
        }
    }

    /// Resolve against a box; `for_fill` picks what `Inherit` means
    pub fn resolve(&self, source: &LogicBox, for_fill: bool) -> String {
        match self {
            ColorChoice::Inherit if for_fill => source.face_color.clone(),
            ColorChoice::Inherit => source.edge_color.clone(),
            ColorChoice::Face => source.face_color.clone(),
            ColorChoice::Edge => source.edge_color.clone(),
            ColorChoice::Value(v) => v.clone(),
        }
    }
}

impl From<&str> for ColorChoice {
    fn from(value: &str) -> Self {
        ColorChoice::parse(value)
    }
}

/// A labeled rectangular region of the diagram.
///
/// The layout fields are filled in from measured text extents; until then
/// they are `None` and any routing call against the box fails.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicBox {
    pub name: String,
    pub text: String,
    /// Anchor position the alignment is relative to
    pub position: Point,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub face_color: String,
    pub edge_color: String,
    pub line_width: f64,
    pub shape: BoxShape,
    pub text_style: TextStyle,

    pub x_left: Option<f64>,
    pub x_right: Option<f64>,
    pub y_top: Option<f64>,
    pub y_bottom: Option<f64>,
    pub x_center: Option<f64>,
    pub y_center: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl LogicBox {
    /// Create a box with no layout yet
    pub fn new(name: impl Into<String>, text: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            position,
            h_align: HAlign::default(),
            v_align: VAlign::default(),
            face_color: "black".to_string(),
            edge_color: "white".to_string(),
            line_width: 1.6,
            shape: BoxShape::default(),
            text_style: TextStyle::default(),
            x_left: None,
            x_right: None,
            y_top: None,
            y_bottom: None,
            x_center: None,
            y_center: None,
            width: None,
            height: None,
        }
    }

    /// Set face and edge colors
    pub fn with_colors(mut self, face: impl Into<String>, edge: impl Into<String>) -> Self {
        self.face_color = face.into();
        self.edge_color = edge.into();
        self
    }

    /// Populate every layout field from computed extents
    pub fn with_layout(mut self, layout: BoxLayout) -> Self {
        self.set_layout(layout);
        self
    }

    /// Populate every layout field from computed extents
    pub fn set_layout(&mut self, layout: BoxLayout) {
        self.x_left = Some(layout.x_left);
        self.x_right = Some(layout.x_right);
        self.y_top = Some(layout.y_top);
        self.y_bottom = Some(layout.y_bottom);
        self.x_center = Some(layout.x_center);
        self.y_center = Some(layout.y_center);
        self.width = Some(layout.width);
        self.height = Some(layout.height);
    }

    /// Read back the layout, naming the first field still missing
    pub fn layout(&self) -> Result<BoxLayout, LayoutError> {
        let field = |value: Option<f64>, name: &'static str| {
            value.ok_or_else(|| LayoutError::uninitialized(self.name.clone(), name))
        };
        Ok(BoxLayout {
            x_left: field(self.x_left, "x_left")?,
            x_right: field(self.x_right, "x_right")?,
            y_top: field(self.y_top, "y_top")?,
            y_bottom: field(self.y_bottom, "y_bottom")?,
            x_center: field(self.x_center, "x_center")?,
            y_center: field(self.y_center, "y_center")?,
            width: field(self.width, "width")?,
            height: field(self.height, "height")?,
        })
    }

    pub fn is_laid_out(&self) -> bool {
        self.layout().is_ok()
    }
}

/// One end of a connection: a box or a raw point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint<'a> {
    Box(&'a LogicBox),
    Point(Point),
}

impl<'a> From<&'a LogicBox> for Endpoint<'a> {
    fn from(b: &'a LogicBox) -> Self {
        Endpoint::Box(b)
    }
}

impl From<Point> for Endpoint<'_> {
    fn from(p: Point) -> Self {
        Endpoint::Point(p)
    }
}
