//! TOML diagram descriptions
//!
//! A diagram file declares the canvas, the boxes and every connection
//! between them:
//!
//! ```toml
//! [canvas]
//! x_lims = [0, 100]
//! y_lims = [0, 100]
//! title = "Sample Occurrence"
//!
//! [[box]]
//! name = "total"
//! text = "Total (N = 1,024)"
//! x = 50
//! y = 80
//!
//! [[box]]
//! name = "kept"
//! text = "Kept"
//! x = 25
//! y = 40
//!
//! [[box]]
//! name = "dropped"
//! text = "Dropped"
//! x = 75
//! y = 40
//!
//! [[split]]
//! parent = "total"
//! children = ["kept", "dropped"]
//!
//! [title]
//! position = "center"
//! ```
//!
//! Entries are applied in table order: boxes, connections, splits, curves,
//! free arrows, text, then the title.

use serde::Deserialize;
use toml::Spanned;

use crate::error::DiagramParseError;
use crate::geometry::Point;
use crate::layout::{
    ArrowColors, ArrowOptions, ArrowStyle, BoxShape, BoxSpec, BranchLabel, ColorChoice,
    ConnectionOptions, ConnectionTarget, CurveOptions, CurveStyle, HAlign, LabelPlacement,
    LayoutError, LineStyle, LogicTree, RouteOptions, RoutingMode, Side, SplitOptions, TextLabel,
    TextOverrides, TitlePosition, TreeConfig, VAlign,
};
use crate::log::debug;

/// A parsed diagram description
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Diagram {
    #[serde(default)]
    pub canvas: CanvasEntry,
    #[serde(default, rename = "box")]
    pub boxes: Vec<Spanned<BoxEntry>>,
    #[serde(default, rename = "connection")]
    pub connections: Vec<Spanned<ConnectionEntry>>,
    #[serde(default, rename = "split")]
    pub splits: Vec<Spanned<SplitEntry>>,
    #[serde(default, rename = "curve")]
    pub curves: Vec<Spanned<CurveEntry>>,
    #[serde(default, rename = "arrow")]
    pub arrows: Vec<Spanned<ArrowEntry>>,
    #[serde(default, rename = "text")]
    pub texts: Vec<Spanned<TextEntry>>,
    pub title: Option<Spanned<TitleEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasEntry {
    pub fig_size: Option<[f64; 2]>,
    pub x_lims: Option<[f64; 2]>,
    pub y_lims: Option<[f64; 2]>,
    pub background: Option<String>,
    pub title: Option<String>,
    /// Default font for box text
    pub font: Option<TextOverrides>,
    /// Font for the title
    pub title_font: Option<TextOverrides>,
    pub box_padding: Option<f64>,
    pub box_line_width: Option<f64>,
    pub connection_width: Option<f64>,
    pub connection_line_width: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxEntry {
    pub name: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub h_align: HAlign,
    #[serde(default)]
    pub v_align: VAlign,
    pub face: Option<String>,
    pub edge: Option<String>,
    pub line_width: Option<f64>,
    #[serde(default)]
    pub shape: BoxShape,
    pub padding: Option<f64>,
    pub font: Option<TextOverrides>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionEntry {
    pub from: String,
    pub to: Option<String>,
    pub point: Option<[f64; 2]>,
    #[serde(default)]
    pub mode: RoutingMode,
    pub from_side: Option<Side>,
    pub to_side: Option<Side>,
    #[serde(default)]
    pub butt_offset: f64,
    #[serde(default)]
    pub tip_offset: f64,
    pub head: Option<bool>,
    pub width: Option<f64>,
    pub fill: Option<bool>,
    pub fill_color: Option<String>,
    pub edge_color: Option<String>,
    pub line_width: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitEntry {
    pub parent: String,
    pub children: [String; 2],
    pub head: Option<bool>,
    pub width: Option<f64>,
    pub fill: Option<bool>,
    #[serde(default)]
    pub butt_offset: f64,
    #[serde(default)]
    pub tip_offset: f64,
    pub line_width: Option<f64>,
    pub parent_fill: Option<String>,
    pub parent_edge: Option<String>,
    pub first_fill: Option<String>,
    pub first_edge: Option<String>,
    pub second_fill: Option<String>,
    pub second_edge: Option<String>,
    pub left_label: Option<String>,
    #[serde(default)]
    pub left_label_placement: LabelPlacement,
    pub right_label: Option<String>,
    #[serde(default)]
    pub right_label_placement: LabelPlacement,
    pub label_font: Option<TextOverrides>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveEntry {
    pub from: String,
    pub to: Option<String>,
    pub point: Option<[f64; 2]>,
    #[serde(default)]
    pub style: CurveStyle,
    pub controls: Option<Vec<[f64; 2]>>,
    pub from_side: Option<Side>,
    pub to_side: Option<Side>,
    #[serde(default)]
    pub butt_offset: f64,
    #[serde(default)]
    pub tip_offset: f64,
    pub head: Option<bool>,
    pub width: Option<f64>,
    pub fill: Option<bool>,
    pub fill_color: Option<String>,
    pub edge_color: Option<String>,
    pub line_width: Option<f64>,
    pub samples: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrowEntry {
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub width: Option<f64>,
    pub head: Option<bool>,
    #[serde(default)]
    pub butt_offset: f64,
    #[serde(default)]
    pub tip_offset: f64,
    pub fill: Option<bool>,
    pub fill_color: Option<String>,
    pub edge_color: Option<String>,
    pub line_width: Option<f64>,
    #[serde(default)]
    pub line_style: LineStyle,
    pub z_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextEntry {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub h_align: HAlign,
    #[serde(default)]
    pub v_align: VAlign,
    pub font: Option<TextOverrides>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitleEntry {
    pub text: Option<String>,
    #[serde(default)]
    pub position: TitlePosition,
    #[serde(default = "default_true")]
    pub consider_boxes: bool,
}

fn default_true() -> bool {
    true
}

fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}

fn color(value: &Option<String>) -> ColorChoice {
    value
        .as_deref()
        .map(ColorChoice::parse)
        .unwrap_or_default()
}

/// Resolve the target of an entry that names either a box or a point
fn target(
    to: &Option<String>,
    at: &Option<[f64; 2]>,
    span: &std::ops::Range<usize>,
) -> Result<ConnectionTarget, DiagramParseError> {
    match (to, at) {
        (Some(name), None) => Ok(ConnectionTarget::Box(name.clone())),
        (None, Some(p)) => Ok(ConnectionTarget::Point(point(*p))),
        _ => Err(DiagramParseError::syntax(
            Some(span.clone()),
            "exactly one of `to` or `point` must be given",
        )),
    }
}

/// Parse a diagram description
pub fn parse(source: &str) -> Result<Diagram, DiagramParseError> {
    Ok(toml::from_str(source)?)
}

/// Parse a diagram description and build its tree
pub fn build_tree(source: &str) -> Result<LogicTree, DiagramParseError> {
    parse(source)?.build(TreeConfig::default())
}

impl Diagram {
    /// Canvas configuration: `base` overridden by the `[canvas]` table
    pub fn tree_config(&self, base: TreeConfig) -> TreeConfig {
        let c = &self.canvas;
        let mut config = base;
        if let Some([w, h]) = c.fig_size {
            config.fig_size = (w, h);
        }
        if let Some([min, max]) = c.x_lims {
            config.x_lims = (min, max);
        }
        if let Some([min, max]) = c.y_lims {
            config.y_lims = (min, max);
        }
        if let Some(bg) = &c.background {
            config.background = bg.clone();
        }
        if let Some(font) = &c.font {
            config.text_style = config.text_style.merged(font);
        }
        if let Some(size) = c.title_font.as_ref().and_then(|f| f.font_size) {
            config.title_font_size = size;
        }
        config.box_padding = c.box_padding.unwrap_or(config.box_padding);
        config.box_line_width = c.box_line_width.unwrap_or(config.box_line_width);
        config.connection_width = c.connection_width.unwrap_or(config.connection_width);
        config.connection_line_width = c
            .connection_line_width
            .unwrap_or(config.connection_line_width);
        config
    }

    /// Build the tree this diagram describes
    pub fn build(&self, base: TreeConfig) -> Result<LogicTree, DiagramParseError> {
        let config = self.tree_config(base);
        if config.x_lims.0 >= config.x_lims.1 || config.y_lims.0 >= config.y_lims.1 {
            return Err(DiagramParseError::syntax(
                None,
                "canvas limits must be increasing (min < max)",
            ));
        }

        let mut title_style = config.text_style.clone();
        title_style.font_size = config.title_font_size;
        if let Some(font) = &self.canvas.title_font {
            title_style = title_style.merged(font);
        }

        let mut tree = LogicTree::new(config).with_title_style(title_style);
        if let Some(title) = &self.canvas.title {
            tree = tree.with_title(title.clone());
        }

        for entry in &self.boxes {
            let span = entry.span();
            add_box(&mut tree, entry.get_ref()).map_err(|e| DiagramParseError::layout(span, e))?;
        }
        for entry in &self.connections {
            let span = entry.span();
            let c = entry.get_ref();
            let to = target(&c.to, &c.point, &span)?;
            tree.add_connection(&c.from, to, &connection_options(c))
                .map_err(|e| DiagramParseError::layout(span, e))?;
        }
        for entry in &self.splits {
            let span = entry.span();
            let s = entry.get_ref();
            tree.add_bisplit(&s.parent, &s.children[0], &s.children[1], &split_options(s))
                .map_err(|e| DiagramParseError::layout(span, e))?;
        }
        for entry in &self.curves {
            let span = entry.span();
            let c = entry.get_ref();
            let to = target(&c.to, &c.point, &span)?;
            tree.add_curved_connection(&c.from, to, &curve_options(c))
                .map_err(|e| DiagramParseError::layout(span, e))?;
        }
        for entry in &self.arrows {
            let span = entry.span();
            let a = entry.get_ref();
            tree.add_arrow_between(point(a.start), point(a.end), &arrow_options(a))
                .map_err(|e| DiagramParseError::layout(span, e))?;
        }
        for entry in &self.texts {
            let t = entry.get_ref();
            let style = match &t.font {
                Some(font) => tree.config().text_style.merged(font),
                None => tree.config().text_style.clone(),
            };
            tree.add_label(TextLabel {
                text: t.text.clone(),
                position: Point::new(t.x, t.y),
                h_align: t.h_align,
                v_align: t.v_align,
                style,
            });
        }
        if let Some(entry) = &self.title {
            let span = entry.span();
            let t = entry.get_ref();
            tree.make_title(t.position, t.consider_boxes, t.text.clone())
                .map_err(|e| DiagramParseError::layout(span, e))?;
        }

        debug!(
            boxes = tree.boxes().len(),
            arrows = tree.arrows().len(),
            "built diagram"
        );
        Ok(tree)
    }
}

fn add_box(tree: &mut LogicTree, b: &BoxEntry) -> Result<(), LayoutError> {
    let mut spec = BoxSpec::new(&b.name, &b.text, b.x, b.y).with_align(b.h_align, b.v_align);
    if let Some(face) = &b.face {
        spec.face_color = face.clone();
    }
    if let Some(edge) = &b.edge {
        spec.edge_color = edge.clone();
    }
    spec.line_width = b.line_width;
    spec.shape = b.shape;
    spec.padding = b.padding;
    if let Some(font) = &b.font {
        spec = spec.with_text_style(font.clone());
    }
    tree.add_box(spec).map(|_| ())
}

fn connection_options(c: &ConnectionEntry) -> ConnectionOptions {
    let defaults = ConnectionOptions::default();
    ConnectionOptions {
        mode: c.mode,
        route: RouteOptions::new()
            .with_sides(c.from_side, c.to_side)
            .with_offsets(c.butt_offset, c.tip_offset),
        head: c.head.unwrap_or(defaults.head),
        width: c.width,
        fill: c.fill.unwrap_or(defaults.fill),
        fill_color: color(&c.fill_color),
        edge_color: color(&c.edge_color),
        line_width: c.line_width,
    }
}

fn split_options(s: &SplitEntry) -> SplitOptions {
    let defaults = SplitOptions::default();
    let label = |text: &Option<String>, placement| {
        text.as_ref().map(|text| BranchLabel {
            text: text.clone(),
            placement,
        })
    };
    let label_style = match &s.label_font {
        Some(font) => defaults.label_style.merged(font),
        None => defaults.label_style.clone(),
    };
    SplitOptions {
        head: s.head.unwrap_or(defaults.head),
        width: s.width,
        fill: s.fill.unwrap_or(defaults.fill),
        butt_offset: s.butt_offset,
        tip_offset: s.tip_offset,
        line_width: s.line_width.unwrap_or(defaults.line_width),
        parent_colors: ArrowColors {
            fill: color(&s.parent_fill),
            edge: color(&s.parent_edge),
        },
        first_colors: ArrowColors {
            fill: color(&s.first_fill),
            edge: color(&s.first_edge),
        },
        second_colors: ArrowColors {
            fill: color(&s.second_fill),
            edge: color(&s.second_edge),
        },
        left_label: label(&s.left_label, s.left_label_placement),
        right_label: label(&s.right_label, s.right_label_placement),
        label_style,
    }
}

fn curve_options(c: &CurveEntry) -> CurveOptions {
    let defaults = CurveOptions::default();
    CurveOptions {
        style: c.style,
        controls: c
            .controls
            .as_ref()
            .map(|points| points.iter().copied().map(point).collect()),
        route: RouteOptions::new()
            .with_sides(c.from_side, c.to_side)
            .with_offsets(c.butt_offset, c.tip_offset),
        head: c.head.unwrap_or(defaults.head),
        width: c.width,
        fill: c.fill.unwrap_or(defaults.fill),
        fill_color: color(&c.fill_color),
        edge_color: color(&c.edge_color),
        line_width: c.line_width,
        samples: c.samples.unwrap_or(defaults.samples),
    }
}

fn arrow_options(a: &ArrowEntry) -> ArrowOptions {
    let defaults = ArrowOptions::default();
    let style = ArrowStyle {
        fill: Some(a.fill_color.clone().unwrap_or_else(|| "black".to_string())),
        edge: a.edge_color.clone().unwrap_or_else(|| "black".to_string()),
        line_width: a.line_width.unwrap_or(defaults.style.line_width),
        line_style: a.line_style,
        z_order: a.z_order.unwrap_or(defaults.style.z_order),
        ..ArrowStyle::default()
    };
    ArrowOptions {
        width: a.width.unwrap_or(defaults.width),
        head: a.head.unwrap_or(defaults.head),
        butt_offset: a.butt_offset,
        tip_offset: a.tip_offset,
        fill: a.fill.unwrap_or(defaults.fill),
        style,
    }
}
