//! SVG generation from a logic tree

use crate::geometry::Point;
use crate::layout::{
    ArrowShape, ArrowStyle, BoxShape, DrawnArrow, FontWeight, HAlign, LineStyle, LogicBox,
    LogicTree, TextLabel, TextStyle, TreeConfig, VAlign, BOX_Z_ORDER,
};
use crate::log::warn;
use crate::stylesheet::Stylesheet;

use super::SvgConfig;

/// Stacking order of free labels
const LABEL_Z_ORDER: i32 = BOX_Z_ORDER + 1;

/// Stacking order of the title
const TITLE_Z_ORDER: i32 = BOX_Z_ORDER + 2;

/// Maps data coordinates onto the figure, in points with y pointing down
#[derive(Debug, Clone, Copy)]
struct Viewport {
    x_min: f64,
    y_max: f64,
    sx: f64,
    sy: f64,
    padding: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    fn new(tree: &TreeConfig, padding: f64) -> Self {
        Self {
            x_min: tree.x_lims.0,
            y_max: tree.y_lims.1,
            sx: tree.x_scale(),
            sy: tree.y_scale(),
            padding,
            width: tree.fig_size.0 * 72.0 + 2.0 * padding,
            height: tree.fig_size.1 * 72.0 + 2.0 * padding,
        }
    }

    fn map(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.x_min) * self.sx + self.padding,
            (self.y_max - p.y) * self.sy + self.padding,
        )
    }
}

/// Build SVG elements incrementally, layered by z-order
pub struct SvgBuilder {
    config: SvgConfig,
    background: Option<String>,
    layers: Vec<(i32, Vec<(usize, String)>)>,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            background: None,
            layers: vec![],
        }
    }

    fn prefix(&self) -> &str {
        &self.config.class_prefix
    }

    fn indent_str(&self, level: usize) -> String {
        " ".repeat(self.config.indent * level)
    }

    fn newline(&self) -> &str {
        if self.config.indent > 0 {
            "\n"
        } else {
            ""
        }
    }

    /// Paint the whole figure with `color`
    pub fn set_background(&mut self, width: f64, height: f64, color: &str) {
        self.background = Some(format!(
            r#"<rect class="{}background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.prefix(),
            fmt_num(width),
            fmt_num(height),
            color
        ));
    }

    /// Add a single element at `z_order`
    pub fn add_element(&mut self, z_order: i32, element: String) {
        self.layers.push((z_order, vec![(1, element)]));
    }

    /// Add a group of elements at `z_order`
    pub fn add_group(&mut self, z_order: i32, attrs: &str, children: Vec<String>) {
        let mut lines = Vec::with_capacity(children.len() + 2);
        lines.push((1, format!("<g{}>", attrs)));
        lines.extend(children.into_iter().map(|c| (2, c)));
        lines.push((1, "</g>".to_string()));
        self.layers.push((z_order, lines));
    }

    /// A polygon element
    pub fn polygon(&self, class: &str, points: &[Point], attrs: &str) -> String {
        format!(
            r#"<polygon class="{}" points="{}"{}/>"#,
            self.config.class(class),
            points_attr(points),
            attrs
        )
    }

    /// An open polyline element
    pub fn polyline(&self, class: &str, points: &[Point], attrs: &str) -> String {
        format!(
            r#"<polyline class="{}" points="{}" fill="none"{}/>"#,
            self.config.class(class),
            points_attr(points),
            attrs
        )
    }

    /// A path element through `points`
    pub fn path(&self, class: &str, points: &[Point], attrs: &str) -> String {
        format!(
            r#"<path class="{}" d="{}" fill="none"{}/>"#,
            self.config.class(class),
            path_to_d(points),
            attrs
        )
    }

    /// A rectangle element, optionally with rounded corners
    pub fn rect(&self, class: &str, top_left: Point, w: f64, h: f64, rx: f64, attrs: &str) -> String {
        let rx_attr = if rx > 0.0 {
            format!(r#" rx="{}""#, fmt_num(rx))
        } else {
            String::new()
        };
        format!(
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            self.config.class(class),
            fmt_num(top_left.x),
            fmt_num(top_left.y),
            fmt_num(w),
            fmt_num(h),
            rx_attr,
            attrs
        )
    }

    /// A text element; multi-line text becomes one tspan per line
    pub fn text(
        &self,
        class: &str,
        text: &str,
        at: Point,
        h_align: HAlign,
        v_align: VAlign,
        style: &TextStyle,
        color: &str,
    ) -> String {
        let anchor = match h_align {
            HAlign::Left => "start",
            HAlign::Center => "middle",
            HAlign::Right => "end",
        };
        let baseline = match v_align {
            VAlign::Top => "hanging",
            VAlign::Center => "central",
            VAlign::Bottom => "text-after-edge",
        };
        let mut attrs = format!(
            r#" font-family="{}" font-size="{}" fill="{}""#,
            escape_xml(&style.font_family),
            fmt_num(style.font_size),
            color
        );
        if style.weight == FontWeight::Bold {
            attrs.push_str(r#" font-weight="bold""#);
        }
        if style.underline {
            attrs.push_str(r#" text-decoration="underline""#);
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let body = if lines.len() == 1 {
            escape_xml(text)
        } else {
            let n = lines.len() as f64;
            let first_dy = match v_align {
                VAlign::Top => 0.0,
                VAlign::Center => -(n - 1.0) * 0.6,
                VAlign::Bottom => -(n - 1.0) * 1.2,
            };
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let dy = if i == 0 { first_dy } else { 1.2 };
                    format!(
                        r#"<tspan x="{}" dy="{}em">{}</tspan>"#,
                        fmt_num(at.x),
                        fmt_num(dy),
                        escape_xml(line)
                    )
                })
                .collect::<Vec<_>>()
                .join("")
        };

        format!(
            r#"<text class="{}" x="{}" y="{}" text-anchor="{}" dominant-baseline="{}"{}>{}</text>"#,
            self.config.class(class),
            fmt_num(at.x),
            fmt_num(at.y),
            anchor,
            baseline,
            attrs,
            body
        )
    }

    /// Build the final SVG string
    pub fn build(mut self, width: f64, height: f64) -> String {
        self.layers.sort_by_key(|(z, _)| *z);
        let nl = self.newline();

        let mut svg = String::new();

        if self.config.xml_declaration {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}pt" height="{h}pt" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(width),
            h = fmt_num(height),
        ));
        svg.push_str(nl);

        if let Some(bg) = &self.background {
            svg.push_str(&self.indent_str(1));
            svg.push_str(bg);
            svg.push_str(nl);
        }

        for (_, lines) in &self.layers {
            for (level, line) in lines {
                svg.push_str(&self.indent_str(*level));
                svg.push_str(line);
                svg.push_str(nl);
            }
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render a logic tree to an SVG string.
///
/// The figure is `fig_size * 72` points; data coordinates are scaled into it
/// with y pointing up. Boxes that were never laid out are skipped.
pub fn render_svg(tree: &LogicTree, config: &SvgConfig, stylesheet: &Stylesheet) -> String {
    let vp = Viewport::new(tree.config(), config.padding);
    let mut builder = SvgBuilder::new(config.clone());

    if config.background {
        let bg = stylesheet.resolve_or_default(&tree.config().background);
        builder.set_background(vp.width, vp.height, &bg);
    }

    for arrow in tree.arrows() {
        render_arrow(arrow, &vp, stylesheet, &mut builder);
    }

    for b in tree.boxes() {
        render_box(b, &vp, stylesheet, &mut builder);
    }

    for label in tree.labels() {
        render_label(label, "label", LABEL_Z_ORDER, &vp, stylesheet, &mut builder);
    }

    if let Some(title) = tree.title_label() {
        render_label(title, "title", TITLE_Z_ORDER, &vp, stylesheet, &mut builder);
    }

    builder.build(vp.width, vp.height)
}

fn render_box(b: &LogicBox, vp: &Viewport, stylesheet: &Stylesheet, builder: &mut SvgBuilder) {
    let layout = match b.layout() {
        Ok(layout) => layout,
        Err(err) => {
            warn!(box_name = %b.name, %err, "skipping box without layout");
            return;
        }
    };

    let top_left = vp.map(Point::new(layout.x_left, layout.y_top));
    let w = layout.width * vp.sx;
    let h = layout.height * vp.sy;
    let rx = match b.shape {
        BoxShape::Square => 0.0,
        BoxShape::Round => (b.text_style.font_size * 0.3).min(h / 2.0),
    };
    let rect_attrs = format!(
        r#" fill="{}" stroke="{}" stroke-width="{}""#,
        stylesheet.resolve_or_default(&b.face_color),
        stylesheet.resolve_or_default(&b.edge_color),
        fmt_num(b.line_width)
    );

    let children = vec![
        builder.rect("box-frame", top_left, w, h, rx, &rect_attrs),
        builder.text(
            "box-text",
            &b.text,
            vp.map(layout.center()),
            HAlign::Center,
            VAlign::Center,
            &b.text_style,
            &stylesheet.resolve_or_default(&b.text_style.color),
        ),
    ];
    let attrs = format!(
        r#" class="{}box" data-name="{}""#,
        builder.prefix(),
        escape_xml(&b.name)
    );
    builder.add_group(BOX_Z_ORDER, &attrs, children);
}

fn stroke_attrs(style: &ArrowStyle, stylesheet: &Stylesheet) -> String {
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}" stroke-linejoin="miter""#,
        stylesheet.resolve_or_default(&style.edge),
        fmt_num(style.line_width)
    );
    let dash = match style.line_style {
        LineStyle::Solid => None,
        LineStyle::Dashed => Some((3.7, 1.6)),
        LineStyle::Dotted => Some((1.0, 1.65)),
    };
    if let Some((on, off)) = dash {
        attrs.push_str(&format!(
            r#" stroke-dasharray="{},{}""#,
            fmt_num(on * style.line_width),
            fmt_num(off * style.line_width)
        ));
    }
    attrs
}

fn render_arrow(arrow: &DrawnArrow, vp: &Viewport, stylesheet: &Stylesheet, builder: &mut SvgBuilder) {
    let style = &arrow.style;
    let fill = style
        .fill
        .as_deref()
        .map(|c| stylesheet.resolve_or_default(c));
    let fill_attr = format!(r#" fill="{}""#, fill.as_deref().unwrap_or("none"));
    let stroke = stroke_attrs(style, stylesheet);

    match &arrow.shape {
        ArrowShape::Polygon(shape) => {
            let points: Vec<Point> = shape
                .outline()
                .stroke_points()
                .iter()
                .map(|p| vp.map(*p))
                .collect();
            if style.close_butt {
                let attrs = format!("{}{}", fill_attr, stroke);
                let element = builder.polygon("arrow", &points, &attrs);
                builder.add_element(style.z_order, element);
            } else {
                let body = builder.polygon("arrow", &points, &format!(r#"{} stroke="none""#, fill_attr));
                let edge = builder.polyline("arrow-edge", &points, &stroke);
                builder.add_group(style.z_order, "", vec![body, edge]);
            }
        }
        ArrowShape::Curve(curve) => {
            let shaft: Vec<Point> = curve.shaft().iter().map(|p| vp.map(*p)).collect();
            let shaft_color = fill
                .clone()
                .unwrap_or_else(|| stylesheet.resolve_or_default(&style.edge));
            let shaft_attrs = format!(
                r#" stroke="{}" stroke-width="{}" stroke-linecap="butt""#,
                shaft_color,
                fmt_num(curve.width() * vp.sx)
            );
            let mut children = vec![builder.path("curve", &shaft, &shaft_attrs)];
            if let Some(head) = curve.head() {
                let head: Vec<Point> = head.iter().map(|p| vp.map(*p)).collect();
                let head_fill = format!(r#" fill="{}""#, shaft_color);
                children.push(builder.polygon(
                    "curve-head",
                    &head,
                    &format!("{}{}", head_fill, stroke),
                ));
            }
            builder.add_group(style.z_order, "", children);
        }
    }
}

fn render_label(
    label: &TextLabel,
    class: &str,
    z_order: i32,
    vp: &Viewport,
    stylesheet: &Stylesheet,
    builder: &mut SvgBuilder,
) {
    let element = builder.text(
        class,
        &label.text,
        vp.map(label.position),
        label.h_align,
        label.v_align,
        &label.style,
        &stylesheet.resolve_or_default(&label.style.color),
    );
    builder.add_element(z_order, element);
}

/// Format a coordinate with at most two decimals
fn fmt_num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0 + 0.0;
    format!("{}", rounded)
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a path of points to an SVG path d attribute
fn path_to_d(path: &[Point]) -> String {
    if path.is_empty() {
        return String::new();
    }

    let mut d = format!("M{} {}", fmt_num(path[0].x), fmt_num(path[0].y));
    for point in &path[1..] {
        d.push_str(&format!(" L{} {}", fmt_num(point.x), fmt_num(point.y)));
    }
    d
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Arrow;
    use crate::layout::{BoxLayout, BoxSpec, ConnectionOptions};

    fn unit_tree() -> LogicTree {
        // one point per data unit
        LogicTree::new(
            TreeConfig::new()
                .with_fig_size(1.0, 1.0)
                .with_x_lims(0.0, 72.0)
                .with_y_lims(0.0, 72.0),
        )
    }

    fn compact() -> SvgConfig {
        SvgConfig::compact().with_background(false)
    }

    #[test]
    fn test_path_to_d() {
        let path = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.5),
        ];
        assert_eq!(path_to_d(&path), "M0 0 L100 0 L100 50.5");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(36.0), "36");
        assert_eq!(fmt_num(0.125), "0.13");
        assert_eq!(fmt_num(-0.0001), "0");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_render_single_arrow() {
        let mut tree = unit_tree();
        let arrow = Arrow::new(
            vec![Point::new(10.0, 36.0), Point::new(60.0, 36.0)],
            4.0,
            false,
        )
        .unwrap();
        tree.add_arrow(DrawnArrow::polygon(
            arrow,
            ArrowStyle {
                fill: Some("red".to_string()),
                ..ArrowStyle::default()
            },
        ));

        let svg = render_svg(&tree, &compact(), &Stylesheet::default());
        insta::assert_snapshot!(svg, @r#"<svg xmlns="http://www.w3.org/2000/svg" width="72pt" height="72pt" viewBox="0 0 72 72"><polygon class="lt-arrow" points="10,34 60,34 60,38 10,38" fill="red" stroke="black" stroke-width="1" stroke-linejoin="miter"/></svg>"#);
    }

    #[test]
    fn test_boxes_render_above_low_arrows() {
        let mut tree = unit_tree();
        tree.register_box(
            LogicBox::new("a", "A & B", Point::default())
                .with_colors("xkcd:ocean", "white")
                .with_layout(BoxLayout::from_extents(10.0, 20.0, 50.0, 60.0)),
        )
        .unwrap();
        tree.register_box(
            LogicBox::new("b", "B", Point::default())
                .with_layout(BoxLayout::from_extents(10.0, 20.0, 10.0, 20.0)),
        )
        .unwrap();
        tree.add_connection("a", "b", &ConnectionOptions::default())
            .unwrap();

        let svg = render_svg(&tree, &SvgConfig::default(), &Stylesheet::default());
        let arrow_at = svg.find("lt-arrow").unwrap();
        let box_at = svg.find(r#"data-name="a""#).unwrap();
        assert!(arrow_at < box_at);
        assert!(svg.contains(r##"fill="#017b92""##));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"class="lt-background""#));
    }

    #[test]
    fn test_open_butt_arrow_strokes_polyline() {
        let mut tree = unit_tree();
        let arrow = Arrow::new(
            vec![Point::new(10.0, 36.0), Point::new(10.0, 10.0)],
            2.0,
            true,
        )
        .unwrap();
        tree.add_arrow(DrawnArrow::polygon(
            arrow,
            ArrowStyle {
                close_butt: false,
                line_style: LineStyle::Dashed,
                ..ArrowStyle::default()
            },
        ));
        let svg = render_svg(&tree, &compact(), &Stylesheet::default());
        assert!(svg.contains(r#"stroke="none""#));
        assert!(svg.contains("<polyline class=\"lt-arrow-edge\""));
        assert!(svg.contains(r#"stroke-dasharray="3.7,1.6""#));
    }

    #[test]
    fn test_title_and_multiline_box() {
        let mut tree = LogicTree::new(TreeConfig::default()).with_title("Tree");
        tree.add_box(BoxSpec::new("m", "first\nsecond", 50.0, 50.0))
            .unwrap();
        tree.make_title(crate::layout::TitlePosition::Center, false, None)
            .unwrap();

        let svg = render_svg(&tree, &compact(), &Stylesheet::default());
        assert!(svg.contains(r#"<tspan x="324" dy="-0.6em">first</tspan>"#));
        assert!(svg.contains(r#"class="lt-title" x="324" y="0""#));
        assert!(svg.contains(r#"font-size="34""#));
    }
}
