//! Logic Tree - decision-tree diagrams built from boxes and arrows
//!
//! This library provides the arrow geometry, box layout, connection routing
//! and SVG/PNG rendering for logic-tree diagrams, plus a TOML description
//! format that drives them.
//!
//! # Example
//!
//! ```rust
//! use logic_tree::render;
//!
//! let svg = render(r#"
//! [[box]]
//! name = "start"
//! text = "Start"
//! x = 50
//! y = 50
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod diagram;
pub mod error;
pub mod geometry;
pub mod layout;
mod log;
pub mod renderer;
pub mod stylesheet;

pub use diagram::{build_tree, Diagram};
pub use error::DiagramParseError;
pub use geometry::{Arrow, CurvedArrow, PathError, Point};
pub use layout::{LayoutError, LogicTree, TreeConfig};
pub use renderer::{render_svg, ExportError, SvgConfig};

use std::path::Path;

use thiserror::Error;

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error reading or laying out the diagram description; layout failures
    /// carry the source span of the entry that caused them
    #[error("{0}")]
    Parse(#[from] DiagramParseError),

    /// Error writing the output file
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Canvas defaults; the diagram's `[canvas]` table overrides them
    pub tree: TreeConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
    /// Resolution of rasterized output
    pub dpi: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
            dpi: 300.0,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas defaults
    pub fn with_tree(mut self, config: TreeConfig) -> Self {
        self.tree = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet for color resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Render a diagram description to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render a diagram description to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use logic_tree::{render_with_config, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new().with_svg(SvgConfig::default().with_padding(4.0));
/// let svg = render_with_config("[canvas]\nbackground = \"white\"\n", &config).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let tree = diagram::parse(source)?.build(config.tree.clone())?;
    Ok(render_svg(&tree, &config.svg, &config.stylesheet))
}

/// Render a diagram description and write it to `path`.
///
/// The format follows the file extension: `.png` is rasterized at the
/// configured dpi, anything else is written as SVG.
pub fn render_to_file(source: &str, path: &Path, config: &RenderConfig) -> Result<(), RenderError> {
    let svg = render_with_config(source, config)?;
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        renderer::write_png(&svg, path, config.dpi)?;
    } else {
        renderer::write_svg(&svg, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BOXES: &str = r#"
[canvas]
title = "Flow"

[[box]]
name = "a"
text = "Alpha"
x = 50
y = 80

[[box]]
name = "b"
text = "Beta"
x = 50
y = 30
face = "xkcd:ocean"

[[connection]]
from = "a"
to = "b"

[title]
position = "left"
"#;

    #[test]
    fn test_render_boxes_and_connection() {
        let svg = render(TWO_BOXES).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("Alpha"));
        assert!(svg.contains("Flow"));
        assert!(svg.contains("lt-arrow"));
    }

    #[test]
    fn test_render_resolves_palette_colors() {
        let svg = render(TWO_BOXES).unwrap();
        assert!(svg.contains("#017b92"));
        assert!(!svg.contains("xkcd:"));
    }

    #[test]
    fn test_render_with_custom_stylesheet() {
        let stylesheet = Stylesheet::from_str("[colors]\n\"xkcd:ocean\" = \"#123456\"\n").unwrap();
        let config = RenderConfig::new().with_stylesheet(stylesheet);
        let svg = render_with_config(TWO_BOXES, &config).unwrap();
        assert!(svg.contains("#123456"));
    }

    #[test]
    fn test_render_unknown_box_error() {
        let err = render("[[connection]]\nfrom = \"a\"\nto = \"b\"\n").unwrap_err();
        match err {
            RenderError::Parse(DiagramParseError::Layout { error, .. }) => {
                assert!(matches!(error, LayoutError::UnknownBox { .. }));
            }
            other => panic!("expected unknown box, got {other:?}"),
        }
    }

    #[test]
    fn test_render_layout_error_keeps_span() {
        let source = r#"
[[box]]
name = "a"
text = "A"
x = 10
y = 10

[[box]]
name = "b"
text = "B"
x = 60
y = 60

[[connection]]
from = "a"
to = "b"
"#;
        match render(source).unwrap_err() {
            RenderError::Parse(DiagramParseError::Layout { error, span }) => {
                assert!(matches!(error, LayoutError::AmbiguousOrientation { .. }));
                assert!(span.unwrap().start >= source.find("[[connection]]").unwrap());
            }
            other => panic!("expected a located layout error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_syntax_error() {
        let err = render("[[box]]\nname = 3\n").unwrap_err();
        assert!(matches!(err, RenderError::Parse(DiagramParseError::Syntax { .. })));
    }

    #[test]
    fn test_render_to_svg_file() {
        let path = std::env::temp_dir().join(format!("logic-tree-{}.svg", std::process::id()));
        render_to_file(TWO_BOXES, &path, &RenderConfig::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg") || written.starts_with("<?xml"));
        std::fs::remove_file(&path).ok();
    }
}
