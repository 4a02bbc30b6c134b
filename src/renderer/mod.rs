//! SVG renderer and file export
//!
//! This module takes a laid-out [`LogicTree`](crate::layout::LogicTree) and
//! produces an SVG string, optionally rasterized to PNG.

pub mod config;
pub mod export;
pub mod svg;

pub use config::SvgConfig;
pub use export::{write_png, write_svg, ExportError};
pub use svg::{render_svg, SvgBuilder};
