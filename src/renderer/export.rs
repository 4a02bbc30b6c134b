//! Writing rendered diagrams to disk

use std::path::Path;

use thiserror::Error;

use crate::log::debug;

/// Errors that can occur while exporting a rendered diagram
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rasterize SVG: {0}")]
    Rasterize(String),

    #[error("PNG output is not available: built without the `png` feature")]
    PngUnsupported,
}

impl ExportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Write SVG text to `path`
pub fn write_svg(svg: &str, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, svg).map_err(|e| ExportError::io(path, e))?;
    debug!(path = %path.display(), bytes = svg.len(), "wrote svg");
    Ok(())
}

/// Rasterize SVG text to PNG bytes at `dpi` (72 dpi keeps one pixel per point)
#[cfg(feature = "png")]
pub fn rasterize_png(svg: &str, dpi: f32) -> Result<Vec<u8>, ExportError> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Times New Roman".to_string();
    opt.fontdb_mut().load_system_fonts();

    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| ExportError::Rasterize(e.to_string()))?;
    // usvg resolves `pt` lengths at `opt.dpi` pixels per inch
    let scale = dpi / opt.dpi;
    let width = (tree.size().width() * scale).round() as u32;
    let height = (tree.size().height() * scale).round() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        ExportError::Rasterize(format!("cannot allocate a {width}x{height} pixmap"))
    })?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    debug!(width, height, dpi, "rasterized svg");
    pixmap
        .encode_png()
        .map_err(|e| ExportError::Rasterize(e.to_string()))
}

/// Rasterize SVG text to a PNG file at `dpi`
#[cfg(feature = "png")]
pub fn write_png(svg: &str, path: &Path, dpi: f32) -> Result<(), ExportError> {
    let bytes = rasterize_png(svg, dpi)?;
    std::fs::write(path, bytes).map_err(|e| ExportError::io(path, e))
}

/// Rasterize SVG text to a PNG file at `dpi`
#[cfg(not(feature = "png"))]
pub fn write_png(_svg: &str, _path: &Path, _dpi: f32) -> Result<(), ExportError> {
    Err(ExportError::PngUnsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_svg_reports_path() {
        let missing = Path::new("/nonexistent-dir/out.svg");
        let err = write_svg("<svg/>", missing).unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/out.svg"));
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_rasterize_scales_with_dpi() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="72pt" height="36pt" viewBox="0 0 72 36"><rect width="72" height="36" fill="black"/></svg>"#;
        let png = rasterize_png(svg, 144.0).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        // IHDR width and height, big endian
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 144);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 72);
    }
}
