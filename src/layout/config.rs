//! Canvas configuration for a logic tree

use super::types::TextStyle;

/// Configuration options for a logic tree canvas
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Figure size in inches (width, height)
    pub fig_size: (f64, f64),

    /// Horizontal data range (min, max)
    pub x_lims: (f64, f64),

    /// Vertical data range (min, max)
    pub y_lims: (f64, f64),

    /// Canvas background color
    pub background: String,

    /// Default style for box text
    pub text_style: TextStyle,

    /// Default font size for the title in points
    pub title_font_size: f64,

    /// Box padding as a multiple of the font size
    pub box_padding: f64,

    /// Default box outline width in points
    pub box_line_width: f64,

    /// Default shaft width for box-to-box connections, in data units
    pub connection_width: f64,

    /// Default outline width for connection arrows in points
    pub connection_line_width: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            fig_size: (9.0, 9.0),
            x_lims: (0.0, 100.0),
            y_lims: (0.0, 100.0),
            background: "black".to_string(),
            text_style: TextStyle::default(),
            title_font_size: 34.0,
            box_padding: 0.6,
            box_line_width: 1.6,
            connection_width: 0.5,
            connection_line_width: 0.7,
        }
    }
}

impl TreeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the figure size in inches
    pub fn with_fig_size(mut self, width: f64, height: f64) -> Self {
        self.fig_size = (width, height);
        self
    }

    /// Set the horizontal data range
    pub fn with_x_lims(mut self, min: f64, max: f64) -> Self {
        self.x_lims = (min, max);
        self
    }

    /// Set the vertical data range
    pub fn with_y_lims(mut self, min: f64, max: f64) -> Self {
        self.y_lims = (min, max);
        self
    }

    /// Set the background color
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    /// Set the default text style
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Set the box padding
    pub fn with_box_padding(mut self, padding: f64) -> Self {
        self.box_padding = padding;
        self
    }

    /// Points per data unit along x
    pub fn x_scale(&self) -> f64 {
        self.fig_size.0 * 72.0 / (self.x_lims.1 - self.x_lims.0)
    }

    /// Points per data unit along y
    pub fn y_scale(&self) -> f64 {
        self.fig_size.1 * 72.0 / (self.y_lims.1 - self.y_lims.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TreeConfig::default();
        assert_eq!(config.fig_size, (9.0, 9.0));
        assert_eq!(config.x_lims, (0.0, 100.0));
        assert_eq!(config.background, "black");
        assert_eq!(config.text_style.font_size, 15.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TreeConfig::new()
            .with_fig_size(10.0, 5.0)
            .with_x_lims(0.0, 50.0)
            .with_background("white");

        assert_eq!(config.fig_size, (10.0, 5.0));
        assert_eq!(config.background, "white");
        assert_eq!(config.x_scale(), 14.4);
        assert_eq!(config.y_scale(), 3.6);
    }
}
