//! Text measurement and box extent computation

use std::fmt::Debug;

use super::config::TreeConfig;
use super::types::{BoxLayout, FontWeight, HAlign, LogicBox, TextStyle, VAlign};

/// Line height as a multiple of the font size
pub const LINE_HEIGHT: f64 = 1.2;

/// Measures rendered text. Sizes are in points.
pub trait TextMeasure: Debug {
    /// Width of a single line of text
    fn line_width(&self, line: &str, style: &TextStyle) -> f64;

    /// Width and height of a possibly multi-line block
    fn measure(&self, text: &str, style: &TextStyle) -> (f64, f64) {
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines
            .iter()
            .map(|line| self.line_width(line, style))
            .fold(0.0, f64::max);
        let height = lines.len() as f64 * style.font_size * LINE_HEIGHT;
        (width, height)
    }
}

/// Estimates widths from per-character advance factors, without font files
#[derive(Debug, Clone, Copy, Default)]
pub struct CharWidthMeasure;

/// Advance width of a character as a fraction of the font size
fn char_width_factor(ch: char) -> f64 {
    match ch {
        ' ' => 0.28,
        'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '{' | '}' | '-' => 0.36,
        'm' | 'w' => 0.80,
        'M' | 'W' => 0.92,
        '@' | '%' => 0.90,
        c if c.is_ascii_digit() => 0.55,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_lowercase() => 0.52,
        c if c.is_ascii() => 0.55,
        _ => 1.0,
    }
}

impl TextMeasure for CharWidthMeasure {
    fn line_width(&self, line: &str, style: &TextStyle) -> f64 {
        let factor: f64 = line.chars().map(char_width_factor).sum();
        let weight = match style.weight {
            FontWeight::Normal => 1.0,
            FontWeight::Bold => 1.08,
        };
        factor * style.font_size * weight
    }
}

/// Compute a box's extents in data units from its text, alignment and padding
pub fn measure_box(b: &LogicBox, config: &TreeConfig, measure: &dyn TextMeasure) -> BoxLayout {
    let (text_w, text_h) = measure.measure(&b.text, &b.text_style);
    let pad = config.box_padding * b.text_style.font_size;
    let width = (text_w + 2.0 * pad) / config.x_scale();
    let height = (text_h + 2.0 * pad) / config.y_scale();

    let x_left = match b.h_align {
        HAlign::Left => b.position.x,
        HAlign::Center => b.position.x - width / 2.0,
        HAlign::Right => b.position.x - width,
    };
    let y_bottom = match b.v_align {
        VAlign::Bottom => b.position.y,
        VAlign::Center => b.position.y - height / 2.0,
        VAlign::Top => b.position.y - height,
    };
    BoxLayout::from_extents(x_left, x_left + width, y_bottom, y_bottom + height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[derive(Debug)]
    struct Fixed;

    impl TextMeasure for Fixed {
        fn line_width(&self, line: &str, style: &TextStyle) -> f64 {
            line.chars().count() as f64 * style.font_size / 2.0
        }
    }

    fn style(size: f64) -> TextStyle {
        TextStyle {
            font_size: size,
            ..TextStyle::default()
        }
    }

    #[test]
    fn test_width_scales_with_font_size() {
        let m = CharWidthMeasure;
        let w10 = m.line_width("Hello", &style(10.0));
        let w20 = m.line_width("Hello", &style(20.0));
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
    }

    #[test]
    fn test_multiline_uses_widest_line() {
        let (w, h) = Fixed.measure("ab\nabcd\na", &style(10.0));
        assert_eq!(w, 20.0);
        assert!((h - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let mut bold = style(12.0);
        bold.weight = FontWeight::Bold;
        let m = CharWidthMeasure;
        assert!(m.line_width("Logic", &bold) > m.line_width("Logic", &style(12.0)));
    }

    #[test]
    fn test_measure_box_alignment() {
        // 72 points per data unit on both axes
        let config = TreeConfig::new()
            .with_fig_size(10.0, 10.0)
            .with_x_lims(0.0, 10.0)
            .with_y_lims(0.0, 10.0)
            .with_box_padding(0.0);
        let mut b = LogicBox::new("a", "abcdefghijklmnop", Point::new(5.0, 5.0));
        b.text_style = style(9.0);
        // 16 chars * 4.5 pt = 72 pt wide, 10.8 pt high

        let centered = measure_box(&b, &config, &Fixed);
        assert!((centered.width - 1.0).abs() < 1e-9);
        assert!((centered.x_left - 4.5).abs() < 1e-9);
        assert!((centered.y_center - 5.0).abs() < 1e-9);

        b.h_align = HAlign::Right;
        b.v_align = VAlign::Bottom;
        let anchored = measure_box(&b, &config, &Fixed);
        assert!((anchored.x_right - 5.0).abs() < 1e-9);
        assert!((anchored.y_bottom - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_padding_grows_box() {
        let config = TreeConfig::default();
        let b = LogicBox::new("a", "Rust", Point::new(50.0, 50.0));
        let tight = measure_box(&b, &config.clone().with_box_padding(0.0), &CharWidthMeasure);
        let padded = measure_box(&b, &config, &CharWidthMeasure);
        assert!(padded.width > tight.width);
        assert!(padded.height > tight.height);
        assert!((padded.x_center - 50.0).abs() < 1e-9);
    }
}
