//! Output options for the SVG renderer

/// How a logic tree is written out as SVG.
///
/// The drawing itself (figure size, limits, background color) comes from the
/// tree's `TreeConfig`; these options only shape the document around it.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Margin in points added on every side of the figure
    pub padding: f64,

    /// Emit `<?xml ...?>` before the root element
    pub xml_declaration: bool,

    /// Spaces per nesting level; 0 writes the document on one line
    pub indent: usize,

    /// Prepended to every class name (`lt-box`, `lt-arrow`, ...); may be empty
    pub class_prefix: String,

    /// Paint the tree's background color behind everything
    pub background: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            padding: 0.0,
            xml_declaration: true,
            indent: 2,
            class_prefix: "lt-".to_string(),
            background: true,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output without the XML declaration, for embedding in
    /// HTML or another SVG
    pub fn compact() -> Self {
        Self {
            xml_declaration: false,
            indent: 0,
            ..Self::default()
        }
    }

    /// Negative margins are treated as zero
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    /// Class attribute value for an element kind
    pub fn class(&self, kind: &str) -> String {
        format!("{}{}", self.class_prefix, kind)
    }
}
