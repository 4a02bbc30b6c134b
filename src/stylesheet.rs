//! Stylesheet system for color palette support
//!
//! Diagrams name colors the way plotting libraries do: CSS names, hex
//! values, single-letter shorthands and prefixed palettes such as
//! `xkcd:ocean` or `tab:blue`. A stylesheet maps names SVG does not know to
//! concrete hex values, and can override any name to re-theme a diagram.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::log::warn;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping color names to concrete values
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Color mappings: lower-case name -> hex color
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Returned for prefixed palette names nobody defined
const UNKNOWN_COLOR: &str = "#808080";

/// Default palette: shorthands, tableau and the xkcd survey colors
const DEFAULT_PALETTE: &str = r##"
[colors]
# Single-letter shorthands
b = "#0000ff"
g = "#008000"
r = "#ff0000"
c = "#00bfbf"
m = "#bf00bf"
y = "#bfbf00"
k = "#000000"
w = "#ffffff"

# Tableau
"tab:blue" = "#1f77b4"
"tab:orange" = "#ff7f0e"
"tab:green" = "#2ca02c"
"tab:red" = "#d62728"
"tab:purple" = "#9467bd"
"tab:brown" = "#8c564b"
"tab:pink" = "#e377c2"
"tab:gray" = "#7f7f7f"
"tab:grey" = "#7f7f7f"
"tab:olive" = "#bcbd22"
"tab:cyan" = "#17becf"

# xkcd color survey
"xkcd:black" = "#000000"
"xkcd:white" = "#ffffff"
"xkcd:off white" = "#ffffe4"
"xkcd:light grey" = "#d8dcd6"
"xkcd:grey" = "#929591"
"xkcd:dark grey" = "#363737"
"xkcd:light blue grey" = "#b7c9e2"
"xkcd:blue grey" = "#607c8e"
"xkcd:blue" = "#0343df"
"xkcd:light blue" = "#95d0fc"
"xkcd:sky blue" = "#75bbfd"
"xkcd:bright sky blue" = "#02ccfe"
"xkcd:water blue" = "#0e87cc"
"xkcd:ocean" = "#017b92"
"xkcd:ocean blue" = "#03719c"
"xkcd:navy" = "#01153e"
"xkcd:teal" = "#029386"
"xkcd:green" = "#15b01a"
"xkcd:light green" = "#96f97b"
"xkcd:forest green" = "#06470c"
"xkcd:mint" = "#9ffeb0"
"xkcd:yellow" = "#ffff14"
"xkcd:gold" = "#dbb40c"
"xkcd:orange" = "#f97306"
"xkcd:rust orange" = "#c45508"
"xkcd:light salmon" = "#fea993"
"xkcd:salmon" = "#ff796c"
"xkcd:red" = "#e50000"
"xkcd:cherry" = "#cf0234"
"xkcd:rosa" = "#fe86a4"
"xkcd:pink" = "#ff81c0"
"xkcd:purple" = "#7e1e9c"
"xkcd:lavender" = "#c79fef"
"xkcd:brown" = "#653700"
"##;

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed
                .colors
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        })
    }

    /// Look up a color name defined by this stylesheet
    ///
    /// Returns None if the name is not defined here.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.colors.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Resolve a color name to a value an SVG renderer understands
    ///
    /// Fallback order:
    /// 1. This stylesheet
    /// 2. The default palette
    /// 3. Hex values and plain names pass through unchanged
    /// 4. Unknown prefixed names (`xkcd:`, `tab:`) become mid gray
    pub fn resolve_or_default(&self, name: &str) -> String {
        if let Some(color) = self.resolve(name) {
            return color.to_string();
        }

        let default = Self::default();
        if let Some(color) = default.resolve(name) {
            return color.to_string();
        }

        if name.starts_with('#') || !name.contains(':') {
            return name.to_string();
        }

        warn!(color = name, fallback = UNKNOWN_COLOR, "unknown palette color");
        UNKNOWN_COLOR.to_string()
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}
