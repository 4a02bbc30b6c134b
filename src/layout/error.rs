//! Error types for box layout and connection routing

use thiserror::Error;

use crate::geometry::PathError;

/// Errors that can occur while placing boxes and routing connections
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The routed path cannot be turned into arrow geometry
    #[error("invalid arrow path: {0}")]
    InvalidPath(#[from] PathError),

    /// A box was used before its layout fields were populated
    #[error("box '{name}' has no layout yet: field '{field}' is not set")]
    UninitializedLayout { name: String, field: &'static str },

    /// The relative placement of the boxes does not determine a route
    #[error("ambiguous orientation: {reason}")]
    AmbiguousOrientation { reason: String },

    /// A box name that is already registered on the canvas
    #[error("box name '{name}' already exists; box names must be unique")]
    DuplicateName { name: String },

    /// Lookup of a box name that was never registered
    #[error("unknown box '{name}'{}", format_suggestions(suggestions))]
    UnknownBox {
        name: String,
        suggestions: Vec<String>,
    },

    /// Title placement requested without any title text
    #[error("the tree has no title; provide one before placing it")]
    MissingTitle,
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

impl LayoutError {
    /// Create an uninitialized layout error
    pub fn uninitialized(name: impl Into<String>, field: &'static str) -> Self {
        Self::UninitializedLayout {
            name: name.into(),
            field,
        }
    }

    /// Create an ambiguous orientation error
    pub fn ambiguous(reason: impl Into<String>) -> Self {
        Self::AmbiguousOrientation {
            reason: reason.into(),
        }
    }

    /// Create a duplicate name error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create an unknown box error with suggestions
    pub fn unknown(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownBox {
            name: name.into(),
            suggestions,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownBox { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}
