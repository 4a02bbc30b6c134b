//! Error types for reading diagram descriptions

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::layout::LayoutError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum DiagramParseError {
    /// The text is not a well-formed diagram description
    #[error("invalid diagram: {message}")]
    Syntax { span: Option<Span>, message: String },

    /// An entry is well-formed but cannot be placed on the canvas
    #[error("{error}")]
    Layout {
        span: Option<Span>,
        #[source]
        error: LayoutError,
    },
}

impl DiagramParseError {
    pub fn syntax(span: Option<Span>, message: impl Into<String>) -> Self {
        Self::Syntax {
            span,
            message: message.into(),
        }
    }

    pub fn layout(span: Span, error: LayoutError) -> Self {
        Self::Layout {
            span: Some(span),
            error,
        }
    }

    /// Source range the error points at, when known
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Syntax { span, .. } | Self::Layout { span, .. } => span.as_ref(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {self}\n");
        };
        let (headline, detail) = match self {
            Self::Syntax { message, .. } => ("invalid diagram".to_string(), message.clone()),
            Self::Layout { error, .. } => (error.to_string(), layout_hint(error)),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(headline)
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(detail)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match (written, String::from_utf8(buf)) {
            (Ok(()), Ok(report)) => report,
            _ => format!("Error: {self}\n"),
        }
    }
}

fn layout_hint(error: &LayoutError) -> String {
    match error {
        LayoutError::UnknownBox { suggestions, .. } if !suggestions.is_empty() => {
            format!("did you mean '{}'?", suggestions[0])
        }
        LayoutError::UnknownBox { .. } => "no box with this name is defined".to_string(),
        LayoutError::DuplicateName { .. } => "this name is already taken".to_string(),
        LayoutError::AmbiguousOrientation { .. } => "boxes are not placed for this route".to_string(),
        _ => "in this entry".to_string(),
    }
}

impl From<toml::de::Error> for DiagramParseError {
    fn from(err: toml::de::Error) -> Self {
        Self::Syntax {
            span: err.span(),
            message: err.message().to_string(),
        }
    }
}
