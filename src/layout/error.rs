//! Error types for resize application

use thiserror::Error;

/// Errors raised when a resize action is refused by its configuration
///
/// With the default configuration no error is ever produced: unknown ids are
/// skipped and every dimension is accepted.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// A resize entry names an element that is not a node in the graph
    #[error("unknown element '{element_id}'{}", format_suggestions(.suggestions))]
    UnknownElement {
        element_id: String,
        suggestions: Vec<String>,
    },

    /// A resize entry requests a NaN or infinite size
    #[error("non-finite {axis} {value} for element '{element_id}'")]
    NonFiniteDimension {
        element_id: String,
        axis: Axis,
        value: f64,
    },
}

/// Dimension component named in an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

impl ResizeError {
    /// Create an unknown element error with suggestions
    pub fn unknown(element_id: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownElement {
            element_id: element_id.into(),
            suggestions,
        }
    }

    /// Create a non-finite dimension error
    pub fn non_finite(element_id: impl Into<String>, axis: Axis, value: f64) -> Self {
        Self::NonFiniteDimension {
            element_id: element_id.into(),
            axis,
            value,
        }
    }

    /// Id of the element the error refers to
    pub fn element_id(&self) -> &str {
        match self {
            Self::UnknownElement { element_id, .. } => element_id,
            Self::NonFiniteDimension { element_id, .. } => element_id,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownElement { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}
