//! Error types for reading model and action input

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Which document an input error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Model,
    Action,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Model => f.write_str("model"),
            InputKind::Action => f.write_str("action"),
        }
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {kind} file '{}': {source}", path.display())]
    Io {
        kind: InputKind,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid {kind} JSON at line {line}, column {column}: {message}")]
    Json {
        kind: InputKind,
        line: usize,
        column: usize,
        span: Span,
        message: String,
    },
}

impl InputError {
    /// Wrap a serde_json error, locating it in `source`
    pub fn json(kind: InputKind, source: &str, err: serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());
        let offset = byte_offset(source, line, column);
        let end = source[offset..]
            .chars()
            .next()
            .map_or(offset, |c| offset + c.len_utf8());
        InputError::Json {
            kind,
            line,
            column,
            span: offset..end,
            message: strip_position(&err.to_string()),
        }
    }

    pub fn io(kind: InputKind, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InputError::Io {
            kind,
            path: path.into(),
            source,
        }
    }

    /// Get the source span (byte range) if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            InputError::Json { span, .. } => Some(span),
            InputError::Io { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let InputError::Json {
            kind,
            span,
            message,
            ..
        } = self
        else {
            return self.to_string();
        };

        // ariadne counts in chars, not bytes
        let span = char_span(source, span);
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(format!("invalid {kind} JSON"))
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Convert a 1-based line and column into a byte offset, clamped to the source
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Convert a byte range of `source` into a char range
fn char_span(source: &str, span: &Span) -> Span {
    let chars_before = |byte: usize| {
        source
            .char_indices()
            .take_while(|(i, _)| *i < byte)
            .count()
    };
    chars_before(span.start)..chars_before(span.end)
}

/// serde_json appends " at line L column C" to its messages
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}
