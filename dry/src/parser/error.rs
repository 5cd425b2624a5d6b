use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// Broad class of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No id could be derived from the file name.
    Filename,
    /// A line matches nothing valid for the current phase.
    Grammar,
    /// Reserved, redefined, reused or malformed names and ids.
    Naming,
    /// Duplicate options, or content where none may appear.
    Structure,
}

/// The first problem found in a DRY document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub path: String,
    /// 1-based; absent only for filename errors.
    pub line: Option<usize>,
    /// Byte range of the offending line in the parsed text.
    pub span: Option<Range<usize>>,
    pub file_id: usize,
}

impl ParseError {
    pub fn filename(path: impl Into<String>) -> Self {
        ParseError {
            kind: ErrorKind::Filename,
            message: "Cannot extract id or type from filename.".into(),
            path: path.into(),
            line: None,
            span: None,
            file_id: 0,
        }
    }

    pub fn at_line(
        kind: ErrorKind,
        message: impl Into<String>,
        path: impl Into<String>,
        line: usize,
        span: Range<usize>,
        file_id: usize,
    ) -> Self {
        ParseError {
            kind,
            message: message.into(),
            path: path.into(),
            line: Some(line),
            span: Some(span),
            file_id,
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(&self.message);
        match &self.span {
            Some(span) => diagnostic.with_labels(vec![
                Label::primary(self.file_id, span.clone()).with_message(self.kind.label()),
            ]),
            None => diagnostic.with_notes(vec![format!("while reading {}", self.path)]),
        }
    }
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::Filename => "bad file name",
            ErrorKind::Grammar => "unexpected line",
            ErrorKind::Naming => "bad name",
            ErrorKind::Structure => "misplaced here",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} line {}: {}", self.path, line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Failure to load and parse a file from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl LoadError {
    /// The parse error, if reading the file succeeded.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            LoadError::Parse(err) => Some(err),
            LoadError::Io { .. } => None,
        }
    }
}
