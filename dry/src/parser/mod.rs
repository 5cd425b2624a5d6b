pub mod error;
pub mod filename;
pub mod grammar;
mod option_line;
mod reader;
mod structural;

pub use error::{ErrorKind, LoadError, ParseError};
pub use filename::FileIdentity;

use log::debug;

use crate::document::DocumentNode;

/// Parser entry point.
pub struct Parser {
    path: String,
    source: String,
    file_id: usize,
}

impl Parser {
    /// `path` is used for the document id and type and for error messages; it
    /// is never opened.
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Parser {
            path: path.into(),
            source: source.into(),
            file_id: 0,
        }
    }

    /// The codespan file id attached to errors, for rendering diagnostics.
    pub fn with_file_id(mut self, file_id: usize) -> Self {
        self.file_id = file_id;
        self
    }

    /// Resolve the file id and type, then parse the whole document.
    pub fn parse(&self) -> Result<DocumentNode, ParseError> {
        let identity = filename::resolve(&self.path).map_err(|mut err| {
            err.file_id = self.file_id;
            err
        })?;
        debug!(
            "{}: id '{}', type {:?}",
            self.path, identity.id, identity.doc_type
        );
        structural::parse_document(&self.path, &self.source, self.file_id, identity)
    }
}
