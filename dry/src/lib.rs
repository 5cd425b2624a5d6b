pub mod document;
pub mod options;
pub mod parser;

use std::path::Path;

pub use document::{DocumentNode, Properties, Segment, Value};
pub use options::{OptionEntry, OptionsBlock};
pub use parser::{ErrorKind, LoadError, ParseError, Parser};

/// Parse DRY text. `path` supplies the document id and type and is never read.
pub fn parse_from_content(path: &str, text: &str) -> Result<DocumentNode, ParseError> {
    Parser::new(path, text).parse()
}

/// Read a file and parse it. Read failures are reported without a document.
pub fn parse_from_file(path: impl AsRef<Path>) -> Result<DocumentNode, LoadError> {
    let path = path.as_ref();
    let text = read_source(path)?;
    Ok(parse_from_content(&path.to_string_lossy(), &text)?)
}

/// Read the text of a DRY file without parsing it.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
