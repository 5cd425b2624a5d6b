use std::path::Path;

use crate::parser::error::ParseError;
use crate::parser::grammar::is_valid_id;

/// Id and optional type encoded in a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub id: String,
    pub doc_type: Option<String>,
}

/// Derive the document id and type from a path.
///
/// The final dot-separated part of the file name is the extension and is
/// ignored. Of what remains, a single part is the id; with two or more, the
/// last is the type and the rest, rejoined with dots, is the id:
///
/// - `test.dry` -> id `test`
/// - `test.scene.dry` -> id `test`, type `scene`
/// - `foo.bar.scene.dry` -> id `foo.bar`, type `scene`
pub fn resolve(path: &str) -> Result<FileIdentity, ParseError> {
    let basename = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ParseError::filename(path))?;

    let mut parts: Vec<&str> = basename.split('.').collect();
    // Drop the extension; a name without one has nothing to take an id from.
    if parts.len() < 2 || parts.pop().is_some_and(str::is_empty) {
        return Err(ParseError::filename(path));
    }

    if !parts.iter().all(|part| is_valid_id(part)) {
        return Err(ParseError::filename(path));
    }

    let doc_type = if parts.len() >= 2 {
        parts.pop().map(str::to_string)
    } else {
        None
    };

    Ok(FileIdentity {
        id: parts.join("."),
        doc_type,
    })
}
