use serde::Serialize;

use crate::document::Value;

/// One `- @id` or `- #tag` line of an options block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionEntry {
    /// The id as written, sigil and any leading relative dots included.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(rename = "viewIf", skip_serializing_if = "Option::is_none")]
    pub view_if: Option<Value>,
    pub line: usize,
}

impl OptionEntry {
    pub fn is_tag(&self) -> bool {
        self.id.starts_with('#')
    }

    /// The id without its `@` or `#` sigil. Relative dots are kept.
    pub fn target(&self) -> &str {
        &self.id[1..]
    }

    /// True for `@..foo`-style ids that resolve against the current scope.
    pub fn is_relative(&self) -> bool {
        !self.is_tag() && self.target().starts_with('.')
    }
}
