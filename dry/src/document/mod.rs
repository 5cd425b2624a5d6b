pub mod value;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::options::OptionsBlock;
use crate::parser::grammar::camel_case;

pub use value::{Segment, Value};

/// One node of a parsed DRY document: the file itself, or one `@section`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentNode {
    /// Fully qualified id. Sections are `<file id>.<local id>`.
    pub id: String,
    /// Only ever set on the file node, from the filename or a `type:` property.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    pub properties: Properties,
    /// Prose body, or an empty string.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsBlock>,
    /// Direct children, in source order.
    pub sections: Vec<DocumentNode>,
}

impl DocumentNode {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        DocumentNode {
            id: id.into(),
            doc_type: None,
            properties: Properties::new(),
            content: String::new(),
            options: None,
            sections: Vec::new(),
        }
    }

    /// The last segment of the node's id. For `@three.sub` this is `sub`.
    pub fn local_id(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }

    /// Find a direct child section by the id it was declared with.
    pub fn section(&self, local_id: &str) -> Option<&DocumentNode> {
        self.sections.iter().find(|s| {
            s.id.strip_prefix(self.id.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                == Some(local_id)
        })
    }

    /// Shorthand for `self.properties.get(name)`.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// Insertion-ordered property map keyed by camel-cased name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, Value)>,
}

impl Properties {
    pub fn new() -> Self {
        Properties::default()
    }

    /// Look a property up by name. Hyphenated names are camel-cased first, so
    /// `prop-one` and `propOne` find the same entry.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = camel_case(name);
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a property. The parser rejects duplicate names before this.
    pub(crate) fn push(&mut self, name: String, value: Value) {
        debug_assert!(!self.entries.iter().any(|(key, _)| *key == name));
        self.entries.push((name, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
