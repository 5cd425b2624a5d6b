pub mod entry;

use serde::Serialize;

use crate::document::{Properties, Value};

pub use entry::OptionEntry;

/// The single list of choices a node may carry, plus any `- name: value`
/// properties written among the entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionsBlock {
    pub options: Vec<OptionEntry>,
    pub properties: Properties,
}

impl OptionsBlock {
    pub(crate) fn new() -> Self {
        OptionsBlock::default()
    }

    /// Look up an entry by its full id string, sigil included (`@foo`, `#bar`).
    pub fn get(&self, id: &str) -> Option<&OptionEntry> {
        self.options.iter().find(|entry| entry.id == id)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
