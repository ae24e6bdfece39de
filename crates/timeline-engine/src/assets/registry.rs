use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Caption and outbound link authored for one media file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub link: String,
}

impl ItemData {
    pub fn caption(&self) -> Option<&str> {
        (!self.caption.is_empty()).then_some(self.caption.as_str())
    }

    pub fn link(&self) -> Option<&str> {
        (!self.link.is_empty()).then_some(self.link.as_str())
    }
}

/// Per-item metadata keyed by `(month, filename)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCatalog {
    months: HashMap<String, HashMap<String, ItemData>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, month: &str, filename: &str, data: ItemData) {
        self.months
            .entry(month.to_string())
            .or_default()
            .insert(filename.to_string(), data);
    }

    /// Look up metadata. Files without an entry get an empty caption and link.
    pub fn get(&self, month: &str, filename: &str) -> ItemData {
        self.months
            .get(month)
            .and_then(|files| files.get(filename))
            .cloned()
            .unwrap_or_default()
    }
}
