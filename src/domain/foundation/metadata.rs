//! Metadata value object: an ordered bag of JSON-safe key/value pairs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Structured metadata attached to messages and audit records.
///
/// Keys are sorted so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    /// Creates an empty metadata bag.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns true if the bag contains no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Inserts an entry, replacing any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, Value>> for Metadata {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_starts_empty() {
        let meta = Metadata::new();
        assert!(meta.is_empty());
        assert_eq!(meta.len(), 0);
    }

    #[test]
    fn metadata_insert_and_get() {
        let mut meta = Metadata::new();
        meta.insert("provider", json!("mock"));
        assert_eq!(meta.get("provider"), Some(&json!("mock")));
        assert_eq!(meta.get("missing"), None);
    }

    #[test]
    fn metadata_with_chains_entries() {
        let meta = Metadata::new()
            .with("args", json!({"quantity": 2}))
            .with("status", json!("success"));
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("status"), Some(&json!("success")));
    }

    #[test]
    fn metadata_insert_replaces_existing_key() {
        let meta = Metadata::new()
            .with("mode", json!("mock"))
            .with("mode", json!("live"));
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("mode"), Some(&json!("live")));
    }

    #[test]
    fn metadata_serializes_as_plain_object() {
        let meta = Metadata::new().with("b", json!(2)).with("a", json!(1));
        let json = serde_json::to_string(&meta).unwrap();
        // BTreeMap keys serialize sorted
        assert_eq!(json, r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn metadata_deserializes_from_object() {
        let meta: Metadata = serde_json::from_str(r#"{"tool":"calculate_pricing"}"#).unwrap();
        assert_eq!(meta.get("tool"), Some(&json!("calculate_pricing")));
    }
}
