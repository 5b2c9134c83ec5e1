//! Insertion-ordered metadata record.

use super::value::{RawValue, TagValue};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Ordered mapping from field key to value.
///
/// Keys keep the position of their first insertion. Writing an existing key
/// replaces its value in place, so later writers win without reordering the
/// record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    entries: Vec<(String, TagValue)>,
    index: HashMap<String, usize>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TagValue>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Convert and insert a tag-service value. Returns `false` when the value
    /// was skipped by the conversion rules.
    pub fn merge_raw(&mut self, key: impl Into<String>, raw: RawValue) -> bool {
        match TagValue::from_raw(raw) {
            Some(value) => {
                self.insert(key, value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// First of `keys` whose value is present and truthy.
    pub fn first_truthy(&self, keys: &[&str]) -> Option<&TagValue> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .find(|v| v.is_truthy())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Keys whose name or formatted value contains `query`, case-insensitively.
    /// An empty query matches every key.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        self.iter()
            .filter(|(key, value)| {
                query.is_empty()
                    || key.to_lowercase().contains(&query)
                    || super::format_value(key, value)
                        .to_lowercase()
                        .contains(&query)
            })
            .map(|(key, _)| key)
            .collect()
    }
}

impl Serialize for MetadataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
