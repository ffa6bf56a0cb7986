//! An insertion-ordered mapping that keeps span information for its keys.

use crate::tree::scalar_to_string;
use crate::{Error, Result, YamlTree, YamlValue};
use rulemark_source_map::Span;
use yaml_rust2::Yaml;

/// A key/value pair where both sides carry their own span.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlMapEntry {
    /// The key, a scalar tree in well-formed input
    pub key: YamlTree,
    /// The value
    pub value: YamlTree,
}

impl YamlMapEntry {
    /// Create a new entry.
    pub fn new(key: YamlTree, value: YamlTree) -> Self {
        Self { key, value }
    }

    /// Span covering the whole entry, key start through value end.
    pub fn span(&self) -> Span {
        self.key.span.extend_to(&self.value.span, false)
    }

    fn key_matches(&self, key: &str) -> bool {
        match &self.key.value {
            YamlValue::Scalar(Yaml::String(s)) => s == key,
            YamlValue::Scalar(other) => scalar_to_string(other).as_deref() == Some(key),
            _ => false,
        }
    }
}

/// Ordered sequence of span-carrying key/value pairs.
///
/// Keys are expected to be unique in well-formed input, but the structure
/// does not enforce it: `insert` always appends, and string lookup returns
/// the first matching entry in insertion order. A duplicate key therefore
/// shadows earlier entries for lookup while every entry stays visible in
/// iteration, so a later validation stage can report the duplicate with
/// both spans in hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YamlMap {
    entries: Vec<YamlMapEntry>,
}

impl YamlMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Never overwrites, even when an entry with an equal
    /// key string is already present.
    pub fn insert(&mut self, key: YamlTree, value: YamlTree) {
        self.entries.push(YamlMapEntry::new(key, value));
    }

    /// The value of the first entry whose key's string form equals `key`.
    ///
    /// Absence is an ordinary outcome, not an error.
    pub fn get(&self, key: &str) -> Option<&YamlTree> {
        self.entries
            .iter()
            .find(|entry| entry.key_matches(key))
            .map(|entry| &entry.value)
    }

    /// The key tree of the first entry whose key's string form equals
    /// `key`, so its span can drive key-targeted diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] when no entry matches; callers are
    /// expected to have checked with [`get`](Self::get) first.
    pub fn key_tree(&self, key: &str) -> Result<&YamlTree> {
        self.entries
            .iter()
            .find(|entry| entry.key_matches(key))
            .map(|entry| &entry.key)
            .ok_or_else(|| Error::MissingKey {
                key: key.to_string(),
            })
    }

    /// The entries in insertion order, duplicates included.
    pub fn items(&self) -> &[YamlMapEntry] {
        &self.entries
    }

    /// The key trees in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &YamlTree> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// The value trees in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &YamlTree> {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(YamlTree, YamlTree)> for YamlMap {
    fn from_iter<I: IntoIterator<Item = (YamlTree, YamlTree)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| YamlMapEntry::new(key, value))
                .collect(),
        }
    }
}
