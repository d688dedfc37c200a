//! Translation table tree

use std::collections::BTreeMap;

use serde_json::Value;

/// A node of a translation table.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationValue {
    Text(String),
    Table(TranslationTable),
    List(Vec<TranslationValue>),
    /// Numbers, booleans and `null`, kept as parsed.
    Other(Value),
}

impl TranslationValue {
    /// The string value, if this is a text leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_table(&self) -> Option<&TranslationTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Steps one key segment down: object members by name, list items by index.
    fn child(&self, segment: &str) -> Option<&Self> {
        match self {
            Self::Table(table) => table.get(segment),
            Self::List(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
            Self::Text(_) | Self::Other(_) => None,
        }
    }
}

impl From<Value> for TranslationValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Object(map) => Self::Table(TranslationTable {
                entries: map.into_iter().map(|(key, value)| (key, value.into())).collect(),
            }),
            Value::Array(items) => Self::List(items.into_iter().map(Into::into).collect()),
            other => Self::Other(other),
        }
    }
}

/// Immutable tree of translations parsed from one JSON file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    /// Top-level members
    entries: BTreeMap<String, TranslationValue>,
}

impl TranslationTable {
    /// Builds a table from a parsed JSON document.
    ///
    /// Returns `None` unless the document root is an object.
    #[must_use]
    pub fn from_json(json: Value) -> Option<Self> {
        match TranslationValue::from(json) {
            TranslationValue::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Top-level member by name.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&TranslationValue> {
        self.entries.get(segment)
    }

    /// Resolves a key path such as `menu.file.open` by walking the tree.
    ///
    /// Absence at any segment yields `None`. Leaf types are not checked: a key
    /// naming an inner object returns that object.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use lingualizer::translation::TranslationTable;
    ///
    /// let table = TranslationTable::from_json(json!({"a": {"b": "hello"}})).unwrap();
    /// assert_eq!(table.lookup("a.b", ".").and_then(|v| v.as_str()), Some("hello"));
    /// assert!(table.lookup("a.c", ".").is_none());
    /// ```
    #[must_use]
    pub fn lookup(&self, key: &str, separator: &str) -> Option<&TranslationValue> {
        let mut segments = key.split(separator);
        let first = self.get(segments.next()?)?;
        segments.try_fold(first, |node, segment| node.child(segment))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every key path that reaches a leaf, joined with `separator`.
    ///
    /// List items are addressed by index (`items.0`), matching [`Self::lookup`].
    #[must_use]
    pub fn leaf_keys(&self, separator: &str) -> Vec<String> {
        let mut keys = Vec::new();
        for (key, value) in &self.entries {
            collect_leaf_keys(value, separator, key, &mut keys);
        }
        keys
    }
}

/// Depth-first walk appending the key path of every leaf under `prefix`.
fn collect_leaf_keys(
    value: &TranslationValue,
    separator: &str,
    prefix: &str,
    keys: &mut Vec<String>,
) {
    match value {
        TranslationValue::Table(table) => {
            for (key, child) in &table.entries {
                collect_leaf_keys(child, separator, &format!("{prefix}{separator}{key}"), keys);
            }
        }
        TranslationValue::List(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_leaf_keys(child, separator, &format!("{prefix}{separator}{index}"), keys);
            }
        }
        TranslationValue::Text(_) | TranslationValue::Other(_) => keys.push(prefix.to_string()),
    }
}
