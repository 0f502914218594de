//! Caller-supplied metadata attached to a transfer.

use serde_json::Value;

/// A single metadata value.
///
/// `File` marks the entry that stands for the file being transferred; its
/// key becomes the request field that carries the file bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    File,
    Value(Value),
}

impl MetaValue {
    /// Returns `true` for values that are dropped from the request.
    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Value(Value::Null))
    }
}

impl From<Value> for MetaValue {
    fn from(v: Value) -> Self {
        MetaValue::Value(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Value(Value::String(v.to_string()))
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Value(Value::String(v))
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Value(Value::Bool(v))
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Value(Value::from(v))
    }
}

impl From<i32> for MetaValue {
    fn from(v: i32) -> Self {
        MetaValue::Value(Value::from(v))
    }
}

impl From<u64> for MetaValue {
    fn from(v: u64) -> Self {
        MetaValue::Value(Value::from(v))
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Value(Value::from(v))
    }
}

impl<T: Into<MetaValue>> From<Option<T>> for MetaValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(MetaValue::Value(Value::Null))
    }
}

/// Ordered key/value side-channel merged into the request next to the file.
///
/// Keys are unique; inserting an existing key replaces its value in place
/// and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataBag {
    entries: Vec<(String, MetaValue)>,
}

impl MetadataBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Marks `key` as the entry carrying the file itself.
    pub fn with_file(self, key: impl Into<String>) -> Self {
        self.with(key, MetaValue::File)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes and returns the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Returns the first key whose value stands for the file.
    pub fn file_key(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| matches!(v, MetaValue::File))
            .map(|(k, _)| k.as_str())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<MetaValue>> FromIterator<(K, V)> for MetadataBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = MetadataBag::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}
