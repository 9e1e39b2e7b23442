//! Flat field map produced from a phone reply

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Field name → text value taken from one phone reply.
///
/// Snapshots have no identity of their own; two snapshots are equal when
/// they hold the same fields with the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceSnapshot {
    fields: HashMap<String, String>,
}

impl DeviceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any earlier value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeviceSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

impl From<HashMap<String, String>> for DeviceSnapshot {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_insert_wins() {
        let snapshot: DeviceSnapshot = [("A", "1"), ("A", "2")].into_iter().collect();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("A"), Some("2"));
    }

    #[test]
    fn test_equality_is_field_by_field() {
        let a: DeviceSnapshot = [("A", "1"), ("B", "2")].into_iter().collect();
        let b: DeviceSnapshot = [("B", "2"), ("A", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let snapshot: DeviceSnapshot = [("MessageWaiting", "Yes")].into_iter().collect();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"MessageWaiting":"Yes"}"#);
    }
}
