//! Keyed attribute container.

use super::Attributes;
use super::value;
use serde_json::Value;

/// Cached attribute values of one entity plus its load state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    values: Attributes,
    loaded: bool,
    load_count: u32,
}

impl AttributeStore {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn values(&self) -> &Attributes {
        &self.values
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of completed remote loads.
    pub fn load_count(&self) -> u32 {
        self.load_count
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded = true;
        self.load_count += 1;
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn i64(&self, key: &str) -> i64 {
        self.get(key).and_then(value::as_i64).unwrap_or(0)
    }

    /// Ids held by a list-valued attribute, in stored order.
    pub fn ids(&self, key: &str) -> Vec<&str> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_values_read_as_absent() {
        let mut store = AttributeStore::default();
        store.insert("current_song", Value::Null);
        assert!(store.get("current_song").is_none());
        assert!(!store.contains("current_song"));
    }

    #[test]
    fn numeric_reads_accept_strings() {
        let mut store = AttributeStore::default();
        store.insert("points", json!("12"));
        store.insert("fans", json!(3));
        assert_eq!(store.i64("points"), 12);
        assert_eq!(store.i64("fans"), 3);
        assert_eq!(store.i64("missing"), 0);
    }

    #[test]
    fn mark_loaded_counts_loads() {
        let mut store = AttributeStore::default();
        assert!(!store.is_loaded());
        store.mark_loaded();
        store.mark_loaded();
        assert!(store.is_loaded());
        assert_eq!(store.load_count(), 2);
    }

    #[test]
    fn ids_skip_non_string_entries() {
        let mut store = AttributeStore::default();
        store.insert("djs", json!(["a", 1, "b"]));
        assert_eq!(store.ids("djs"), vec!["a", "b"]);
    }
}
