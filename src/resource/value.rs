//! Helpers for reading loosely-typed protocol values.

use super::Attributes;
use crate::error::{ClientError, ClientResult};
use serde_json::Value;

/// An id, whether the service sent it as a string or a number.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn object(key: &'static str, value: Value) -> ClientResult<Attributes> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ClientError::Attribute {
            key,
            expected: "an object",
        }),
    }
}

/// Items of a list attribute.
///
/// Some payloads encode ordered lists as objects keyed by position
/// (`{"0": .., "1": ..}`); those are returned in key order.
pub fn list(key: &'static str, value: Value) -> ClientResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut entries: Vec<(i64, Value)> = map
                .into_iter()
                .map(|(k, v)| (k.parse().unwrap_or(i64::MAX), v))
                .collect();
            entries.sort_by_key(|(position, _)| *position);
            Ok(entries.into_iter().map(|(_, v)| v).collect())
        }
        Value::Null => Ok(Vec::new()),
        _ => Err(ClientError::Attribute {
            key,
            expected: "a list",
        }),
    }
}

/// A string field of a raw message, if present.
pub fn str_in<'a>(attrs: &'a Attributes, key: &str) -> Option<&'a str> {
    attrs.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_string_accepts_numbers() {
        assert_eq!(id_string(&json!(42)), Some("42".to_string()));
        assert_eq!(id_string(&json!("abc")), Some("abc".to_string()));
        assert_eq!(id_string(&json!("")), None);
        assert_eq!(id_string(&json!(null)), None);
    }

    #[test]
    fn list_orders_positional_objects() {
        let items = list("djs", json!({"1": "b", "0": "a", "2": "c"})).unwrap();
        assert_eq!(items, vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn list_rejects_scalars() {
        let err = list("djs", json!(5)).unwrap_err();
        assert_eq!(err.error_code(), "invalid_attribute");
    }

    #[test]
    fn as_i64_truncates_floats() {
        assert_eq!(as_i64(&json!(2.9)), Some(2));
        assert_eq!(as_i64(&json!("-3")), Some(-3));
        assert_eq!(as_i64(&json!(true)), None);
    }
}
