//! Portable value model that crosses the process boundary.
//!
//! The set of kinds is closed: every value a script hands to the bridge is
//! reduced to one of these variants before it leaves the render process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Null,
    Bool,
    Int,
    UInt,
    Double,
    String,
    Date,
    Object,
}

/// A value in its process-portable form.
///
/// Serialized adjacently tagged as `{"type": "Int", "value": 3}`; `Null`
/// carries no `value` field. Non-finite doubles travel as the strings
/// `"NaN"`, `"Infinity"` and `"-Infinity"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    UInt(u32),
    #[serde(with = "double_repr")]
    Double(f64),
    String(String),
    Date(DateTime<Utc>),
    Object(JsObject),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::UInt(_) => ValueType::UInt,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::Date(_) => ValueType::Date,
            Value::Object(_) => ValueType::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&JsObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::UInt(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Date(dt)
    }
}

impl From<JsObject> for Value {
    fn from(obj: JsObject) -> Self {
        Value::Object(obj)
    }
}

mod double_repr {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct DoubleVisitor;

        impl<'de> Visitor<'de> for DoubleVisitor {
            type Value = f64;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number, \"NaN\", \"Infinity\" or \"-Infinity\"")
            }

            fn visit_f64<E>(self, value: f64) -> Result<f64, E> {
                Ok(value)
            }

            fn visit_i64<E>(self, value: i64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_u64<E>(self, value: u64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
                match value {
                    "NaN" => Ok(f64::NAN),
                    "Infinity" => Ok(f64::INFINITY),
                    "-Infinity" => Ok(f64::NEG_INFINITY),
                    _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
                }
            }
        }

        deserializer.deserialize_any(DoubleVisitor)
    }
}

/// One key/value pair of a [`JsObject`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub value: Value,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        ObjectEntry { key: key.into(), value }
    }
}

/// Holder for the entries of a script object.
///
/// Entries keep the order in which the native runtime enumerated the keys.
/// The holder is a plain list rather than a map: the native runtime already
/// guarantees unique keys, and the wire form is a sequence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsObject {
    entries: Vec<ObjectEntry>,
}

impl JsObject {
    pub fn new() -> Self {
        JsObject::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        JsObject {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push(ObjectEntry::new(key, value));
    }

    /// First entry stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn entries(&self) -> &[ObjectEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ObjectEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObjectEntry> {
        self.entries.iter()
    }
}

impl From<Vec<ObjectEntry>> for JsObject {
    fn from(entries: Vec<ObjectEntry>) -> Self {
        JsObject { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for JsObject {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        JsObject {
            entries: iter.into_iter().map(|(k, v)| ObjectEntry::new(k, v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a JsObject {
    type Item = &'a ObjectEntry;
    type IntoIter = std::slice::Iter<'a, ObjectEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_matches_payload() {
        assert_eq!(Value::Null.value_type(), ValueType::Null);
        assert_eq!(Value::from(true).value_type(), ValueType::Bool);
        assert_eq!(Value::from(-1i32).value_type(), ValueType::Int);
        assert_eq!(Value::from(u32::MAX).value_type(), ValueType::UInt);
        assert_eq!(Value::from(2.5).value_type(), ValueType::Double);
        assert_eq!(Value::from("s").value_type(), ValueType::String);
        assert_eq!(Value::from(JsObject::new()).value_type(), ValueType::Object);
    }

    #[test]
    fn test_object_preserves_insertion_order() {
        let obj: JsObject = [("z", Value::Int(1)), ("a", Value::Int(2)), ("m", Value::Int(3))].into_iter().collect();
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(obj.get("a"), Some(&Value::Int(2)));
        assert_eq!(obj.get("missing"), None);
    }

    #[test]
    fn test_accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
        assert_eq!(Value::from("name").as_str(), Some("name"));
        assert_eq!(Value::Int(1).as_str(), None);
        assert!(Value::Null.as_object().is_none());

        let empty = JsObject::new();
        assert!(empty.is_empty());
        assert_eq!(empty.iter().count(), 0);

        let mut obj = JsObject::with_capacity(2);
        obj.push("x", Value::Bool(true));
        obj.push("y", Value::from("s"));
        assert!(!obj.is_empty());
        let keys: Vec<&str> = obj.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(
            obj.into_entries(),
            vec![ObjectEntry::new("x", Value::Bool(true)), ObjectEntry::new("y", Value::from("s"))]
        );
    }

    #[test]
    fn test_non_finite_doubles_survive_serialization() {
        for d in [f64::INFINITY, f64::NEG_INFINITY, -0.0, 1.5e-300] {
            let json = serde_json::to_string(&Value::Double(d)).unwrap();
            assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), Value::Double(d), "{json}");
        }
        let json = serde_json::to_string(&Value::Double(f64::NAN)).unwrap();
        assert_eq!(json, r#"{"type":"Double","value":"NaN"}"#);
        assert!(matches!(serde_json::from_str::<Value>(&json).unwrap(), Value::Double(d) if d.is_nan()));
        assert!(serde_json::from_str::<Value>(r#"{"type":"Double","value":"nope"}"#).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let mut obj = JsObject::new();
        obj.push("b", Value::Null);
        obj.push("a", Value::UInt(3_000_000_000));
        let json = serde_json::to_string(&Value::Object(obj)).unwrap();
        assert_eq!(
            json,
            r#"{"type":"Object","value":[{"key":"b","value":{"type":"Null"}},{"key":"a","value":{"type":"UInt","value":3000000000}}]}"#
        );
    }
}
