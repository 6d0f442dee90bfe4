//! Conversion of engine values into the portable [`Value`] model.

use crate::core::{JsObject, NativeValue, Value};
use crate::error::BridgeError;
use crate::js_date::base_time_to_utc;
use crate::unsupported_value_kind;

/// Runtime kind of a native value, as decided by [`classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeKind {
    /// Promise, function, array or array buffer.
    Unsupported,
    Null,
    Object,
    Bool,
    Int,
    UInt,
    Double,
    String,
    Date,
    /// Matched none of the engine predicates.
    Unknown,
}

/// Classify a native value.
///
/// The engine predicates overlap, so the first match wins: rejected kinds
/// are tested before anything else (an array is also an object), objects
/// before primitives, and `int` before `uint` before `double`.
pub fn classify<V: NativeValue>(value: &V) -> NativeKind {
    if value.is_promise() || value.is_function() || value.is_array_buffer() || value.is_array() {
        NativeKind::Unsupported
    } else if value.is_null() || value.is_undefined() {
        NativeKind::Null
    } else if value.is_object() {
        NativeKind::Object
    } else if value.is_bool() {
        NativeKind::Bool
    } else if value.is_int() {
        NativeKind::Int
    } else if value.is_uint() {
        NativeKind::UInt
    } else if value.is_double() {
        NativeKind::Double
    } else if value.is_string() {
        NativeKind::String
    } else if value.is_date() {
        NativeKind::Date
    } else {
        NativeKind::Unknown
    }
}

/// Convert a native value, recursing through object properties.
///
/// Fails with [`BridgeError::UnsupportedValueKind`] if the value, or any
/// property value beneath it, is a promise, function, array or array
/// buffer. Nothing partial is returned on failure.
pub fn convert<V: NativeValue>(value: &V) -> Result<Value, BridgeError> {
    let kind = classify(value);
    log::trace!("convert: classified as {kind:?}");
    match kind {
        NativeKind::Unsupported => Err(unsupported_value_kind!()),
        NativeKind::Null => Ok(Value::Null),
        NativeKind::Object => convert_object(value),
        NativeKind::Bool => Ok(Value::Bool(value.get_bool_value()?)),
        NativeKind::Int => Ok(Value::Int(value.get_int_value()?)),
        NativeKind::UInt => Ok(Value::UInt(value.get_uint_value()?)),
        NativeKind::Double => Ok(Value::Double(value.get_double_value()?)),
        NativeKind::String => Ok(Value::String(value.get_string_value()?)),
        NativeKind::Date => Ok(Value::Date(base_time_to_utc(value.get_date_value()?)?)),
        NativeKind::Unknown => {
            log::warn!("convert: value matched no known kind, sending null");
            Ok(Value::Null)
        }
    }
}

/// Convert a list of argument values in order, stopping at the first failure.
pub fn convert_all<V: NativeValue>(values: &[V]) -> Result<Vec<Value>, BridgeError> {
    values.iter().map(convert).collect()
}

fn convert_object<V: NativeValue>(value: &V) -> Result<Value, BridgeError> {
    let keys = value.get_keys()?;
    log::trace!("convert_object: keys = {keys:?}");
    let mut obj = JsObject::with_capacity(keys.len());
    for key in keys {
        let property = value.get_value(&key)?;
        let converted = convert(&property)?;
        obj.push(key, converted);
    }
    Ok(Value::Object(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal_error;

    // Answers yes to every predicate listed in `kinds`.
    #[derive(Default)]
    struct Flags {
        kinds: Vec<&'static str>,
    }

    impl Flags {
        fn with(kinds: &[&'static str]) -> Self {
            Flags { kinds: kinds.to_vec() }
        }

        fn has(&self, kind: &str) -> bool {
            self.kinds.iter().any(|k| *k == kind)
        }
    }

    impl NativeValue for Flags {
        fn is_undefined(&self) -> bool {
            self.has("undefined")
        }
        fn is_null(&self) -> bool {
            self.has("null")
        }
        fn is_bool(&self) -> bool {
            self.has("bool")
        }
        fn is_int(&self) -> bool {
            self.has("int")
        }
        fn is_uint(&self) -> bool {
            self.has("uint")
        }
        fn is_double(&self) -> bool {
            self.has("double")
        }
        fn is_date(&self) -> bool {
            self.has("date")
        }
        fn is_string(&self) -> bool {
            self.has("string")
        }
        fn is_object(&self) -> bool {
            self.has("object")
        }
        fn is_array(&self) -> bool {
            self.has("array")
        }
        fn is_array_buffer(&self) -> bool {
            self.has("arraybuffer")
        }
        fn is_function(&self) -> bool {
            self.has("function")
        }
        fn is_promise(&self) -> bool {
            self.has("promise")
        }
        fn get_bool_value(&self) -> Result<bool, BridgeError> {
            Ok(true)
        }
        fn get_int_value(&self) -> Result<i32, BridgeError> {
            Ok(-7)
        }
        fn get_uint_value(&self) -> Result<u32, BridgeError> {
            Ok(7)
        }
        fn get_double_value(&self) -> Result<f64, BridgeError> {
            Ok(7.5)
        }
        fn get_string_value(&self) -> Result<String, BridgeError> {
            Ok("flags".to_string())
        }
        fn get_date_value(&self) -> Result<i64, BridgeError> {
            Err(internal_error!("date accessor unavailable"))
        }
        fn get_keys(&self) -> Result<Vec<String>, BridgeError> {
            Ok(Vec::new())
        }
        fn get_value(&self, _key: &str) -> Result<Self, BridgeError> {
            Ok(Flags::default())
        }
    }

    #[test]
    fn test_rejection_wins_over_everything() {
        let all = [
            "promise", "function", "array", "arraybuffer", "null", "undefined", "object", "bool", "int", "uint", "double", "string", "date",
        ];
        assert_eq!(classify(&Flags::with(&all)), NativeKind::Unsupported);
        for kind in ["promise", "function", "array", "arraybuffer"] {
            assert_eq!(classify(&Flags::with(&[kind, "object"])), NativeKind::Unsupported, "{kind}");
        }
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(classify(&Flags::with(&["null", "object"])), NativeKind::Null);
        assert_eq!(classify(&Flags::with(&["undefined"])), NativeKind::Null);
        assert_eq!(classify(&Flags::with(&["object", "bool", "string"])), NativeKind::Object);
        assert_eq!(classify(&Flags::with(&["bool", "int"])), NativeKind::Bool);
        assert_eq!(classify(&Flags::with(&["int", "uint", "double"])), NativeKind::Int);
        assert_eq!(classify(&Flags::with(&["uint", "double"])), NativeKind::UInt);
        assert_eq!(classify(&Flags::with(&["double", "string"])), NativeKind::Double);
        assert_eq!(classify(&Flags::with(&["string", "date"])), NativeKind::String);
        assert_eq!(classify(&Flags::with(&["date"])), NativeKind::Date);
        assert_eq!(classify(&Flags::with(&[])), NativeKind::Unknown);
    }

    #[test]
    fn test_unknown_kind_becomes_null() {
        assert_eq!(convert(&Flags::default()).unwrap(), Value::Null);
    }

    #[test]
    fn test_accessor_failure_propagates() {
        let err = convert(&Flags::with(&["date"])).unwrap_err();
        assert!(matches!(err, BridgeError::Internal { .. }));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_overlapping_number_uses_first_accessor() {
        assert_eq!(convert(&Flags::with(&["int", "uint", "double"])).unwrap(), Value::Int(-7));
        assert_eq!(convert(&Flags::with(&["uint", "double"])).unwrap(), Value::UInt(7));
        assert_eq!(convert(&Flags::with(&["double"])).unwrap(), Value::Double(7.5));
    }
}
