//! Owned, in-memory stand-in for engine values.
//!
//! `ScriptValue` answers the [`NativeValue`] predicates the way the engine
//! does, so hosts without a live engine (tests, benches, the CLI) can run
//! values through the same converter.

use crate::core::NativeValue;
use crate::error::BridgeError;
use crate::internal_error;
use crate::js_date::utc_to_base_time;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptValue {
    Undefined,
    Null,
    Bool(bool),
    Int(i32),
    UInt(u32),
    Double(f64),
    String(String),
    /// Engine base-time ticks (microseconds since 1601-01-01T00:00:00Z).
    Date { ticks: i64 },
    Object(IndexMap<String, ScriptValue>),
    Array(Vec<ScriptValue>),
    Function { name: String },
    Promise,
    ArrayBuffer(Vec<u8>),
    Symbol(String),
}

impl ScriptValue {
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ScriptValue)>,
    {
        ScriptValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn string(s: impl Into<String>) -> Self {
        ScriptValue::String(s.into())
    }

    pub fn date(dt: &DateTime<Utc>) -> Self {
        ScriptValue::Date {
            ticks: utc_to_base_time(dt),
        }
    }

    /// Numeric view, as the engine stores every number.
    fn number(&self) -> Option<f64> {
        match self {
            ScriptValue::Int(i) => Some(*i as f64),
            ScriptValue::UInt(u) => Some(*u as f64),
            ScriptValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Integral number in `lo..=hi`. Negative zero is never integral to the
    /// engine, so it stays a double.
    fn integral_in(&self, lo: f64, hi: f64) -> bool {
        self.number()
            .is_some_and(|n| n.fract() == 0.0 && n >= lo && n <= hi && !(n == 0.0 && n.is_sign_negative()))
    }

    fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Undefined => "undefined",
            ScriptValue::Null => "null",
            ScriptValue::Bool(_) => "bool",
            ScriptValue::Int(_) | ScriptValue::UInt(_) | ScriptValue::Double(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::Date { .. } => "date",
            ScriptValue::Object(_) => "object",
            ScriptValue::Array(_) => "array",
            ScriptValue::Function { .. } => "function",
            ScriptValue::Promise => "promise",
            ScriptValue::ArrayBuffer(_) => "arraybuffer",
            ScriptValue::Symbol(_) => "symbol",
        }
    }

    fn mismatch(&self, expected: &str) -> BridgeError {
        internal_error!(format!("Expected {expected} value, found {}", self.type_name()))
    }

    /// Parse a JSON document into a script value.
    ///
    /// Plain JSON maps directly (integers pick the narrowest engine number
    /// kind, arrays stay arrays). Single-key objects with a `$` key stand for
    /// values JSON cannot spell: `{"$date": ticks}`, `{"$function": name}`,
    /// `{"$promise": true}`, `{"$arrayBuffer": [bytes]}`,
    /// `{"$undefined": true}` and `{"$symbol": description}`.
    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(json)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Self, BridgeError> {
        match json {
            serde_json::Value::Null => Ok(ScriptValue::Null),
            serde_json::Value::Bool(b) => Ok(ScriptValue::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if let Ok(i) = i32::try_from(i) {
                        return Ok(ScriptValue::Int(i));
                    }
                    if let Ok(u) = u32::try_from(i) {
                        return Ok(ScriptValue::UInt(u));
                    }
                }
                match n.as_f64() {
                    Some(f) => Ok(ScriptValue::Double(f)),
                    None => Err(internal_error!(format!("Number {n} is not representable"))),
                }
            }
            serde_json::Value::String(s) => Ok(ScriptValue::String(s)),
            serde_json::Value::Array(items) => {
                let items = items.into_iter().map(Self::from_json_value).collect::<Result<Vec<_>, _>>()?;
                Ok(ScriptValue::Array(items))
            }
            serde_json::Value::Object(map) => {
                if map.len() == 1
                    && let Some((key, value)) = map.iter().next()
                    && key.starts_with('$')
                {
                    return Self::from_json_special(key, value);
                }
                let mut obj = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    obj.insert(key, Self::from_json_value(value)?);
                }
                Ok(ScriptValue::Object(obj))
            }
        }
    }

    fn from_json_special(key: &str, value: &serde_json::Value) -> Result<Self, BridgeError> {
        match key {
            "$date" => match value {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .map(|ticks| ScriptValue::Date { ticks })
                    .ok_or_else(|| internal_error!("$date expects integer ticks")),
                serde_json::Value::String(s) => {
                    let dt = DateTime::parse_from_rfc3339(s).map_err(|e| internal_error!(format!("$date: {e}")))?;
                    Ok(ScriptValue::date(&dt.with_timezone(&Utc)))
                }
                _ => Err(internal_error!("$date expects ticks or an RFC 3339 string")),
            },
            "$function" => {
                let name = value.as_str().ok_or_else(|| internal_error!("$function expects a name string"))?;
                Ok(ScriptValue::Function { name: name.to_string() })
            }
            "$promise" => Ok(ScriptValue::Promise),
            "$undefined" => Ok(ScriptValue::Undefined),
            "$symbol" => {
                let description = value.as_str().ok_or_else(|| internal_error!("$symbol expects a description string"))?;
                Ok(ScriptValue::Symbol(description.to_string()))
            }
            "$arrayBuffer" => {
                let bytes = match value {
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                        .collect::<Option<Vec<u8>>>()
                        .ok_or_else(|| internal_error!("$arrayBuffer expects a list of bytes"))?,
                    _ => return Err(internal_error!("$arrayBuffer expects a list of bytes")),
                };
                Ok(ScriptValue::ArrayBuffer(bytes))
            }
            // Not a marker after all: an ordinary one-property object.
            _ => {
                let mut obj = IndexMap::with_capacity(1);
                obj.insert(key.to_string(), Self::from_json_value(value.clone())?);
                Ok(ScriptValue::Object(obj))
            }
        }
    }
}

impl NativeValue for ScriptValue {
    fn is_undefined(&self) -> bool {
        matches!(self, ScriptValue::Undefined)
    }

    fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }

    fn is_bool(&self) -> bool {
        matches!(self, ScriptValue::Bool(_))
    }

    fn is_int(&self) -> bool {
        self.integral_in(i32::MIN as f64, i32::MAX as f64)
    }

    fn is_uint(&self) -> bool {
        self.integral_in(0.0, u32::MAX as f64)
    }

    fn is_double(&self) -> bool {
        self.number().is_some()
    }

    fn is_date(&self) -> bool {
        matches!(self, ScriptValue::Date { .. })
    }

    fn is_string(&self) -> bool {
        matches!(self, ScriptValue::String(_))
    }

    // Arrays, functions, promises and buffers are objects to the engine too.
    fn is_object(&self) -> bool {
        matches!(
            self,
            ScriptValue::Object(_)
                | ScriptValue::Array(_)
                | ScriptValue::Function { .. }
                | ScriptValue::Promise
                | ScriptValue::ArrayBuffer(_)
        )
    }

    fn is_array(&self) -> bool {
        matches!(self, ScriptValue::Array(_))
    }

    fn is_array_buffer(&self) -> bool {
        matches!(self, ScriptValue::ArrayBuffer(_))
    }

    fn is_function(&self) -> bool {
        matches!(self, ScriptValue::Function { .. })
    }

    fn is_promise(&self) -> bool {
        matches!(self, ScriptValue::Promise)
    }

    fn get_bool_value(&self) -> Result<bool, BridgeError> {
        match self {
            ScriptValue::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("bool")),
        }
    }

    fn get_int_value(&self) -> Result<i32, BridgeError> {
        if !self.is_int() {
            return Err(self.mismatch("int"));
        }
        self.number().map(|n| n as i32).ok_or_else(|| self.mismatch("int"))
    }

    fn get_uint_value(&self) -> Result<u32, BridgeError> {
        if !self.is_uint() {
            return Err(self.mismatch("uint"));
        }
        self.number().map(|n| n as u32).ok_or_else(|| self.mismatch("uint"))
    }

    fn get_double_value(&self) -> Result<f64, BridgeError> {
        self.number().ok_or_else(|| self.mismatch("double"))
    }

    fn get_string_value(&self) -> Result<String, BridgeError> {
        match self {
            ScriptValue::String(s) => Ok(s.clone()),
            _ => Err(self.mismatch("string")),
        }
    }

    fn get_date_value(&self) -> Result<i64, BridgeError> {
        match self {
            ScriptValue::Date { ticks } => Ok(*ticks),
            _ => Err(self.mismatch("date")),
        }
    }

    fn get_keys(&self) -> Result<Vec<String>, BridgeError> {
        match self {
            ScriptValue::Object(map) => Ok(map.keys().cloned().collect()),
            ScriptValue::Array(items) => Ok((0..items.len()).map(|i| i.to_string()).collect()),
            _ if self.is_object() => Ok(Vec::new()),
            _ => Err(self.mismatch("object")),
        }
    }

    fn get_value(&self, key: &str) -> Result<Self, BridgeError> {
        match self {
            ScriptValue::Object(map) => Ok(map.get(key).cloned().unwrap_or(ScriptValue::Undefined)),
            ScriptValue::Array(items) => Ok(key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or(ScriptValue::Undefined)),
            _ if self.is_object() => Ok(ScriptValue::Undefined),
            _ => Err(self.mismatch("object")),
        }
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<i32> for ScriptValue {
    fn from(i: i32) -> Self {
        ScriptValue::Int(i)
    }
}

impl From<u32> for ScriptValue {
    fn from(u: u32) -> Self {
        ScriptValue::UInt(u)
    }
}

impl From<f64> for ScriptValue {
    fn from(f: f64) -> Self {
        ScriptValue::Double(f)
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::String(s.to_string())
    }
}
