use crate::error::BridgeError;

/// Accessor surface over a value owned by the embedded script engine.
///
/// The predicates mirror what the engine exposes and are not mutually
/// exclusive: an array is also an object, an integer is also a double.
/// Callers that classify a value must therefore test them in a fixed order.
pub trait NativeValue {
    fn is_undefined(&self) -> bool;
    fn is_null(&self) -> bool;
    fn is_bool(&self) -> bool;
    fn is_int(&self) -> bool;
    fn is_uint(&self) -> bool;
    fn is_double(&self) -> bool;
    fn is_date(&self) -> bool;
    fn is_string(&self) -> bool;
    fn is_object(&self) -> bool;
    fn is_array(&self) -> bool;
    fn is_array_buffer(&self) -> bool;
    fn is_function(&self) -> bool;
    fn is_promise(&self) -> bool;

    fn get_bool_value(&self) -> Result<bool, BridgeError>;
    fn get_int_value(&self) -> Result<i32, BridgeError>;
    fn get_uint_value(&self) -> Result<u32, BridgeError>;
    fn get_double_value(&self) -> Result<f64, BridgeError>;
    fn get_string_value(&self) -> Result<String, BridgeError>;

    /// Date payload as engine base-time ticks (microseconds since
    /// 1601-01-01T00:00:00Z).
    fn get_date_value(&self) -> Result<i64, BridgeError>;

    /// Own enumerable string keys, in the engine's enumeration order.
    fn get_keys(&self) -> Result<Vec<String>, BridgeError>;

    /// Value stored under `key`. A missing key reads as `undefined` in the
    /// engine, so implementations return their undefined value for it.
    fn get_value(&self, key: &str) -> Result<Self, BridgeError>
    where
        Self: Sized;
}
