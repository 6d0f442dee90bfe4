mod native;
mod value;

pub use native::NativeValue;
pub use value::{JsObject, ObjectEntry, Value, ValueType};
