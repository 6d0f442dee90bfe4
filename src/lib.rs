pub mod config;
pub mod core;
pub mod error;
pub mod js_convert;
pub mod js_date;
pub mod js_message;
pub mod js_method;
pub mod js_script;
pub mod js_transport;

pub use config::{BridgeConfig, DEFAULT_ENTRY_POINT};
pub use crate::core::{JsObject, NativeValue, ObjectEntry, Value, ValueType};
pub use error::BridgeError;
pub use js_convert::{NativeKind, classify, convert, convert_all};
pub use js_message::{InvocationMessage, InvocationRequest};
pub use js_method::{CallOutcome, MethodHandler};
pub use js_script::ScriptValue;
pub use js_transport::{ChannelSender, MessageSender, channel};
