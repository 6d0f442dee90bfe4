use crate::core::Value;
use crate::error::BridgeError;
use serde::{Deserialize, Serialize};

/// A script's request to run a host method, after argument conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationRequest {
    pub method_name: String,
    pub arguments: Vec<Value>,
}

impl InvocationRequest {
    pub fn new(method_name: impl Into<String>, arguments: Vec<Value>) -> Self {
        InvocationRequest {
            method_name: method_name.into(),
            arguments,
        }
    }

    pub fn into_message(self) -> InvocationMessage {
        InvocationMessage {
            method_name: self.method_name,
            arguments: self.arguments,
        }
    }
}

/// Wire unit handed to the transport. Owned by the sender once sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationMessage {
    pub method_name: String,
    pub arguments: Vec<Value>,
}

impl InvocationMessage {
    pub fn to_json(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<InvocationRequest> for InvocationMessage {
    fn from(request: InvocationRequest) -> Self {
        request.into_message()
    }
}
