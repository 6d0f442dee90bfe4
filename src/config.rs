//! Bridge configuration.

use crate::error::BridgeError;
use crate::internal_error;
use serde::{Deserialize, Serialize};

/// Name scripts call to reach the bridge.
pub const DEFAULT_ENTRY_POINT: &str = "ExecuteJsMethod";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Registered entry-point name; calls under any other name are not handled.
    pub entry_point: String,
    /// Report panics raised while converting or sending as internal errors
    /// instead of letting them propagate.
    pub catch_panics: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            catch_panics: true,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, BridgeError> {
        let config: BridgeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, BridgeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.entry_point.trim().is_empty() {
            return Err(internal_error!("Entry point name cannot be empty"));
        }
        Ok(())
    }
}
