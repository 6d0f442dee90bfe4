#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("{message}")]
    UnsupportedValueKind { message: String },

    #[error("{message}")]
    ArgumentType { message: String },

    /// The location fields are for logs; scripts only see `message`.
    #[error("{message}")]
    Internal {
        message: String,
        file: String,
        line: usize,
        method: String,
    },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("std::io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// True for the conditions a script can trigger on purpose (bad argument
    /// shapes); everything else is reported as an internal error.
    pub fn is_user_error(&self) -> bool {
        matches!(self, BridgeError::UnsupportedValueKind { .. } | BridgeError::ArgumentType { .. })
    }

    /// Text handed back to the calling script frame as its exception.
    pub fn exception_text(&self, entry_point: &str) -> String {
        if self.is_user_error() {
            return self.to_string();
        }
        let mut details = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            // `#[from]` variants already print their cause
            let text = cause.to_string();
            if !details.ends_with(&text) {
                details.push_str(": ");
                details.push_str(&text);
            }
            source = cause.source();
        }
        format!("An internal error occurred while executing {entry_point}! {details}")
    }
}

// Every rejection of a promise, function, array, or array buffer carries
// the same message, whatever the nesting depth.
pub const UNSUPPORTED_VALUE_KIND_MESSAGE: &str = "Value cannot be a promise, function, an array or an array buffer!";

pub const NAME_ARGUMENT_MESSAGE: &str = "Name argument must be typeof string!";

#[macro_export]
macro_rules! unsupported_value_kind {
    () => {
        $crate::BridgeError::UnsupportedValueKind {
            message: $crate::error::UNSUPPORTED_VALUE_KIND_MESSAGE.to_string(),
        }
    };
    ($msg:expr) => {
        $crate::BridgeError::UnsupportedValueKind { message: $msg.to_string() }
    };
}

// Macro that constructs an Internal error using the compile-time caller
// location and the provided message. Using a macro (rather than a
// function) ensures `file!()` and `line!()` expand to the site where the
// macro is invoked.
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::BridgeError::Internal {
            message: $msg.to_string(),
            file: file!().to_string(),
            line: line!() as usize,
            method: $crate::function_name!().to_string(),
        }
    };
}

#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        // remove the trailing "::f"
        &name[..name.len() - 3]
    }};
}
