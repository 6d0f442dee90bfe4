//! Handler behind the script-visible entry point.
//!
//! A call looks like `ExecuteJsMethod("methodName", arg1, arg2, ...)`. The
//! first argument names the host method; the rest are converted to portable
//! values and forwarded as one [`InvocationMessage`].

use crate::config::BridgeConfig;
use crate::core::NativeValue;
use crate::error::{BridgeError, NAME_ARGUMENT_MESSAGE};
use crate::internal_error;
use crate::js_convert::convert_all;
use crate::js_message::{InvocationMessage, InvocationRequest};
use crate::js_transport::MessageSender;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// What the handler did with a call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome {
    /// Not addressed to this handler; the engine should try other handlers.
    NotHandled,
    /// Handled; `Err` carries the exception text for the calling script.
    Handled(Result<(), String>),
}

impl CallOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, CallOutcome::Handled(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Handled(Ok(())))
    }

    pub fn exception(&self) -> Option<&str> {
        match self {
            CallOutcome::Handled(Err(text)) => Some(text),
            _ => None,
        }
    }
}

pub struct MethodHandler<S: MessageSender> {
    config: BridgeConfig,
    sender: S,
}

impl<S: MessageSender> MethodHandler<S> {
    pub fn new(sender: S) -> Self {
        Self::with_config(BridgeConfig::default(), sender)
    }

    pub fn with_config(config: BridgeConfig, sender: S) -> Self {
        MethodHandler { config, sender }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn entry_point(&self) -> &str {
        &self.config.entry_point
    }

    /// Handle a call made from script.
    ///
    /// Runs synchronously on the calling thread. At most one message is sent
    /// per call, and only after every argument converted. Failures, including
    /// panics raised by the accessor or the sender, come back as exception
    /// text rather than unwinding into the engine.
    pub fn handle_call<V: NativeValue>(&self, name: &str, arguments: &[V]) -> CallOutcome {
        if name != self.config.entry_point || arguments.is_empty() {
            return CallOutcome::NotHandled;
        }

        let result = if self.config.catch_panics {
            catch_unwind(AssertUnwindSafe(|| self.dispatch(arguments))).unwrap_or_else(|payload| {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                Err(internal_error!(format!("panic: {msg}")))
            })
        } else {
            self.dispatch(arguments)
        };

        match result {
            Ok(()) => CallOutcome::Handled(Ok(())),
            Err(err) => {
                match &err {
                    _ if err.is_user_error() => log::warn!("{}: call rejected: {err}", self.config.entry_point),
                    BridgeError::Internal { file, line, method, .. } => {
                        log::error!("{}: internal error at {method} {file}:{line}: {err}", self.config.entry_point)
                    }
                    _ => log::error!("{}: internal error: {err}", self.config.entry_point),
                }
                CallOutcome::Handled(Err(err.exception_text(&self.config.entry_point)))
            }
        }
    }

    fn dispatch<V: NativeValue>(&self, arguments: &[V]) -> Result<(), BridgeError> {
        let (name_argument, rest) = arguments
            .split_first()
            .ok_or_else(|| internal_error!("missing method name argument"))?;
        if !name_argument.is_string() {
            return Err(BridgeError::ArgumentType {
                message: NAME_ARGUMENT_MESSAGE.to_string(),
            });
        }
        let method_name = name_argument.get_string_value()?;
        let request = InvocationRequest::new(method_name, convert_all(rest)?);
        let message: InvocationMessage = request.into_message();
        log::debug!("dispatching '{}' with {} argument(s)", message.method_name, message.arguments.len());
        self.sender.send(message)
    }
}
