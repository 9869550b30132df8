//! Constructor methods for ScriptError

use super::types::ScriptError;
use std::time::Duration;

impl ScriptError {
    /// Create a new connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            port: None,
            context: None,
        }
    }

    /// Create a connection error for a specific port
    pub fn connection_on_port(message: impl Into<String>, port: u16) -> Self {
        Self::Connection {
            message: message.into(),
            port: Some(port),
            context: None,
        }
    }

    /// Create a new protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
            context: None,
        }
    }

    /// Create a new encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
            argument: None,
            context: None,
        }
    }

    /// Create an encoding error naming the offending argument
    pub fn encoding_for_argument(message: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
            argument: Some(argument.into()),
            context: None,
        }
    }

    /// Create a new process error
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
            pid: None,
            context: None,
        }
    }

    /// Create a process error for a known pid
    pub fn process_with_pid(message: impl Into<String>, pid: Option<u32>) -> Self {
        Self::Process {
            message: message.into(),
            pid,
            context: None,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to any error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let ctx = Some(context.into());
        match &mut self {
            Self::Connection { context: c, .. } => *c = ctx,
            Self::Protocol { context: c, .. } => *c = ctx,
            Self::Timeout { context: c, .. } => *c = ctx,
            Self::Encoding { context: c, .. } => *c = ctx,
            Self::Process { context: c, .. } => *c = ctx,
            Self::Config { context: c, .. } => *c = ctx,
            Self::Io { context: c, .. } => *c = ctx,
        }
        self
    }

    /// Whether this error leaves a connection in an unknown state
    ///
    /// After a timeout or a framing failure the peer may still deliver a stale
    /// reply, so the connection must not be reused for another command.
    pub fn taints_connection(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Protocol { .. } | Self::Io { .. })
    }
}
