//! SDK error types

use thiserror::Error;
use vizport_core::{ScriptError, UnifiedError};

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors raised by the application layer
#[derive(Error, Debug, Clone)]
pub enum SdkError {
    /// Transport, protocol, process or configuration failure
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// The application answered a command with an error message
    #[error("'{command}' failed: {message}")]
    Remote { command: String, message: String },

    /// A value was rejected before anything was sent
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// A response field could not be decoded into the expected shape
    #[error("Cannot decode response to '{command}': {message}")]
    Decode { command: String, message: String },
}

impl SdkError {
    /// Create a remote error from the fields the application returned
    pub fn remote(command: impl Into<String>, fields: &[String]) -> Self {
        Self::Remote {
            command: command.into(),
            message: fields.join(" "),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            command: command.into(),
            message: message.into(),
        }
    }

    /// The underlying script error, if any
    pub fn as_script(&self) -> Option<&ScriptError> {
        match self {
            Self::Script(e) => Some(e),
            _ => None,
        }
    }
}

impl UnifiedError for SdkError {
    fn error_code(&self) -> &str {
        match self {
            Self::Script(e) => e.error_code(),
            Self::Remote { .. } => "SDK_REMOTE",
            Self::InvalidArgument { .. } => "SDK_INVALID_ARGUMENT",
            Self::Decode { .. } => "SDK_DECODE",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Script(e) => e.message(),
            Self::Remote { message, .. }
            | Self::InvalidArgument { message, .. }
            | Self::Decode { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Script(e) => e.context(),
            Self::Remote { command, .. } | Self::Decode { command, .. } => Some(command),
            Self::InvalidArgument { argument, .. } => Some(argument),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Script(e) => e.is_retryable(),
            _ => false,
        }
    }
}
