//! UnifiedError trait implementation for ScriptError

use super::types::{ScriptError, UnifiedError};

impl UnifiedError for ScriptError {
    fn error_code(&self) -> &str {
        match self {
            Self::Connection { .. } => "SCRIPT_CONNECTION",
            Self::Protocol { .. } => "SCRIPT_PROTOCOL",
            Self::Timeout { .. } => "SCRIPT_TIMEOUT",
            Self::Encoding { .. } => "SCRIPT_ENCODING",
            Self::Process { .. } => "SCRIPT_PROCESS",
            Self::Config { .. } => "SCRIPT_CONFIG",
            Self::Io { .. } => "SCRIPT_IO",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Connection { message, .. } => message,
            Self::Protocol { message, .. } => message,
            Self::Timeout { operation, .. } => operation,
            Self::Encoding { message, .. } => message,
            Self::Process { message, .. } => message,
            Self::Config { message, .. } => message,
            Self::Io { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Connection { context, .. } => context.as_deref(),
            Self::Protocol { context, .. } => context.as_deref(),
            Self::Timeout { context, .. } => context.as_deref(),
            Self::Encoding { context, .. } => context.as_deref(),
            Self::Process { context, .. } => context.as_deref(),
            Self::Config { context, .. } => context.as_deref(),
            Self::Io { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}
