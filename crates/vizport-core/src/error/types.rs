//! Core error types and traits for Vizport

use std::time::Duration;
use thiserror::Error;

/// Result type alias for Vizport operations
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Unified error trait that all Vizport errors implement.
///
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
/// - is_retryable(): Whether a caller may reasonably try again
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Errors raised by the script-port protocol and the process supervisor
///
/// Transport and framing failures are always surfaced to the caller; nothing
/// in this crate retries on its own except the readiness gate, which retries
/// `Connection` failures until its deadline.
#[derive(Error, Debug, Clone)]
pub enum ScriptError {
    /// The channel could not be established, or is no longer usable
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        port: Option<u16>,
        context: Option<String>,
    },

    /// Malformed frame, or the channel closed mid-exchange
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        context: Option<String>,
    },

    /// No response (or connection) within the caller's bound
    #[error("Timed out after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
        context: Option<String>,
    },

    /// A command or argument could not be safely serialized
    #[error("Encoding error: {message}")]
    Encoding {
        message: String,
        argument: Option<String>,
        context: Option<String>,
    },

    /// Spawning or supervising the external application failed
    #[error("Process error: {message}")]
    Process {
        message: String,
        pid: Option<u32>,
        context: Option<String>,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Low-level I/O failure
    #[error("IO error: {message}")]
    Io {
        message: String,
        context: Option<String>,
    },
}
