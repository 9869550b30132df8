//! From trait implementations for ScriptError conversions

use super::types::ScriptError;
use std::io::ErrorKind;

impl From<std::io::Error> for ScriptError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted => {
                Self::protocol(format!("channel closed mid-exchange: {}", error))
            }
            ErrorKind::ConnectionRefused | ErrorKind::NotConnected => {
                Self::connection(error.to_string())
            }
            _ => Self::io(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for ScriptError {
    fn from(error: serde_json::Error) -> Self {
        Self::config(format!("JSON error: {}", error))
    }
}

impl From<toml::de::Error> for ScriptError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("TOML error: {}", error))
    }
}

impl From<serde_yaml::Error> for ScriptError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config(format!("YAML error: {}", error))
    }
}
