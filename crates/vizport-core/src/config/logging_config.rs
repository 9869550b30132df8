//! Logging configuration

use serde::{Deserialize, Serialize};

/// Recognised output formats
pub const LOG_FORMATS: &[&str] = &["pretty", "compact", "json"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error, or `vizport_core=debug`)
    pub level: String,
    /// Log format (pretty, compact, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Whether `format` is one of [`LOG_FORMATS`]
    pub fn has_known_format(&self) -> bool {
        LOG_FORMATS.contains(&self.format.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.has_known_format());
    }

    #[test]
    fn test_unknown_format() {
        let config = LoggingConfig {
            format: "xml".into(),
            ..Default::default()
        };
        assert!(!config.has_known_format());
    }
}
