//! Configuration loading
//!
//! Sources are applied in the order they are added; later sources win.

use super::model::{ReadinessMode, VizportConfig};
use crate::error::{ScriptError, ScriptResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable names
pub mod env_vars {
    /// Application executable
    pub const EXECUTABLE: &str = "VIZPORT_EXECUTABLE";
    /// Script port
    pub const PORT: &str = "VIZPORT_PORT";
    /// HTML entry page
    pub const HTML: &str = "VIZPORT_HTML";
    /// Startup image
    pub const IMAGE: &str = "VIZPORT_IMAGE";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "VIZPORT_REQUEST_TIMEOUT_SECS";
    /// Readiness mode (`poll` or `fixed`)
    pub const READINESS: &str = "VIZPORT_READINESS";
    /// Log level / filter
    pub const LOG: &str = "VIZPORT_LOG";
}

/// Explicit overrides, typically from command-line flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub executable: Option<PathBuf>,
    pub port: Option<u16>,
    pub html: Option<PathBuf>,
    pub image: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file; a missing file contributes nothing
    File(PathBuf),
    /// Configuration from `VIZPORT_*` environment variables
    Environment,
    /// Explicit overrides
    Overrides(ConfigOverrides),
    /// Default configuration
    Default,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

/// Default configuration file location: `<config dir>/vizport/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vizport").join("config.toml"))
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add explicit overrides
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        self.add_source(ConfigSource::Overrides(overrides))
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Load configuration from all sources and validate it
    pub fn load(self) -> ScriptResult<VizportConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Load using a custom environment lookup
    pub fn load_with_env<F>(self, lookup: F) -> ScriptResult<VizportConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = VizportConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    if let Some(file_config) = load_from_file(path)? {
                        config = file_config;
                    }
                }
                ConfigSource::Environment => {
                    tracing::debug!("Loading config from environment");
                    apply_env(&mut config, &lookup)?;
                }
                ConfigSource::Overrides(overrides) => {
                    tracing::debug!("Applying config overrides");
                    apply_overrides(&mut config, overrides);
                }
                ConfigSource::Default => {
                    tracing::debug!("Loading default config");
                    config = VizportConfig::default();
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse a config file, choosing the format by extension
fn load_from_file(path: &Path) -> ScriptResult<Option<VizportConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ScriptError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let context = |format: &str| {
        format!(
            "Deserializing {} configuration from '{}'",
            format,
            path.display()
        )
    };

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => {
            toml::from_str(&content).map_err(|e| ScriptError::from(e).with_context(context("TOML")))?
        }
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| ScriptError::from(e).with_context(context("YAML")))?,
        _ => serde_json::from_str(&content)
            .map_err(|e| ScriptError::from(e).with_context(context("JSON")))?,
    };

    Ok(Some(config))
}

fn apply_env<F>(config: &mut VizportConfig, lookup: &F) -> ScriptResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(executable) = lookup(env_vars::EXECUTABLE) {
        config.app.executable = Some(PathBuf::from(executable));
    }

    if let Some(port) = lookup(env_vars::PORT) {
        config.app.port = port.trim().parse().map_err(|_| {
            ScriptError::config(format!("Invalid {} value '{}'", env_vars::PORT, port))
        })?;
    }

    if let Some(html) = lookup(env_vars::HTML) {
        config.app.html = Some(PathBuf::from(html));
    }

    if let Some(image) = lookup(env_vars::IMAGE) {
        config.app.image = Some(PathBuf::from(image));
    }

    if let Some(secs) = lookup(env_vars::REQUEST_TIMEOUT_SECS) {
        config.timeouts.request_secs = secs.trim().parse().map_err(|_| {
            ScriptError::config(format!(
                "Invalid {} value '{}'",
                env_vars::REQUEST_TIMEOUT_SECS,
                secs
            ))
        })?;
    }

    if let Some(mode) = lookup(env_vars::READINESS) {
        config.readiness.mode = match mode.trim().to_ascii_lowercase().as_str() {
            "poll" => ReadinessMode::Poll,
            "fixed" => ReadinessMode::Fixed,
            other => {
                return Err(ScriptError::config(format!(
                    "Invalid {} value '{}' (expected poll or fixed)",
                    env_vars::READINESS,
                    other
                )));
            }
        };
    }

    if let Some(level) = lookup(env_vars::LOG) {
        config.logging.level = level;
    }

    Ok(())
}

fn apply_overrides(config: &mut VizportConfig, overrides: &ConfigOverrides) {
    if let Some(executable) = &overrides.executable {
        config.app.executable = Some(executable.clone());
    }
    if let Some(port) = overrides.port {
        config.app.port = port;
    }
    if let Some(html) = &overrides.html {
        config.app.html = Some(html.clone());
    }
    if let Some(image) = &overrides.image {
        config.app.image = Some(image.clone());
    }
    if let Some(secs) = overrides.request_timeout_secs {
        config.timeouts.request_secs = secs;
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }
}
