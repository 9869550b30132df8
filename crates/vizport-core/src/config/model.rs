//! Configuration model

use super::logging_config::LoggingConfig;
use super::timeouts;
use crate::connector::ConnectOptions;
use crate::error::{ScriptError, ScriptResult};
use crate::process::{BackoffConfig, LaunchSpec, ReadinessPolicy};
use crate::protocol::DEFAULT_MAX_FRAME_BYTES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VizportConfig {
    /// How to launch the application
    pub app: AppConfig,
    /// Connection and process timeouts
    pub timeouts: TimeoutConfig,
    /// Readiness gate between launch and first connection
    pub readiness: ReadinessConfig,
    /// Wire protocol limits
    pub protocol: ProtocolConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Application launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the application executable
    pub executable: Option<PathBuf>,
    /// Script port the application listens on
    pub port: u16,
    /// HTML entry page handed to the application
    pub html: Option<PathBuf>,
    /// Asset loaded at startup (an image file)
    pub image: Option<PathBuf>,
    /// Extra arguments appended after the standard ones
    pub extra_args: Vec<String>,
    /// Working directory for the application
    pub working_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            executable: None,
            port: timeouts::connection::DEFAULT_PORT,
            html: None,
            image: None,
            extra_args: Vec::new(),
            working_dir: None,
        }
    }
}

/// Timeout settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound on establishing the TCP connection, in milliseconds
    pub connect_ms: u64,
    /// Bound on waiting for a response, in seconds
    pub request_secs: u64,
    /// Bound on reaping a killed process, in seconds
    pub terminate_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: timeouts::connection::CONNECT_MS,
            request_secs: timeouts::connection::REQUEST_SECS,
            terminate_secs: timeouts::process::TERMINATE_SECS,
        }
    }
}

impl TimeoutConfig {
    /// Connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    /// Request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    /// Terminate wait as Duration
    pub fn terminate_timeout(&self) -> Duration {
        Duration::from_secs(self.terminate_secs)
    }
}

/// Readiness strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessMode {
    /// Probe the port with backoff until it accepts
    #[default]
    Poll,
    /// Sleep a fixed delay, then connect once
    Fixed,
}

/// Readiness gate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Strategy
    pub mode: ReadinessMode,
    /// Delay used by the fixed strategy, in milliseconds
    pub fixed_delay_ms: u64,
    /// First probe delay, in milliseconds
    pub initial_delay_ms: u64,
    /// Longest probe delay, in milliseconds
    pub max_delay_ms: u64,
    /// Growth factor between probe delays
    pub multiplier: f64,
    /// Add jitter to probe delays
    pub jitter: bool,
    /// Give up polling after this many seconds
    pub deadline_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            mode: ReadinessMode::Poll,
            fixed_delay_ms: timeouts::process::FIXED_READY_DELAY_MS,
            initial_delay_ms: timeouts::process::READY_INITIAL_DELAY_MS,
            max_delay_ms: timeouts::process::READY_MAX_DELAY_MS,
            multiplier: 2.0,
            jitter: false,
            deadline_secs: timeouts::process::READY_DEADLINE_SECS,
        }
    }
}

impl ReadinessConfig {
    /// Build the readiness policy described by this section
    pub fn policy(&self) -> ReadinessPolicy {
        match self.mode {
            ReadinessMode::Fixed => {
                ReadinessPolicy::FixedDelay(Duration::from_millis(self.fixed_delay_ms))
            }
            ReadinessMode::Poll => ReadinessPolicy::Poll {
                backoff: BackoffConfig::with_initial_delay(Duration::from_millis(
                    self.initial_delay_ms,
                ))
                .max_delay(Duration::from_millis(self.max_delay_ms))
                .multiplier(self.multiplier)
                .jitter(self.jitter),
                deadline: Duration::from_secs(self.deadline_secs),
            },
        }
    }
}

/// Wire protocol limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Largest frame payload accepted in either direction
    pub max_frame_bytes: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl VizportConfig {
    /// Check the configuration for values that can never work
    pub fn validate(&self) -> ScriptResult<()> {
        if self.app.port == 0 {
            return Err(ScriptError::config("app.port must be between 1 and 65535"));
        }
        if self.timeouts.connect_ms == 0 {
            return Err(ScriptError::config("timeouts.connect_ms must be greater than 0"));
        }
        if self.timeouts.request_secs == 0 {
            return Err(ScriptError::config("timeouts.request_secs must be greater than 0"));
        }
        if self.timeouts.terminate_secs == 0 {
            return Err(ScriptError::config("timeouts.terminate_secs must be greater than 0"));
        }
        if self.readiness.multiplier < 1.0 || !self.readiness.multiplier.is_finite() {
            return Err(ScriptError::config(format!(
                "readiness.multiplier must be a finite value >= 1.0, got {}",
                self.readiness.multiplier
            )));
        }
        if self.readiness.mode == ReadinessMode::Poll && self.readiness.deadline_secs == 0 {
            return Err(ScriptError::config(
                "readiness.deadline_secs must be greater than 0 when polling",
            ));
        }
        if self.readiness.initial_delay_ms > self.readiness.max_delay_ms {
            return Err(ScriptError::config(format!(
                "readiness.initial_delay_ms ({}) exceeds readiness.max_delay_ms ({})",
                self.readiness.initial_delay_ms, self.readiness.max_delay_ms
            )));
        }
        if self.protocol.max_frame_bytes == 0 {
            return Err(ScriptError::config("protocol.max_frame_bytes must be greater than 0"));
        }
        if !self.logging.has_known_format() {
            return Err(ScriptError::config(format!(
                "logging.format '{}' is not one of {:?}",
                self.logging.format,
                super::logging_config::LOG_FORMATS
            )));
        }
        Ok(())
    }

    /// Connection options derived from this configuration
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions::from_config(&self.timeouts, &self.protocol)
    }

    /// Launch specification derived from the `app` section
    ///
    /// The executable, html page and startup image are all required.
    pub fn launch_spec(&self) -> ScriptResult<LaunchSpec> {
        let executable = self
            .app
            .executable
            .clone()
            .ok_or_else(|| ScriptError::config("app.executable is not set"))?;
        let html = self
            .app
            .html
            .clone()
            .ok_or_else(|| ScriptError::config("app.html is not set"))?;
        let image = self
            .app
            .image
            .clone()
            .ok_or_else(|| ScriptError::config("app.image is not set"))?;

        let mut spec = LaunchSpec::new(executable, self.app.port, html, image)
            .extra_args(self.app.extra_args.iter().cloned());
        if let Some(dir) = &self.app.working_dir {
            spec = spec.working_dir(dir.clone());
        }
        Ok(spec)
    }
}
