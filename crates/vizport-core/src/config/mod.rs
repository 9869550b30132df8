//! Configuration management for Vizport

mod loader;
mod logging_config;
mod model;
pub mod timeouts;

pub use loader::{ConfigLoader, ConfigOverrides, ConfigSource, default_config_path};
pub use logging_config::LoggingConfig;
pub use model::{
    AppConfig, ProtocolConfig, ReadinessConfig, ReadinessMode, TimeoutConfig, VizportConfig,
};
