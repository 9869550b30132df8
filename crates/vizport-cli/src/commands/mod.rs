//! CLI command implementations

pub mod config;
pub mod exec;
pub mod launch;
pub mod query;

use anyhow::{Context, Result};
use vizport_sdk::{Session, VizportConfig};

/// Attach to the application already listening on the configured port
pub async fn connect(config: &VizportConfig) -> Result<Session> {
    Session::connect(config.app.port, &config.connect_options())
        .await
        .with_context(|| {
            format!(
                "no application is accepting commands on port {}",
                config.app.port
            )
        })
}
