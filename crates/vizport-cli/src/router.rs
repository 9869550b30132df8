//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::{commands, logging};
use anyhow::Result;
use std::path::PathBuf;
use vizport_core::config::{ConfigLoader, ConfigOverrides, default_config_path};
use vizport_sdk::VizportConfig;

/// Load configuration, install logging, and run the chosen command
pub async fn route(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(default_config_path);

    // `config init` must work even when the existing file is broken.
    if let Commands::Config {
        action: ConfigAction::Init { force },
    } = &cli.command
    {
        let path = config_path
            .ok_or_else(|| anyhow::anyhow!("no configuration directory; pass --config"))?;
        return commands::config::init(&path, *force).await;
    }

    let config = load_config(&cli, config_path.as_ref())?;
    logging::init(&config.logging, cli.verbose);

    match cli.command {
        Commands::Exec { command, args } => commands::exec::exec(&config, &command, &args).await,
        Commands::Views { kind } => {
            commands::query::views(&config, kind.as_deref(), cli.verbose).await
        }
        Commands::Colormaps => commands::query::colormaps(&config).await,
        Commands::Snapshots { session_id, json } => {
            commands::query::snapshots(&config, &session_id, json).await
        }
        Commands::Layout { action } => commands::query::layout(&config, action).await,
        Commands::Launch { script, .. } => {
            commands::launch::launch(&config, script.as_deref(), cli.verbose).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config, config_path.as_deref()).await,
            ConfigAction::Validate => commands::config::validate(&config).await,
            ConfigAction::Init { .. } => Ok(()),
        },
    }
}

/// Defaults, then the file, then `VIZPORT_*`, then flags
fn load_config(cli: &Cli, path: Option<&PathBuf>) -> Result<VizportConfig> {
    let mut overrides = ConfigOverrides {
        port: cli.port,
        request_timeout_secs: cli.timeout,
        ..Default::default()
    };
    if let Commands::Launch {
        executable,
        html,
        image,
        ..
    } = &cli.command
    {
        overrides.executable = executable.clone();
        overrides.html = html.clone();
        overrides.image = image.clone();
    }

    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    Ok(loader.with_env().with_overrides(overrides).load()?)
}
