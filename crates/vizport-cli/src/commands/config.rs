//! Configuration management commands

use crate::console::CliConsole;
use anyhow::{Context, Result, bail};
use colored::*;
use std::path::Path;
use vizport_sdk::VizportConfig;

/// Show the effective configuration as TOML
pub async fn show(config: &VizportConfig, source: Option<&Path>) -> Result<()> {
    let console = CliConsole::new(true);

    console.print_header("Configuration");
    match source {
        Some(path) if path.exists() => {
            console.success(&format!("Loaded configuration from: {}", path.display()))
        }
        Some(path) => {
            console.warn(&format!("Configuration file not found: {}", path.display()));
            console.info("Using default configuration");
        }
        None => console.info("Using default configuration"),
    }

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

/// Validate the effective configuration, including launch settings
pub async fn validate(config: &VizportConfig) -> Result<()> {
    let console = CliConsole::new(true);

    console.print_header("Configuration Validation");
    config.validate()?;
    console.success("Configuration is valid");

    match config.launch_spec() {
        Ok(spec) => console.info(&format!(
            "Launch: {} {}",
            spec.executable().display().to_string().green(),
            spec.display_args().join(" ")
        )),
        Err(e) => console.warn(&format!("Cannot launch: {}", e)),
    }
    console.info(&format!("Script port: {}", config.app.port.to_string().yellow()));
    console.info(&format!("Readiness: {:?}", config.readiness.policy()));
    Ok(())
}

/// Write a default configuration file
pub async fn init(path: &Path, force: bool) -> Result<()> {
    let console = CliConsole::new(true);

    console.print_header("Configuration Initialization");

    if path.exists() && !force {
        console.info("Use --force to overwrite");
        bail!("Configuration file already exists: {}", path.display());
    }

    let rendered = toml::to_string_pretty(&VizportConfig::default())
        .context("Failed to serialize configuration")?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, rendered)
        .await
        .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

    console.success(&format!("Created configuration file: {}", path.display()));
    console.info("Edit app.executable, app.html and app.image before running `vizport launch`");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vizport_sdk::ConfigLoader;

    #[tokio::test]
    async fn test_init_writes_loadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init(&path, false).await.unwrap();
        let loaded = ConfigLoader::new().with_file(&path).load().unwrap();
        assert_eq!(loaded, VizportConfig::default());

        assert!(init(&path, false).await.is_err());
        init(&path, true).await.unwrap();
    }
}
