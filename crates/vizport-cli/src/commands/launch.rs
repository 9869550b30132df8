//! `vizport launch`: start the application and drive it from a script

use super::exec::run_script;
use crate::console::CliConsole;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::BufReader;
use tracing::warn;
use vizport_sdk::{Session, VizportConfig};

/// Launch, wait for readiness, run the commands, terminate
///
/// The application is terminated even when a command fails.
pub async fn launch(config: &VizportConfig, script: Option<&Path>, verbose: bool) -> Result<()> {
    let console = CliConsole::new(verbose);

    let mut session = Session::launch(config)
        .await
        .context("failed to start the application")?;
    if let Some(process) = session.process() {
        console.info(&format!(
            "Application running (pid {:?}, port {})",
            process.pid(),
            process.port()
        ));
    }

    let result = match script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("cannot open script {}", path.display()));
            match file {
                Ok(file) => run_script(&mut session, BufReader::new(file), &console).await,
                Err(e) => Err(e),
            }
        }
        None => run_script(&mut session, BufReader::new(tokio::io::stdin()), &console).await,
    };

    if let Err(e) = session.terminate().await {
        warn!(error = %e, "failed to terminate the application");
    }

    let executed = result?;
    console.info(&format!("{} command(s) executed", executed));
    Ok(())
}
