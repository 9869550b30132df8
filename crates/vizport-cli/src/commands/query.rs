//! Read-only queries and layout changes against a running application

use crate::args::LayoutAction;
use crate::console::CliConsole;
use anyhow::Result;
use colored::*;
use vizport_sdk::{ViewKind, VizportConfig};

/// `vizport colormaps`
pub async fn colormaps(config: &VizportConfig) -> Result<()> {
    let mut session = super::connect(config).await?;
    let names = session.colormaps().await?;
    CliConsole::new(false).print_fields(&names);
    session.terminate().await?;
    Ok(())
}

/// `vizport views [--kind]`
pub async fn views(config: &VizportConfig, kind: Option<&str>, verbose: bool) -> Result<()> {
    let kinds = match kind {
        Some(kind) => vec![kind.parse::<ViewKind>()?],
        None => ViewKind::ALL.to_vec(),
    };

    let console = CliConsole::new(verbose);
    let mut session = super::connect(config).await?;
    for kind in kinds {
        let views = session.views(kind).await?;
        console.info(&format!("{} {} view(s)", views.len(), kind));
        for view in views {
            println!("{}\t{}", kind.to_string().cyan(), view.id());
        }
    }
    session.terminate().await?;
    Ok(())
}

/// `vizport snapshots --session-id`
pub async fn snapshots(config: &VizportConfig, session_id: &str, json: bool) -> Result<()> {
    let mut session = super::connect(config).await?;
    let snapshots = session.snapshots(session_id).await?;
    session.terminate().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }
    for snapshot in &snapshots {
        let mut parts = Vec::new();
        if snapshot.layout {
            parts.push("layout");
        }
        if snapshot.preferences {
            parts.push("preferences");
        }
        if snapshot.data {
            parts.push("data");
        }
        println!(
            "{}\t{}\t{}\t{}",
            snapshot.name.bold(),
            parts.join(","),
            snapshot.date_created.dimmed(),
            snapshot.description
        );
    }
    Ok(())
}

/// `vizport layout ...`
pub async fn layout(config: &VizportConfig, action: LayoutAction) -> Result<()> {
    let mut session = super::connect(config).await?;
    match action {
        LayoutAction::Analysis => session.set_analysis_layout().await?,
        LayoutAction::Image => session.set_image_layout().await?,
        LayoutAction::Custom { rows, cols } => session.set_custom_layout(rows, cols).await?,
    }
    session.terminate().await?;
    CliConsole::new(true).success("Layout updated");
    Ok(())
}
