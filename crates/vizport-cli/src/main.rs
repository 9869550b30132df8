//! Vizport CLI application
//!
//! Drives the visualization application through its script port: send single
//! commands to a running instance, query views and snapshots, or launch the
//! application and feed it a command script.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/vizport-cli
//! ```

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;
use args::Cli;
use console::CliConsole;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = router::route(cli).await {
        CliConsole::new(true).error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
