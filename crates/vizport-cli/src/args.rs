//! CLI argument definitions using clap
//!
//! - vizport exec <command> [name=value...]   # Send one command to a running app
//! - vizport views / colormaps / snapshots     # Query a running app
//! - vizport layout <analysis|image|custom>    # Change the layout
//! - vizport launch [--script <file>]          # Start the app and drive it
//! - vizport config <show|init|validate>       # Configuration files

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vizport")]
#[command(about = "Vizport - remote control for a visualization application's script port")]
#[command(
    long_about = r#"Vizport - remote control for a visualization application's script port

USAGE:
  vizport exec getColormaps                  # Send a command, print the fields
  vizport exec setCustomLayout nrows=2 ncols=3
  vizport views --kind histogram             # List views
  vizport launch --image m42.fits            # Launch, then read commands from stdin
  vizport launch --script session.txt        # Launch and run a command file

CONFIGURATION:
  vizport config init                        # Create config file
  vizport config show                        # Show effective config

For detailed help: vizport --help"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (default: <config dir>/vizport/config.toml)
    #[arg(long, global = true, env = "VIZPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Script port of the application
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Response timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one command to a running application and print the result fields
    #[command(verbatim_doc_comment)]
    Exec {
        /// Command name
        command: String,

        /// Arguments as name=value; true/false and integers are typed
        args: Vec<String>,
    },

    /// List views in the current layout
    Views {
        /// Only this kind (image, colormap, histogram, animator, statistics)
        #[arg(long)]
        kind: Option<String>,
    },

    /// List available colormaps
    Colormaps,

    /// List saved snapshots
    Snapshots {
        /// Session the snapshots were saved under
        #[arg(long)]
        session_id: String,

        /// Print the snapshot records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the layout
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// Launch the application, run commands, then terminate it
    #[command(verbatim_doc_comment)]
    Launch {
        /// Application executable
        #[arg(long)]
        executable: Option<PathBuf>,

        /// HTML entry page
        #[arg(long)]
        html: Option<PathBuf>,

        /// Image to load at startup
        #[arg(long)]
        image: Option<PathBuf>,

        /// File with one command per line (default: stdin)
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum LayoutAction {
    /// Predefined analysis layout
    Analysis,

    /// Predefined single-image layout
    Image,

    /// Grid of rows x cols
    Custom {
        #[arg(long)]
        rows: u32,

        #[arg(long)]
        cols: u32,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,

    /// Validate the configuration
    Validate,

    /// Create a new configuration file with defaults
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exec_args() {
        let cli = Cli::parse_from(["vizport", "--port", "9100", "exec", "setCustomLayout", "nrows=2", "ncols=3"]);
        assert_eq!(cli.port, Some(9100));
        match cli.command {
            Commands::Exec { command, args } => {
                assert_eq!(command, "setCustomLayout");
                assert_eq!(args, vec!["nrows=2", "ncols=3"]);
            }
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_layout_custom() {
        let cli = Cli::parse_from(["vizport", "layout", "custom", "--rows", "2", "--cols", "3"]);
        assert!(matches!(
            cli.command,
            Commands::Layout {
                action: LayoutAction::Custom { rows: 2, cols: 3 }
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vizport", "colormaps", "--verbose", "--port", "9001"]);
        assert!(cli.verbose);
        assert_eq!(cli.port, Some(9001));
    }
}
