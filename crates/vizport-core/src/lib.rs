//! Vizport Core Library
//!
//! Remote control of a visualization application over its script port. This
//! crate holds the two pieces everything else is built on:
//!
//! - the [`connector`]: encodes a command name plus named arguments into a
//!   tagged, length-prefixed frame, sends it, and decodes the reply into an
//!   ordered list of strings, one command at a time
//! - the [`process`] supervisor: launches the application with the agreed
//!   script port, waits for the port to accept connections, and kills the
//!   process when asked
//!
//! ## Example
//!
//! ```rust,ignore
//! use vizport_core::{Command, ConnectOptions, LaunchSpec, ReadinessPolicy, Supervisor, await_ready};
//!
//! let spec = LaunchSpec::new("/opt/viewer/bin/viewer", 9999, "/opt/viewer/index.html", "m42.fits");
//! let mut process = Supervisor::default().launch(&spec)?;
//! let mut conn = await_ready(&mut process, &ReadinessPolicy::default(), &ConnectOptions::default()).await?;
//!
//! let colormaps = conn.execute(&Command::new("getColormaps")).await?;
//! conn.execute(&Command::new("setCustomLayout").arg("nrows", 2).arg("ncols", 3)).await?;
//!
//! conn.close().await?;
//! process.terminate().await?;
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod process;
pub mod protocol;
pub mod stub;
pub mod transport;

pub use config::{ConfigLoader, ConfigOverrides, VizportConfig};
pub use connector::{ConnectOptions, ConnectionState, Connector};
pub use error::{ScriptError, ScriptResult, UnifiedError};
pub use process::{
    BackoffConfig, LaunchSpec, ProcessHandle, ProcessState, ReadinessPolicy, Supervisor,
    await_ready,
};
pub use protocol::{ArgValue, Command, Frame, FrameTag};
pub use transport::{StreamTransport, TcpTransport, Transport};
