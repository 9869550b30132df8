//! Process supervision for the external application
//!
//! ```text
//! launch() ──> Spawned ──await_ready()──> Ready
//!                 │                          │
//!                 └──────── terminate() ─────┴──> Terminated
//! ```
//!
//! The application sends no "ready" signal. Readiness is inferred by probing
//! the script port until it accepts a connection (or, in the legacy mode, by
//! sleeping a fixed delay). The probe connection that succeeds is the one
//! handed back to the caller.

mod backoff;
mod handle;
mod launch;
mod readiness;

pub use backoff::{BackoffConfig, ExponentialBackoff};
pub use handle::{ProcessHandle, ProcessState};
pub use launch::LaunchSpec;
pub use readiness::{ReadinessPolicy, await_ready};

use crate::error::{ScriptError, ScriptResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, instrument};

/// Spawns the application and hands out process handles
#[derive(Debug, Clone)]
pub struct Supervisor {
    /// Bound on reaping a killed process
    terminate_timeout: Duration,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(crate::config::timeouts::process::terminate_timeout())
    }
}

impl Supervisor {
    /// Create a supervisor with a custom terminate wait
    pub fn new(terminate_timeout: Duration) -> Self {
        Self { terminate_timeout }
    }

    /// Start the application; returns as soon as the process is spawned
    #[instrument(skip(self, spec), fields(executable = %spec.executable().display(), port = spec.port()))]
    pub fn launch(&self, spec: &LaunchSpec) -> ScriptResult<ProcessHandle> {
        let mut cmd = Command::new(spec.executable());
        cmd.args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = spec.current_dir() {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            ScriptError::process(format!(
                "Failed to spawn '{}': {}",
                spec.executable().display(),
                e
            ))
            .with_context(format!("arguments: {:?}", spec.display_args()))
        })?;

        let handle = ProcessHandle::new(child, spec.port(), self.terminate_timeout);
        info!(pid = ?handle.pid(), "application started");
        Ok(handle)
    }
}
