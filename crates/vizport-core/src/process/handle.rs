//! Handle to a launched application process

use crate::error::{ScriptError, ScriptResult};
use std::fmt;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Lifecycle of a launched process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Spawned, script port not yet known to accept connections
    Spawned,
    /// Script port accepted a connection
    Ready,
    /// Killed, or found to have exited
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawned => write!(f, "SPAWNED"),
            Self::Ready => write!(f, "READY"),
            Self::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// Exclusive owner of the application process
///
/// Dropping the handle kills the process.
pub struct ProcessHandle {
    child: Child,
    pid: Option<u32>,
    port: u16,
    state: ProcessState,
    exit_status: Option<ExitStatus>,
    started_at: Instant,
    terminate_timeout: Duration,
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("port", &self.port)
            .field("state", &self.state)
            .field("exit_status", &self.exit_status)
            .finish()
    }
}

impl ProcessHandle {
    pub(crate) fn new(child: Child, port: u16, terminate_timeout: Duration) -> Self {
        let pid = child.id();
        Self {
            child,
            pid,
            port,
            state: ProcessState::Spawned,
            exit_status: None,
            started_at: Instant::now(),
            terminate_timeout,
        }
    }

    /// Operating-system process id, captured at spawn
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Script port the process was told to listen on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Current lifecycle state
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Exit status, once the process has been reaped
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// Time since spawn
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Record that the script port accepted a connection
    pub fn mark_ready(&mut self) {
        if self.state == ProcessState::Spawned {
            debug!(pid = ?self.pid, after = ?self.uptime(), "application is ready");
            self.state = ProcessState::Ready;
        }
    }

    /// Check, without blocking, whether the process has exited
    pub fn has_exited(&mut self) -> ScriptResult<Option<ExitStatus>> {
        if let Some(status) = self.exit_status {
            return Ok(Some(status));
        }
        let status = self.child.try_wait().map_err(|e| {
            ScriptError::process_with_pid(format!("Failed to poll process: {}", e), self.pid)
        })?;
        if let Some(status) = status {
            info!(pid = ?self.pid, %status, "application exited");
            self.exit_status = Some(status);
            self.state = ProcessState::Terminated;
        }
        Ok(status)
    }

    /// Forcibly end the process
    ///
    /// No shutdown command is sent first. Calling this on a process that has
    /// already exited or was already terminated is a no-op.
    pub async fn terminate(&mut self) -> ScriptResult<()> {
        if self.state == ProcessState::Terminated {
            return Ok(());
        }
        if self.has_exited()?.is_some() {
            return Ok(());
        }

        if let Err(e) = self.child.start_kill() {
            // The child can exit between try_wait and start_kill.
            warn!(pid = ?self.pid, error = %e, "kill signal not delivered");
        }

        let status = timeout(self.terminate_timeout, self.child.wait())
            .await
            .map_err(|_| {
                ScriptError::timeout(
                    format!("waiting for process {:?} to exit", self.pid),
                    self.terminate_timeout,
                )
            })?
            .map_err(|e| {
                ScriptError::process_with_pid(format!("Failed to reap process: {}", e), self.pid)
            })?;

        info!(pid = ?self.pid, %status, "application terminated");
        self.exit_status = Some(status);
        self.state = ProcessState::Terminated;
        Ok(())
    }
}
