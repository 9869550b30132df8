//! Readiness gate between launch and the first connection

use super::backoff::{BackoffConfig, ExponentialBackoff};
use super::handle::ProcessHandle;
use crate::connector::{ConnectOptions, Connector};
use crate::error::{ScriptError, ScriptResult};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument};

/// How to decide that the application's script port is up
#[derive(Debug, Clone, PartialEq)]
pub enum ReadinessPolicy {
    /// Sleep, then connect once
    FixedDelay(Duration),
    /// Probe with backoff until a connection succeeds or the deadline passes
    Poll {
        backoff: BackoffConfig,
        deadline: Duration,
    },
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self::Poll {
            backoff: BackoffConfig::default(),
            deadline: crate::config::timeouts::process::ready_deadline(),
        }
    }
}

/// Wait until the launched application accepts a script connection
///
/// Returns the connection that got through and marks the handle ready. Fails
/// with a process error if the application exits first, and with a timeout
/// once the polling deadline passes.
#[instrument(skip(handle, policy, options), fields(pid = ?handle.pid(), port = handle.port()))]
pub async fn await_ready(
    handle: &mut ProcessHandle,
    policy: &ReadinessPolicy,
    options: &ConnectOptions,
) -> ScriptResult<Connector> {
    let connector = match policy {
        ReadinessPolicy::FixedDelay(delay) => {
            debug!(?delay, "waiting a fixed delay before connecting");
            sleep(*delay).await;
            ensure_running(handle)?;
            Connector::open(handle.port(), options).await?
        }
        ReadinessPolicy::Poll { backoff, deadline } => {
            poll_until_ready(handle, backoff, *deadline, options).await?
        }
    };

    handle.mark_ready();
    info!(after = ?handle.uptime(), "script port is accepting commands");
    Ok(connector)
}

async fn poll_until_ready(
    handle: &mut ProcessHandle,
    backoff: &BackoffConfig,
    deadline: Duration,
    options: &ConnectOptions,
) -> ScriptResult<Connector> {
    let give_up_at = Instant::now() + deadline;
    let mut backoff = ExponentialBackoff::with_config(backoff.clone());

    loop {
        ensure_running(handle)?;

        match Connector::open(handle.port(), options).await {
            Ok(connector) => return Ok(connector),
            Err(e @ (ScriptError::Connection { .. } | ScriptError::Timeout { .. })) => {
                debug!(attempt = backoff.attempts(), error = %e, "script port not ready yet");
            }
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= give_up_at {
            return Err(ScriptError::timeout(
                format!(
                    "waiting for the application to listen on port {} ({} probes)",
                    handle.port(),
                    backoff.attempts() + 1
                ),
                deadline,
            ));
        }
        sleep(backoff.next_delay().min(give_up_at - now)).await;
    }
}

fn ensure_running(handle: &mut ProcessHandle) -> ScriptResult<()> {
    match handle.has_exited()? {
        Some(status) => Err(ScriptError::process_with_pid(
            format!(
                "application exited with {} before its script port became ready",
                status
            ),
            handle.pid(),
        )),
        None => Ok(()),
    }
}
