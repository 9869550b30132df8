//! In-process stand-in for the application's script port
//!
//! Listens on an ephemeral local port, decodes each command frame and answers
//! with whatever the supplied handler returns. Used by tests here and in
//! downstream crates; it speaks the same framing as the real application.

use crate::error::ScriptResult;
use crate::protocol::{Command, Frame, FrameTag, encode_fields};
use crate::transport::{StreamTransport, Transport};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What the stub sends back for one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubReply {
    /// Reply with these fields
    Fields(Vec<String>),
    /// Reply with this payload as-is, bypassing field escaping
    Raw(String),
    /// Wait, then reply with these fields
    Delayed(Duration, Vec<String>),
    /// Never reply; keep the connection open
    Silent,
    /// Close the connection without replying
    Hangup,
}

impl StubReply {
    /// Reply with fields built from anything string-like
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// The "no results / done" sentinel: one empty field
    pub fn empty() -> Self {
        Self::Fields(vec![String::new()])
    }
}

/// Something the stub observed, in order
#[derive(Debug, Clone)]
pub enum StubEvent {
    /// A command frame was decoded
    Received { command: Command, at: Instant },
    /// The reply for the named command was flushed
    Replied { command: String, at: Instant },
}

type Handler = dyn Fn(&Command) -> StubReply + Send + Sync;

/// A running stub application
pub struct StubApp {
    port: u16,
    events: Arc<Mutex<Vec<StubEvent>>>,
    task: JoinHandle<()>,
}

impl StubApp {
    /// Start listening; connections are served one after another
    pub async fn start<F>(handler: F) -> ScriptResult<Self>
    where
        F: Fn(&Command) -> StubReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        let events = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let task_events = Arc::clone(&events);
        let task = tokio::spawn(async move {
            while let Ok((stream, peer)) = listener.accept().await {
                debug!(%peer, "stub accepted connection");
                let transport = StreamTransport::new(stream);
                serve(transport, Arc::clone(&handler), Arc::clone(&task_events)).await;
            }
        });

        Ok(Self { port, events, task })
    }

    /// Port the stub listens on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Everything observed so far
    pub fn events(&self) -> Vec<StubEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Commands received so far, in arrival order
    pub fn received(&self) -> Vec<Command> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                StubEvent::Received { command, .. } => Some(command),
                StubEvent::Replied { .. } => None,
            })
            .collect()
    }
}

impl Drop for StubApp {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve<T: Transport>(
    mut transport: T,
    handler: Arc<Handler>,
    events: Arc<Mutex<Vec<StubEvent>>>,
) {
    let record = |event: StubEvent| {
        if let Ok(mut events) = events.lock() {
            events.push(event);
        }
    };

    loop {
        let frame = match transport.receive().await {
            Ok(frame) => frame,
            Err(e) => {
                debug!(error = %e, "stub connection ended");
                return;
            }
        };
        if frame.tag != FrameTag::Command {
            warn!(tag = %frame.tag, "stub ignoring non-command frame");
            continue;
        }
        let command = match Command::decode(&frame.payload) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "stub received undecodable command");
                return;
            }
        };
        record(StubEvent::Received {
            command: command.clone(),
            at: Instant::now(),
        });

        let payload = match handler(&command) {
            StubReply::Fields(fields) => encode_fields(fields),
            StubReply::Raw(payload) => payload,
            StubReply::Delayed(delay, fields) => {
                tokio::time::sleep(delay).await;
                encode_fields(fields)
            }
            StubReply::Silent => {
                // Hold the connection open until the client goes away.
                while transport.receive().await.is_ok() {}
                return;
            }
            StubReply::Hangup => {
                let _ = transport.close().await;
                return;
            }
        };

        if transport.send(Frame::response(payload)).await.is_err() {
            return;
        }
        record(StubEvent::Replied {
            command: command.name().to_string(),
            at: Instant::now(),
        });
    }
}
