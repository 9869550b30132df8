//! Byte-stream transport
//!
//! Frames are written straight to the write half and read through a buffered
//! read half.

use super::Transport;
use crate::error::ScriptError;
use crate::protocol::{DEFAULT_MAX_FRAME_BYTES, Frame};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Transport over a live TCP connection
pub type TcpTransport = StreamTransport<TcpStream>;

/// Transport over any bidirectional byte stream
pub struct StreamTransport<S> {
    /// Buffered read half
    reader: Option<BufReader<ReadHalf<S>>>,
    /// Write half
    writer: Option<WriteHalf<S>>,
    /// Largest payload accepted in either direction
    max_frame_bytes: usize,
    /// Whether connected
    connected: bool,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + Sync + 'static,
{
    /// Wrap an already-connected stream
    pub fn new(stream: S) -> Self {
        Self::with_max_frame_bytes(stream, DEFAULT_MAX_FRAME_BYTES)
    }

    /// Wrap a stream with a custom frame size limit
    pub fn with_max_frame_bytes(stream: S, max_frame_bytes: usize) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: Some(BufReader::new(reader)),
            writer: Some(writer),
            max_frame_bytes,
            connected: true,
        }
    }

    /// Largest payload accepted in either direction
    pub fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }
}

impl TcpTransport {
    /// Connect to a listener, giving up after `connect_timeout`
    pub async fn connect(
        addr: SocketAddr,
        connect_timeout: Duration,
        max_frame_bytes: usize,
    ) -> Result<Self, ScriptError> {
        let stream = connect_within(addr, connect_timeout, TcpStream::connect(addr)).await?;

        // Requests are written as header + payload; don't let Nagle hold the tail.
        stream.set_nodelay(true)?;
        debug!(%addr, "script port connected");

        Ok(Self::with_max_frame_bytes(stream, max_frame_bytes))
    }
}

/// Bound a connect attempt; refusal and an expired bound are both connection errors
async fn connect_within<F, T>(
    addr: SocketAddr,
    connect_timeout: Duration,
    connecting: F,
) -> Result<T, ScriptError>
where
    F: Future<Output = std::io::Result<T>>,
{
    timeout(connect_timeout, connecting)
        .await
        .map_err(|_| {
            ScriptError::connection_on_port(
                format!("connecting to {} timed out after {:?}", addr, connect_timeout),
                addr.port(),
            )
        })?
        .map_err(|e| {
            ScriptError::connection_on_port(
                format!("cannot connect to {}: {}", addr, e),
                addr.port(),
            )
        })
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + Sync + 'static,
{
    async fn send(&mut self, frame: Frame) -> Result<(), ScriptError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| ScriptError::connection("transport is closed"))?;

        if let Err(e) = frame.write_to(writer, self.max_frame_bytes).await {
            if !matches!(e, ScriptError::Encoding { .. }) {
                self.connected = false;
            }
            return Err(e);
        }
        Ok(())
    }

    async fn receive(&mut self) -> Result<Frame, ScriptError> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| ScriptError::connection("transport is closed"))?;

        match Frame::read_from(reader, self.max_frame_bytes).await {
            Ok(Some(frame)) => Ok(frame),
            Ok(None) => {
                self.connected = false;
                Err(ScriptError::protocol("channel closed by peer"))
            }
            Err(e) => {
                self.connected = false;
                Err(e)
            }
        }
    }

    async fn close(&mut self) -> Result<(), ScriptError> {
        self.connected = false;
        self.reader.take();
        if let Some(mut writer) = self.writer.take() {
            // Peer may already be gone; shutting down a dead socket is not an error here.
            let _ = writer.shutdown().await;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
