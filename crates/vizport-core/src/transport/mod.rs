//! Transport layer for the script port
//!
//! ## Available Transports
//!
//! - **Stream**: any `AsyncRead + AsyncWrite` byte stream
//! - **Tcp**: the stream transport over a `TcpStream`, used against a live application

pub mod stream;

pub use stream::{StreamTransport, TcpTransport};

use crate::error::ScriptError;
use crate::protocol::Frame;
use async_trait::async_trait;

/// Frame transport for the script port
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one frame
    async fn send(&mut self, frame: Frame) -> Result<(), ScriptError>;

    /// Receive one frame
    async fn receive(&mut self) -> Result<Frame, ScriptError>;

    /// Close the transport
    async fn close(&mut self) -> Result<(), ScriptError>;

    /// Check if the transport is connected
    fn is_connected(&self) -> bool;
}
