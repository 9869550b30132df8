//! Protocol connector
//!
//! Executes one command at a time over a persistent script-port connection.
//!
//! # Features
//! - Strict request/response alternation (`execute` takes `&mut self`)
//! - Per-call or default response timeouts
//! - Tainting after a timeout or framing failure, so a stale reply can never be
//!   read as the answer to a later command

use crate::config::{ProtocolConfig, TimeoutConfig};
use crate::error::{ScriptError, ScriptResult};
use crate::protocol::{Command, Frame, FrameTag, decode_fields};
use crate::transport::{TcpTransport, Transport};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Ready for the next command
    Open,
    /// A previous exchange failed; close and re-open
    Tainted,
    /// Closed by the caller
    Closed,
}

/// Options for opening a connection
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Host to connect to; the application only listens locally
    pub host: Ipv4Addr,
    /// Bound on establishing the TCP connection
    pub connect_timeout: Duration,
    /// Default bound on waiting for a response
    pub request_timeout: Duration,
    /// Largest payload accepted in either direction
    pub max_frame_bytes: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default(), &ProtocolConfig::default())
    }
}

impl ConnectOptions {
    /// Build options from configuration sections
    pub fn from_config(timeouts: &TimeoutConfig, protocol: &ProtocolConfig) -> Self {
        Self {
            host: Ipv4Addr::LOCALHOST,
            connect_timeout: timeouts.connect_timeout(),
            request_timeout: timeouts.request_timeout(),
            max_frame_bytes: protocol.max_frame_bytes,
        }
    }

    /// Set the default request timeout
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

/// Client side of one script-port connection
pub struct Connector {
    /// Transport layer
    transport: Box<dyn Transport>,
    /// Port the connection was opened on, when known
    port: Option<u16>,
    /// Default response timeout
    request_timeout: Duration,
    /// Connection state
    state: ConnectionState,
    /// Commands completed on this connection
    completed: u64,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("state", &self.state)
            .field("completed", &self.completed)
            .finish()
    }
}

impl Connector {
    /// Open a connection to a listener on `port` on the local host
    ///
    /// Fails with a connection error when nothing accepts on the port yet; the
    /// application's listener is not up immediately after launch, so callers
    /// retry (see `process::await_ready`).
    #[instrument(skip(options), level = "debug")]
    pub async fn open(port: u16, options: &ConnectOptions) -> ScriptResult<Self> {
        let addr = SocketAddr::from((options.host, port));
        let transport =
            TcpTransport::connect(addr, options.connect_timeout, options.max_frame_bytes).await?;
        let mut connector = Self::with_timeout(Box::new(transport), options.request_timeout);
        connector.port = Some(port);
        Ok(connector)
    }

    /// Create a connector over an existing transport
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_timeout(transport, crate::config::timeouts::connection::request_timeout())
    }

    /// Create a connector over an existing transport with a custom timeout
    pub fn with_timeout(transport: Box<dyn Transport>, request_timeout: Duration) -> Self {
        Self {
            transport,
            port: None,
            request_timeout,
            state: ConnectionState::Open,
            completed: 0,
        }
    }

    /// Set the default request timeout
    pub fn set_timeout(&mut self, request_timeout: Duration) {
        self.request_timeout = request_timeout;
    }

    /// Default request timeout
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Port this connection was opened on
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the next `execute` may go ahead
    pub fn is_usable(&self) -> bool {
        self.state == ConnectionState::Open && self.transport.is_connected()
    }

    /// Number of commands that completed on this connection
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Execute a command with the default timeout
    pub async fn execute(&mut self, command: &Command) -> ScriptResult<Vec<String>> {
        let bound = self.request_timeout;
        self.execute_with_timeout(command, bound).await
    }

    /// Execute a command, waiting at most `bound` for its response
    ///
    /// The fields come back exactly as the application sent them. A single
    /// empty field is returned as `[""]`; interpreting it is up to the caller.
    #[instrument(skip(self, command), fields(command = %command.name(), args = command.args().len()), level = "debug")]
    pub async fn execute_with_timeout(
        &mut self,
        command: &Command,
        bound: Duration,
    ) -> ScriptResult<Vec<String>> {
        self.ensure_open()?;

        // Encoding problems are caught before anything reaches the wire.
        let payload = command.encode()?;
        debug!(bytes = payload.len(), "sending command");

        let result = timeout(bound, self.exchange(Frame::command(payload))).await;
        let result = match result {
            Ok(inner) => inner,
            Err(_) => Err(ScriptError::timeout(
                format!("waiting for response to '{}'", command.name()),
                bound,
            )),
        };

        match result {
            Ok(fields) => {
                self.completed += 1;
                debug!(fields = fields.len(), "command completed");
                Ok(fields)
            }
            Err(e) => {
                if e.taints_connection() {
                    warn!(error = %e, "connection tainted; it must be re-opened");
                    self.state = ConnectionState::Tainted;
                }
                Err(e)
            }
        }
    }

    /// Convenience wrapper building the command from a name and pairs
    pub async fn execute_named<I, K, V>(&mut self, name: &str, args: I) -> ScriptResult<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<crate::protocol::ArgValue>,
    {
        let mut command = Command::new(name);
        for (k, v) in args {
            command.set_arg(k, v);
        }
        self.execute(&command).await
    }

    /// Close the connection; safe to call more than once
    pub async fn close(&mut self) -> ScriptResult<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;
        debug!(port = ?self.port, completed = self.completed, "closing script connection");
        self.transport.close().await
    }

    async fn exchange(&mut self, request: Frame) -> ScriptResult<Vec<String>> {
        self.transport.send(request).await?;
        let response = self.transport.receive().await?;
        if response.tag != FrameTag::Response {
            return Err(ScriptError::protocol(format!(
                "expected a {} frame, got {}",
                FrameTag::Response,
                response.tag
            )));
        }
        decode_fields(&response.payload)
    }

    fn ensure_open(&self) -> ScriptResult<()> {
        match self.state {
            ConnectionState::Open if self.transport.is_connected() => Ok(()),
            ConnectionState::Open => Err(self.unusable("transport is disconnected")),
            ConnectionState::Tainted => Err(self.unusable(
                "connection is tainted by an earlier timeout or protocol error",
            )),
            ConnectionState::Closed => Err(self.unusable("connection is closed")),
        }
    }

    fn unusable(&self, message: &str) -> ScriptError {
        match self.port {
            Some(port) => ScriptError::connection_on_port(message, port),
            None => ScriptError::connection(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, StreamTransport};
    use tokio::io::duplex;

    fn mock_connected() -> MockTransport {
        let mut mock = MockTransport::new();
        mock.expect_is_connected().return_const(true);
        mock
    }

    #[tokio::test]
    async fn test_execute_returns_fields_verbatim() {
        let mut mock = mock_connected();
        mock.expect_send()
            .withf(|frame| frame.payload == "getColormaps")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_receive()
            .times(1)
            .returning(|| Ok(Frame::response("gray|heat|cool")));

        let mut connector = Connector::new(Box::new(mock));
        let fields = connector.execute(&Command::new("getColormaps")).await.unwrap();
        assert_eq!(fields, vec!["gray", "heat", "cool"]);
        assert_eq!(connector.completed(), 1);
    }

    #[tokio::test]
    async fn test_encoding_error_sends_nothing() {
        let mut mock = mock_connected();
        mock.expect_send().never();

        let mut connector = Connector::new(Box::new(mock));
        let err = connector
            .execute(&Command::new("cmd").arg("bad name", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::Encoding { .. }));
        assert_eq!(connector.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_protocol_error_taints() {
        let mut mock = mock_connected();
        mock.expect_send().times(1).returning(|_| Ok(()));
        mock.expect_receive()
            .times(1)
            .returning(|| Err(ScriptError::protocol("channel closed by peer")));

        let mut connector = Connector::new(Box::new(mock));
        let err = connector.execute(&Command::new("a")).await.unwrap_err();
        assert!(matches!(err, ScriptError::Protocol { .. }));
        assert_eq!(connector.state(), ConnectionState::Tainted);

        // Second command is refused without touching the transport.
        let err = connector.execute(&Command::new("b")).await.unwrap_err();
        assert!(matches!(err, ScriptError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_wrong_tag_is_protocol_error() {
        let mut mock = mock_connected();
        mock.expect_send().returning(|_| Ok(()));
        mock.expect_receive().returning(|| Ok(Frame::command("echo")));

        let mut connector = Connector::new(Box::new(mock));
        let err = connector.execute(&Command::new("a")).await.unwrap_err();
        assert!(matches!(err, ScriptError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_timeout_taints() {
        // The peer end stays open but never answers.
        let (client, _server) = duplex(1024);
        let mut connector = Connector::with_timeout(
            Box::new(StreamTransport::new(client)),
            Duration::from_millis(50),
        );

        let err = connector.execute(&Command::new("slow")).await.unwrap_err();
        assert!(matches!(err, ScriptError::Timeout { .. }), "{err}");
        assert_eq!(connector.state(), ConnectionState::Tainted);
        assert!(!connector.is_usable());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut mock = mock_connected();
        mock.expect_close().times(1).returning(|| Ok(()));

        let mut connector = Connector::new(Box::new(mock));
        connector.close().await.unwrap();
        connector.close().await.unwrap();
        assert_eq!(connector.state(), ConnectionState::Closed);
        assert!(connector.execute(&Command::new("a")).await.is_err());
    }

    #[tokio::test]
    async fn test_open_refused_is_connection_error() {
        // Bind then drop to find a port with no listener.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = Connector::open(port, &ConnectOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::Connection { .. }), "{err}");
    }
}
