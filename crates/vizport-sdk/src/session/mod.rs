//! Session: one application process and its script connection

mod layout;
mod snapshots;
mod views;

use crate::error::{SdkError, SdkResult};
use crate::response::{expect_list, expect_void};
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use vizport_core::{
    ArgValue, Command, ConnectOptions, Connector, ProcessHandle, ProcessState, ScriptError,
    Supervisor, VizportConfig, await_ready,
};

/// A connection to the application, and the process when this session
/// started it
///
/// Dropping a session that owns its process kills the process.
///
/// # Examples
///
/// ```no_run
/// use vizport_sdk::{Session, VizportConfig};
///
/// # async fn example() -> vizport_sdk::SdkResult<()> {
/// let config = VizportConfig::default();
/// let mut session = Session::launch(&config).await?;
///
/// for name in session.colormaps().await? {
///     println!("{}", name);
/// }
/// session.set_custom_layout(2, 3).await?;
/// session.terminate().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session {
    process: Option<ProcessHandle>,
    connector: Connector,
}

impl Session {
    /// Launch the configured application and wait until it accepts commands
    #[instrument(skip(config), fields(port = config.app.port))]
    pub async fn launch(config: &VizportConfig) -> SdkResult<Self> {
        config.validate()?;
        let spec = config.launch_spec()?;
        let supervisor = Supervisor::new(config.timeouts.terminate_timeout());
        let mut process = supervisor.launch(&spec)?;

        let policy = config.readiness.policy();
        let connector = match await_ready(&mut process, &policy, &config.connect_options()).await
        {
            Ok(connector) => connector,
            Err(e) => {
                if let Err(kill_err) = process.terminate().await {
                    warn!(error = %kill_err, "failed to clean up after readiness failure");
                }
                return Err(e.into());
            }
        };

        info!(pid = ?process.pid(), "session started");
        Ok(Self {
            process: Some(process),
            connector,
        })
    }

    /// Connect to an application that is already running
    pub async fn connect(port: u16, options: &ConnectOptions) -> SdkResult<Self> {
        let connector = Connector::open(port, options).await?;
        Ok(Self::attach(connector))
    }

    /// Wrap an open connection; the session won't own a process
    pub fn attach(connector: Connector) -> Self {
        Self {
            process: None,
            connector,
        }
    }

    /// Wrap a ready process and its connection
    pub fn with_process(process: ProcessHandle, connector: Connector) -> Self {
        Self {
            process: Some(process),
            connector,
        }
    }

    /// The underlying connection
    pub fn connector(&mut self) -> &mut Connector {
        &mut self.connector
    }

    /// The owned process, if this session launched one
    pub fn process(&self) -> Option<&ProcessHandle> {
        self.process.as_ref()
    }

    /// Whether commands can still be sent
    pub fn is_active(&self) -> bool {
        self.connector.is_usable()
            && self
                .process
                .as_ref()
                .is_none_or(|p| p.state() != ProcessState::Terminated)
    }

    /// Send any command and return the raw fields
    pub async fn execute<I, K, V>(&mut self, name: &str, args: I) -> SdkResult<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgValue>,
    {
        Ok(self.connector.execute_named(name, args).await?)
    }

    /// Send a prepared command and return the raw fields
    pub async fn execute_command(&mut self, command: &Command) -> SdkResult<Vec<String>> {
        Ok(self.connector.execute(command).await?)
    }

    /// Send a command that returns nothing on success
    pub(crate) async fn execute_void(&mut self, command: &Command) -> SdkResult<()> {
        let fields = self.connector.execute(command).await?;
        expect_void(command.name(), fields)
    }

    /// Send a command that returns a possibly empty list
    pub(crate) async fn execute_list(&mut self, command: &Command) -> SdkResult<Vec<String>> {
        let fields = self.connector.execute(command).await?;
        Ok(expect_list(fields))
    }

    /// Send a whole file as one argument of one command
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn send_file(
        &mut self,
        command: &str,
        arg_name: &str,
        path: impl AsRef<Path>,
    ) -> SdkResult<Vec<String>> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            SdkError::from(
                ScriptError::from(e).with_context(format!("reading {}", path.display())),
            )
        })?;
        debug!(bytes = contents.len(), "sending file contents");
        let command = Command::new(command).arg(arg_name, contents);
        self.execute_command(&command).await
    }

    /// Send a file through the application's `fakeCommand` as `data`
    pub async fn fake_command(&mut self, path: impl AsRef<Path>) -> SdkResult<Vec<String>> {
        self.send_file("fakeCommand", "data", path).await
    }

    /// Close the connection and kill the process
    ///
    /// No shutdown command is sent. Safe to call more than once.
    pub async fn terminate(&mut self) -> SdkResult<()> {
        if let Err(e) = self.connector.close().await {
            warn!(error = %e, "error closing script connection");
        }
        if let Some(process) = self.process.as_mut() {
            process.terminate().await?;
        }
        Ok(())
    }

    /// Alias for [`Session::terminate`]
    pub async fn kill(&mut self) -> SdkResult<()> {
        self.terminate().await
    }

    /// Alias for [`Session::terminate`]
    pub async fn quit(&mut self) -> SdkResult<()> {
        self.terminate().await
    }
}
