//! Control Client
//!
//! Owns the single live connection to the daemon and drives a session:
//! dial with retry, write the command, and for `Status` hand the connection
//! to a decode loop.
//!
//! # Connection Ownership
//!
//! ```text
//!   ControlClient                      decode task
//!  ┌──────────────┐   spawn + move   ┌──────────────────┐
//!  │ Connection:: │ ───────────────► │ owns BoxedStream │
//!  │  Streaming   │                  │ reads frames     │
//!  │  (JoinHandle)│ ◄── abort ────── │ calls handler    │
//!  └──────────────┘                  └──────────────────┘
//! ```
//!
//! The client never shares a live stream with a decode task. Reconnecting
//! aborts the old task and waits for it to finish, which drops (closes) its
//! stream before the new session is dialed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::{dispatch, ControlCommand};
use crate::error::ControlError;
use crate::handler::ControlHandler;
use crate::status::spawn_status_loop;
use crate::transport::{create_connector, BoxedStream, Connector, TransportConfig};

/// Client configuration, fixed at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlClientConfig {
    /// Command written on every new connection
    pub command: ControlCommand,

    /// Telemetry push interval requested from the daemon, in seconds
    pub status_interval_secs: i64,

    /// Call `on_disconnected` when a decode loop ends
    ///
    /// Off by default: the loop ends silently.
    pub notify_disconnect: bool,
}

impl Default for ControlClientConfig {
    fn default() -> Self {
        Self {
            command: ControlCommand::Status,
            status_interval_secs: 1,
            notify_disconnect: false,
        }
    }
}

impl ControlClientConfig {
    /// Status configuration with the given push interval
    #[must_use]
    pub fn status(interval_secs: i64) -> Self {
        Self {
            command: ControlCommand::Status,
            status_interval_secs: interval_secs,
            ..Default::default()
        }
    }
}

/// The connection currently held by the client
enum Connection {
    /// Command written (or failed to write); no decode loop attached
    Idle { session: u64, stream: BoxedStream },
    /// Handed to a running decode loop
    Streaming { session: u64, task: JoinHandle<()> },
}

impl Connection {
    fn is_alive(&self) -> bool {
        match self {
            Self::Idle { .. } => true,
            Self::Streaming { task, .. } => !task.is_finished(),
        }
    }

    /// Close best-effort; never fails
    async fn close(self) {
        match self {
            Self::Idle {
                session,
                mut stream,
            } => {
                if let Err(e) = stream.shutdown().await {
                    debug!(session, error = %e, "Shutdown of previous connection failed");
                }
                debug!(session, "Previous connection closed");
            }
            Self::Streaming { session, task } => {
                task.abort();
                match task.await {
                    Ok(()) => debug!(session, "Previous status loop had already ended"),
                    Err(e) if e.is_cancelled() => debug!(session, "Previous status loop cancelled"),
                    Err(e) => warn!(session, error = %e, "Previous status loop panicked"),
                }
            }
        }
    }
}

/// Client for the daemon control channel
pub struct ControlClient<H: ControlHandler> {
    connector: Connector,
    config: ControlClientConfig,
    handler: Arc<H>,
    connection: Option<Connection>,
    /// Sessions started so far, used to tag logs
    sessions: u64,
}

impl<H: ControlHandler> ControlClient<H> {
    /// Create a client around an existing connector
    pub fn new(connector: Connector, config: ControlClientConfig, handler: H) -> Self {
        Self {
            connector,
            config,
            handler: Arc::new(handler),
            connection: None,
            sessions: 0,
        }
    }

    /// Create a client from transport configuration
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Transport` if the transport cannot be built.
    pub fn from_transport_config(
        transport: &TransportConfig,
        config: ControlClientConfig,
        handler: H,
    ) -> Result<Self, ControlError> {
        Ok(Self::new(create_connector(transport)?, config, handler))
    }

    /// Start a new session
    ///
    /// Closes any previously held connection, dials with retry, writes the
    /// command and, for `Status`, spawns the decode loop. Each call starts
    /// from scratch; nothing carries over from the previous session.
    ///
    /// # Errors
    ///
    /// - `ControlError::Dial` with the last dial error; the client is left
    ///   without a connection
    /// - `ControlError::WriteCommand` / `ControlError::WriteInterval`; the
    ///   connection is kept open
    pub async fn connect(&mut self) -> Result<(), ControlError> {
        if let Some(previous) = self.connection.take() {
            previous.close().await;
        }

        let mut stream = self
            .connector
            .connect()
            .await
            .map_err(ControlError::Dial)?;

        self.sessions += 1;
        let session = self.sessions;

        if let Err(e) = dispatch(&mut stream, &self.config).await {
            warn!(session, error = %e, "Command dispatch failed");
            self.connection = Some(Connection::Idle { session, stream });
            return Err(e);
        }

        info!(
            session,
            endpoint = %self.connector.endpoint(),
            command = %self.config.command,
            "Connected to daemon"
        );
        self.handler.on_connected();

        let connection = if self.config.command.streams_telemetry() {
            let task = spawn_status_loop(
                stream,
                Arc::clone(&self.handler),
                self.config.notify_disconnect,
                session,
            );
            Connection::Streaming { session, task }
        } else {
            Connection::Idle { session, stream }
        };
        self.connection = Some(connection);

        Ok(())
    }

    /// Placeholder for an active disconnect; always succeeds
    ///
    /// A running decode loop is left alone and ends only when the daemon
    /// closes the connection or a later [`Self::connect`] replaces it.
    ///
    /// # Errors
    ///
    /// Never returns an error.
    pub async fn disconnect(&mut self) -> Result<(), ControlError> {
        debug!(
            held = self.connection.is_some(),
            "Disconnect requested; leaving connection untouched"
        );
        Ok(())
    }

    /// Whether a connection is held and, when streaming, its loop still runs
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(Connection::is_alive)
    }

    /// Client configuration
    #[must_use]
    pub fn config(&self) -> &ControlClientConfig {
        &self.config
    }

    /// Shared handle to the handler
    #[must_use]
    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }

    /// Number of sessions that got as far as a dispatched command or a
    /// failed dispatch
    #[must_use]
    pub fn session_count(&self) -> u64 {
        self.sessions
    }
}
