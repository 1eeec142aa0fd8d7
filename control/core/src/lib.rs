//! Control Core - Client for a Local Daemon's Control Channel
//!
//! This crate connects to a long-running local daemon, sends a single-byte
//! command selector, and for the `Status` command streams fixed-layout
//! telemetry frames to an application handler.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ControlClient                         │
//! │                                                              │
//! │  connect() ──► Connector ──► dispatch() ──► spawn status loop│
//! │                (retry)       (selector +     (owns stream,   │
//! │                   │           interval)       calls handler) │
//! │                   ▼                                          │
//! │               Dialer (UnixSocket | Loopback)                 │
//! └──────────────────────────────────┬───────────────────────────┘
//!                                    │  command.sock / 127.0.0.1
//!                                    ▼
//!                                 daemon
//! ```
//!
//! # Key Types
//!
//! - [`ControlClient`]: Owns the one live connection and drives sessions
//! - [`ControlClientConfig`]: Command and push interval, fixed at construction
//! - [`ControlHandler`]: Callbacks for connect, samples, and loop exit
//! - [`TelemetrySample`]: One decoded telemetry frame
//! - [`transport::TransportConfig`]: Which endpoint to dial and how to retry
//!
//! # Quick Start
//!
//! ```ignore
//! use control_core::{ChannelHandler, ControlClient, ControlClientConfig, ControlEvent};
//! use control_core::transport::{Platform, TransportConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), control_core::ControlError> {
//!     let transport = TransportConfig::for_platform("/run/box", Platform::Standard);
//!     let (handler, mut events) = ChannelHandler::new();
//!     let mut client =
//!         ControlClient::from_transport_config(&transport, ControlClientConfig::status(1), handler)?;
//!
//!     client.connect().await?;
//!     while let Some(ControlEvent::Sample(sample)) = events.recv().await {
//!         println!("memory: {}", sample.memory_bytes);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`command`]: Command selector and dispatch onto a fresh connection
//! - [`telemetry`]: Telemetry frame layout and decoding
//! - [`handler`]: Handler contract and ready-made handlers
//! - [`status`]: The decode loop run for `Status` sessions
//! - [`client`]: The control client and its connection lifecycle
//! - [`transport`]: Endpoint configuration, dialers, and retry
//! - [`config`]: TOML configuration file support

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod status;
pub mod telemetry;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports for convenience
pub use client::{ControlClient, ControlClientConfig};
pub use command::{dispatch, CommandError, ControlCommand};
pub use error::ControlError;
pub use handler::{ChannelHandler, ControlEvent, ControlHandler, NoopHandler};
pub use status::{run_status_loop, LoopExit};
pub use telemetry::{TelemetrySample, FRAME_SIZE};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, ControlToml, TransportSection,
};
