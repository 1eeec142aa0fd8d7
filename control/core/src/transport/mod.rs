//! Transport Layer for the Daemon Control Channel
//!
//! Provides abstraction over the local transports the daemon listens on:
//! - `UnixSocket`: `<base path>/command.sock` (default)
//! - `Loopback`: `127.0.0.1:<port>` for platforms without domain sockets
//!
//! # Design
//!
//! A [`Dialer`] makes exactly one connection attempt. The [`Connector`] wraps
//! any dialer with the retry policy and never looks at the concrete socket
//! type. [`create_connector`] picks the dialer from a [`TransportConfig`].
//!
//! # Security
//!
//! - No network exposure: loopback TCP binds to `127.0.0.1` only
//! - Socket permissions are the daemon's responsibility

pub mod config;
pub mod connector;
pub mod factory;
pub mod loopback;
pub mod traits;
#[cfg(unix)]
pub mod unix_socket;

// Re-exports for convenience
pub use config::{
    default_base_path, socket_path, Platform, RetryPolicy, TransportConfig, TransportType,
    DEFAULT_LOOPBACK_PORT, SOCKET_FILE_NAME,
};
pub use connector::Connector;
pub use factory::{create_connector, create_dialer};
pub use loopback::LoopbackDialer;
pub use traits::{BoxedStream, ControlStream, Dialer, Endpoint, TransportError};

#[cfg(unix)]
pub use unix_socket::UnixSocketDialer;
