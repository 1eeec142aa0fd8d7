//! Transport Traits
//!
//! The seam between the transport-agnostic [`super::Connector`] and the
//! concrete socket types.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

/// A bidirectional byte stream to the daemon
pub trait ControlStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

impl<T> ControlStream for T where T: AsyncRead + AsyncWrite + Send + Unpin + 'static {}

/// Owned, type-erased daemon connection
pub type BoxedStream = Box<dyn ControlStream>;

/// Resolved address of the daemon's control endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Unix domain socket path
    Unix(PathBuf),
    /// Loopback TCP address
    Tcp(SocketAddr),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp:{addr}"),
        }
    }
}

/// Opens one connection to the daemon per call
///
/// Implementations make a single attempt; retry lives in the connector.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Make one connection attempt
    async fn dial(&self) -> io::Result<BoxedStream>;

    /// Endpoint this dialer connects to
    fn endpoint(&self) -> Endpoint;
}

/// Errors building a transport from configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The configured transport does not exist on this platform
    #[error("transport not supported on this platform: {0}")]
    Unsupported(String),

    /// The configuration cannot produce a usable endpoint
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),
}
