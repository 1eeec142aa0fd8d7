//! Unix Socket Transport
//!
//! Default transport for reaching the daemon on the same host.
//!
//! # Socket Location
//!
//! `<base path>/command.sock`, where the base path is supplied by the host
//! application (see [`super::TransportConfig`]).

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::net::UnixStream;

use super::config::socket_path;
use super::traits::{BoxedStream, Dialer, Endpoint};

/// Dials the daemon's Unix domain socket
#[derive(Debug, Clone)]
pub struct UnixSocketDialer {
    /// Path to the daemon's socket
    socket_path: PathBuf,
}

impl UnixSocketDialer {
    /// Create a dialer for an explicit socket path
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Create a dialer for `command.sock` inside `base_path`
    #[must_use]
    pub fn in_dir(base_path: &Path) -> Self {
        Self::new(socket_path(base_path))
    }

    /// Get the socket path
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

#[async_trait]
impl Dialer for UnixSocketDialer {
    async fn dial(&self) -> io::Result<BoxedStream> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        Ok(Box::new(stream))
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Unix(self.socket_path.clone())
    }
}
