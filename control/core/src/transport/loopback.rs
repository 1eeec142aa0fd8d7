//! Loopback TCP Transport
//!
//! Used on platforms where the daemon cannot expose a Unix domain socket.
//! Only ever connects to `127.0.0.1`.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use tokio::net::TcpStream;

use super::traits::{BoxedStream, Dialer, Endpoint};

/// Dials the daemon on a loopback TCP port
#[derive(Debug, Clone)]
pub struct LoopbackDialer {
    addr: SocketAddr,
}

impl LoopbackDialer {
    /// Create a dialer for `127.0.0.1:port`
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
        }
    }

    /// Get the target address
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl Dialer for LoopbackDialer {
    async fn dial(&self) -> io::Result<BoxedStream> {
        let stream = TcpStream::connect(self.addr).await?;
        stream.set_nodelay(true)?;
        Ok(Box::new(stream))
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Tcp(self.addr)
    }
}
