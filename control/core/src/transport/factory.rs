//! Transport Factory
//!
//! Builds the dialer for a [`TransportConfig`]. This keeps the platform
//! decision in configuration and out of the connector and client.

use std::sync::Arc;

use super::{
    config::{TransportConfig, TransportType},
    connector::Connector,
    loopback::LoopbackDialer,
    traits::{Dialer, TransportError},
};

#[cfg(unix)]
use super::unix_socket::UnixSocketDialer;

/// Create a dialer based on configuration
///
/// # Errors
///
/// Returns `TransportError::Unsupported` if a Unix socket is requested on a
/// platform without Unix domain sockets, and `TransportError::InvalidConfig`
/// for a loopback port of 0.
pub fn create_dialer(config: &TransportConfig) -> Result<Arc<dyn Dialer>, TransportError> {
    match &config.transport {
        #[cfg(unix)]
        TransportType::UnixSocket { base_path } => Ok(Arc::new(UnixSocketDialer::in_dir(base_path))),

        #[cfg(not(unix))]
        TransportType::UnixSocket { .. } => Err(TransportError::Unsupported(
            "Unix domain sockets are unavailable; configure a loopback transport".into(),
        )),

        TransportType::Loopback { port: 0 } => Err(TransportError::InvalidConfig(
            "loopback port must be non-zero".into(),
        )),

        TransportType::Loopback { port } => Ok(Arc::new(LoopbackDialer::new(*port))),
    }
}

/// Create a retrying connector based on configuration
///
/// # Errors
///
/// Same as [`create_dialer`].
pub fn create_connector(config: &TransportConfig) -> Result<Connector, TransportError> {
    Ok(Connector::new(create_dialer(config)?, config.retry))
}
