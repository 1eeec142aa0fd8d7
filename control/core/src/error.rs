//! Control client errors

use std::io;

use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by [`crate::ControlClient`] operations
///
/// Decode-loop failures never show up here; the loop ends on its own.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Every dial attempt failed; carries the error from the last one
    #[error(transparent)]
    Dial(io::Error),

    /// The command selector byte could not be written
    #[error("write command: {0}")]
    WriteCommand(#[source] io::Error),

    /// The status interval could not be written
    #[error("write interval: {0}")]
    WriteInterval(#[source] io::Error),

    /// The transport could not be built from configuration
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ControlError {
    /// Underlying I/O error, if this failure came from the socket
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Dial(e) | Self::WriteCommand(e) | Self::WriteInterval(e) => Some(e),
            Self::Transport(_) => None,
        }
    }
}
