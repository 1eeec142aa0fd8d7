//! Control Commands
//!
//! The command selector is the first thing written on a freshly dialed
//! connection. It tells the daemon which sub-protocol the rest of the
//! connection speaks.
//!
//! # Wire Format
//!
//! ```text
//! +-------------+-------------------------------+
//! | Command (1) | Parameters (per command)      |
//! | u8          | Status: interval, i64 BE secs |
//! +-------------+-------------------------------+
//! ```
//!
//! After the parameters the client writes nothing else. For `Status` the
//! daemon answers with a stream of telemetry frames (see [`crate::telemetry`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::client::ControlClientConfig;
use crate::error::ControlError;

/// Sub-protocol requested on a control connection
///
/// The discriminant is the selector byte sent on the wire. New variants get
/// new byte values; existing values never change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
#[non_exhaustive]
pub enum ControlCommand {
    /// Periodic telemetry push from the daemon
    #[default]
    Status = 1,
}

impl ControlCommand {
    /// Selector byte written on the wire
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Lowercase name, as used in config files and on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
        }
    }

    /// Whether the daemon answers this command with telemetry frames
    #[must_use]
    pub const fn streams_telemetry(self) -> bool {
        matches!(self, Self::Status)
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from parsing a command selector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Selector byte is not a known command
    #[error("unknown command selector: {0:#04x}")]
    UnknownSelector(u8),

    /// Command name is not a known command
    #[error("unknown command: {0}")]
    UnknownName(String),
}

impl TryFrom<u8> for ControlCommand {
    type Error = CommandError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Status),
            other => Err(CommandError::UnknownSelector(other)),
        }
    }
}

impl FromStr for ControlCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Self::Status),
            _ => Err(CommandError::UnknownName(s.to_string())),
        }
    }
}

/// Write the command selector and its parameters onto a fresh connection
///
/// Writes exactly one selector byte, followed for `Status` by the push
/// interval as a big-endian `i64` of seconds.
///
/// # Errors
///
/// Returns [`ControlError::WriteCommand`] if the selector byte cannot be
/// written and [`ControlError::WriteInterval`] if the interval cannot. The
/// writer is left as-is in both cases.
pub async fn dispatch<W>(writer: &mut W, config: &ControlClientConfig) -> Result<(), ControlError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer
        .write_u8(config.command.as_byte())
        .await
        .map_err(ControlError::WriteCommand)?;

    if config.command == ControlCommand::Status {
        writer
            .write_i64(config.status_interval_secs)
            .await
            .map_err(ControlError::WriteInterval)?;
    }

    Ok(())
}
