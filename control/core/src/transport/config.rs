//! Transport Configuration
//!
//! Configuration types for selecting the daemon endpoint and the dial retry
//! policy. A [`TransportConfig`] is built once at startup and passed by value
//! to whatever needs it; nothing here is process-global.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::traits::Endpoint;

/// File name of the daemon's control socket inside the base path
pub const SOCKET_FILE_NAME: &str = "command.sock";

/// Loopback port used where Unix domain sockets are unavailable
pub const DEFAULT_LOOPBACK_PORT: u16 = 8964;

/// Platform capability flag supplied by the host application
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Unix domain sockets are available
    #[default]
    Standard,
    /// No domain sockets; the daemon listens on loopback TCP
    LoopbackOnly,
}

/// Transport type selection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TransportType {
    /// Unix domain socket at `<base_path>/command.sock`
    UnixSocket {
        /// Directory holding the daemon's socket
        base_path: PathBuf,
    },

    /// TCP on `127.0.0.1`
    Loopback {
        /// Port the daemon listens on
        port: u16,
    },
}

impl Default for TransportType {
    fn default() -> Self {
        Self::UnixSocket {
            base_path: default_base_path(),
        }
    }
}

/// Dial retry policy
///
/// Linear backoff: after failed attempt `i` (0-indexed) the connector sleeps
/// `initial_delay_ms + step_ms * i` before trying again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of dial attempts
    pub max_attempts: u32,

    /// Delay after the first failed attempt, in milliseconds
    pub initial_delay_ms: u64,

    /// Added to the delay for each further attempt, in milliseconds
    pub step_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay_ms: 100,
            step_ms: 50,
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt N (0-indexed)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let ms = self
            .initial_delay_ms
            .saturating_add(self.step_ms.saturating_mul(u64::from(attempt)));
        Duration::from_millis(ms)
    }

    /// Total time spent sleeping when every attempt fails
    #[must_use]
    pub fn worst_case_delay(&self) -> Duration {
        (0..self.max_attempts).map(|i| self.delay_for_attempt(i)).sum()
    }
}

/// Transport configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Which transport to use
    pub transport: TransportType,

    /// Dial retry policy
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl TransportConfig {
    /// Configuration for a Unix socket under `base_path`
    pub fn unix(base_path: impl Into<PathBuf>) -> Self {
        Self {
            transport: TransportType::UnixSocket {
                base_path: base_path.into(),
            },
            ..Default::default()
        }
    }

    /// Configuration for loopback TCP on `port`
    #[must_use]
    pub fn loopback(port: u16) -> Self {
        Self {
            transport: TransportType::Loopback { port },
            ..Default::default()
        }
    }

    /// Configuration from the host application's setup values
    ///
    /// `LoopbackOnly` platforms ignore `base_path` and use
    /// [`DEFAULT_LOOPBACK_PORT`].
    pub fn for_platform(base_path: impl Into<PathBuf>, platform: Platform) -> Self {
        match platform {
            Platform::Standard => Self::unix(base_path),
            Platform::LoopbackOnly => Self::loopback(DEFAULT_LOOPBACK_PORT),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CONTROL_TRANSPORT`: "unix", "socket", "loopback", "tcp"
    /// - `CONTROL_BASE_PATH`: Directory holding `command.sock`
    /// - `CONTROL_PORT`: Loopback port
    /// - `CONTROL_RETRY_ATTEMPTS`: Number of dial attempts
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("CONTROL_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOOPBACK_PORT);

        let transport = match lookup("CONTROL_TRANSPORT").map(|v| v.to_lowercase()) {
            Some(ref s) if s == "loopback" || s == "tcp" => TransportType::Loopback { port },
            _ => TransportType::UnixSocket {
                base_path: lookup("CONTROL_BASE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_base_path),
            },
        };

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: lookup("CONTROL_RETRY_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_attempts),
            ..defaults
        };

        Self { transport, retry }
    }

    /// Resolve the daemon endpoint
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        match &self.transport {
            TransportType::UnixSocket { base_path } => Endpoint::Unix(socket_path(base_path)),
            TransportType::Loopback { port } => {
                Endpoint::Tcp(SocketAddr::from((Ipv4Addr::LOCALHOST, *port)))
            }
        }
    }

    /// Check if this is a Unix socket configuration
    #[must_use]
    pub fn is_unix_socket(&self) -> bool {
        matches!(self.transport, TransportType::UnixSocket { .. })
    }

    /// Check if this is a loopback TCP configuration
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        matches!(self.transport, TransportType::Loopback { .. })
    }
}

/// Path of the control socket inside `base_path`
#[must_use]
pub fn socket_path(base_path: &Path) -> PathBuf {
    base_path.join(SOCKET_FILE_NAME)
}

/// Get the default base path
///
/// Uses the XDG runtime directory if available, otherwise `/tmp/control-$UID/`
#[must_use]
pub fn default_base_path() -> PathBuf {
    if let Some(runtime_dir) = dirs::runtime_dir() {
        return runtime_dir.join("control");
    }
    fallback_base_path()
}

#[cfg(unix)]
fn fallback_base_path() -> PathBuf {
    // SAFETY: getuid has no preconditions and cannot fail
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/control-{uid}"))
}

#[cfg(not(unix))]
fn fallback_base_path() -> PathBuf {
    std::env::temp_dir().join("control")
}
