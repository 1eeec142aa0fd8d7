//! Configuration File Support
//!
//! Loads client and transport settings from a TOML file, then applies
//! command-line overrides on top.
//!
//! # File Location
//!
//! `$XDG_CONFIG_HOME/control/config.toml` (see [`default_config_path`]).
//! A missing file is not an error; defaults are used instead.
//!
//! # Example
//!
//! ```toml
//! [client]
//! command = "status"
//! status_interval_secs = 2
//! notify_disconnect = true
//!
//! [transport]
//! base_path = "/run/box"
//! platform = "standard"      # or "loopback-only"
//! port = 8964                # loopback-only
//!
//! [transport.retry]
//! max_attempts = 10
//! initial_delay_ms = 100
//! step_ms = 50
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ControlClientConfig;
use crate::transport::{
    default_base_path, Platform, RetryPolicy, TransportConfig, TransportType,
    DEFAULT_LOOPBACK_PORT,
};

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read config {path:?}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where the loaded configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults; no file found
    Default,
    /// Loaded from this file
    File(PathBuf),
}

/// `[transport]` table
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSection {
    /// Directory holding `command.sock`
    pub base_path: Option<PathBuf>,

    /// Platform capability flag
    pub platform: Platform,

    /// Loopback port, used when `platform = "loopback-only"`
    pub port: Option<u16>,

    /// Dial retry policy
    pub retry: RetryPolicy,
}

impl TransportSection {
    /// Resolve into a [`TransportConfig`]
    #[must_use]
    pub fn to_transport_config(&self) -> TransportConfig {
        let transport = match self.platform {
            Platform::Standard => TransportType::UnixSocket {
                base_path: self.base_path.clone().unwrap_or_else(default_base_path),
            },
            Platform::LoopbackOnly => TransportType::Loopback {
                port: self.port.unwrap_or(DEFAULT_LOOPBACK_PORT),
            },
        };

        TransportConfig {
            transport,
            retry: self.retry,
        }
    }
}

/// Full configuration file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlToml {
    /// `[client]` table
    pub client: ControlClientConfig,

    /// `[transport]` table
    pub transport: TransportSection,
}

impl ControlToml {
    /// Parse from TOML text
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the text does not match the schema.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Check values that parse but make no sense
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a non-positive status interval or
    /// a retry policy with no attempts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client.status_interval_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "status_interval_secs must be positive, got {}",
                self.client.status_interval_secs
            )));
        }
        if self.transport.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.transport.port == Some(0) {
            return Err(ConfigError::Invalid("port must be non-zero".into()));
        }
        Ok(())
    }

    /// Split into the client and transport configurations
    #[must_use]
    pub fn into_parts(self) -> (ControlClientConfig, TransportConfig) {
        let transport = self.transport.to_transport_config();
        (self.client, transport)
    }
}

/// Command-line overrides applied on top of the file
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Override `transport.base_path`
    pub base_path: Option<PathBuf>,
    /// Override `transport.platform`
    pub platform: Option<Platform>,
    /// Override `transport.port`
    pub port: Option<u16>,
    /// Override `client.status_interval_secs`
    pub status_interval_secs: Option<i64>,
    /// Override `client.notify_disconnect`
    pub notify_disconnect: Option<bool>,
}

impl ConfigOverrides {
    /// Apply every set override to `config`
    pub fn apply(&self, config: &mut ControlToml) {
        if let Some(ref base_path) = self.base_path {
            config.transport.base_path = Some(base_path.clone());
        }
        if let Some(platform) = self.platform {
            config.transport.platform = platform;
        }
        if let Some(port) = self.port {
            config.transport.port = Some(port);
        }
        if let Some(interval) = self.status_interval_secs {
            config.client.status_interval_secs = interval;
        }
        if let Some(notify) = self.notify_disconnect {
            config.client.notify_disconnect = notify;
        }
    }
}

/// Get the default config file path
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("control").join("config.toml"))
}

/// Load configuration from a specific file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed or validated.
pub fn load_config_from_path(path: &Path) -> Result<ControlToml, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = ControlToml::parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    tracing::debug!(path = ?path, "Loaded config file");
    Ok(config)
}

/// Load configuration from `path`, or the default location, or defaults
///
/// An explicit `path` must exist. The default location is optional.
///
/// # Errors
///
/// Returns `ConfigError` if a file is found but cannot be loaded.
pub fn load_config(path: Option<&Path>) -> Result<(ControlToml, ConfigSource), ConfigError> {
    if let Some(path) = path {
        let config = load_config_from_path(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_config_from_path(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        _ => Ok((ControlToml::default(), ConfigSource::Default)),
    }
}
