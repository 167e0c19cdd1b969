//! Provider configuration loaded from a TOML file.
//!
//! ```toml
//! [device]
//! snapshot_path = "/var/lib/swos/switch.json"
//! ports = 8
//!
//! [session]
//! buffer_size = 32
//!
//! [log]
//! filter = "info"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Largest switch the factory snapshot can describe.
pub const MAX_PORTS: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// File the switch snapshot is loaded from and saved to
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Port count of a factory-default snapshot
    #[serde(default = "default_ports")]
    pub ports: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Requests queued for the session before callers wait
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("swos-snapshot.json")
}

fn default_ports() -> usize {
    8
}

fn default_buffer_size() -> usize {
    32
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            ports: default_ports(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PORTS).contains(&self.device.ports) {
            return Err(ConfigError::Invalid {
                key: "device.ports",
                message: format!("must be 1-{MAX_PORTS}, got {}", self.device.ports),
            });
        }

        if self.device.snapshot_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "device.snapshot_path",
                message: "must not be empty".to_string(),
            });
        }

        if self.session.buffer_size == 0 {
            return Err(ConfigError::Invalid {
                key: "session.buffer_size",
                message: "must be > 0".to_string(),
            });
        }

        Ok(())
    }
}
