//! Where a switch snapshot lives between runs.

use super::snapshot::Snapshot;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Unavailable(String),
}

/// Loads and persists a whole [`Snapshot`] at once.
pub trait Storage: Send + 'static {
    fn load(&mut self) -> Result<Snapshot, StorageError>;

    fn store(&mut self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

/// Snapshot kept as pretty-printed JSON on disk.
///
/// A missing file reads as a factory-default switch with `ports` ports.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    ports: usize,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>, ports: usize) -> Self {
        Self {
            path: path.into(),
            ports,
        }
    }

    fn io(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for JsonFile {
    fn load(&mut self) -> Result<Snapshot, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), ports = self.ports, "No snapshot, using factory defaults");
                return Ok(Snapshot::factory(self.ports));
            }
            Err(e) => return Err(self.io(e)),
        };
        let snapshot = serde_json::from_str(&content).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Loaded snapshot");
        Ok(snapshot)
    }

    fn store(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(snapshot).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io(e))?;
        }
        // Atomic replace.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, content).map_err(|e| self.io(e))?;
        fs::rename(&staging, &self.path).map_err(|e| self.io(e))?;
        debug!(path = %self.path.display(), "Stored snapshot");
        Ok(())
    }
}
