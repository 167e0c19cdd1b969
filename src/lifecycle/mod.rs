//! Host-side wiring: connects the switch, starts its session and binds the
//! resource catalog to it.

pub mod tracing;

use crate::config::{Config, ConfigError};
use crate::resources;
use crate::switch::{JsonFile, Storage, StorageError, Switch};
use field_sync::{Registry, ResourceHandle, Session, SessionClient, SyncError};
use serde_json::Value as Json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use ::tracing::{error, info};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A running switch session with the catalog bound to it.
///
/// ```ignore
/// let provider = Provider::open(&config)?;
/// let port = provider.apply("port", json!({ "id": 3, "name": "uplink" })).await?;
/// provider.shutdown().await?;
/// ```
pub struct Provider<S: Storage> {
    registry: Registry<Switch<S>>,
    session: SessionClient<Switch<S>>,
    handle: JoinHandle<Switch<S>>,
}

impl Provider<JsonFile> {
    /// Connects to the snapshot file named in `config`.
    pub fn open(config: &Config) -> Result<Self, ProviderError> {
        config.validate()?;
        let storage = JsonFile::new(&config.device.snapshot_path, config.device.ports);
        let switch = Switch::connect(storage)?;
        Ok(Self::start(switch, config.session.buffer_size)?)
    }
}

impl<S: Storage> Provider<S> {
    /// Spawns the session owning `switch` and configures every catalog resource.
    pub fn start(switch: Switch<S>, buffer_size: usize) -> Result<Self, SyncError> {
        let (session, client) = Session::new(switch, buffer_size);
        let handle = tokio::spawn(session.run());

        let registry = resources::catalog::<S>()?;
        registry.configure(&client)?;

        Ok(Self {
            registry,
            session: client,
            handle,
        })
    }

    pub fn registry(&self) -> &Registry<Switch<S>> {
        &self.registry
    }

    pub fn resource(&self, name: &str) -> Result<Arc<dyn ResourceHandle<Switch<S>>>, SyncError> {
        self.registry.get(name)
    }

    /// Creates the resource, or updates it when it already exists on the switch.
    pub async fn apply(&self, name: &str, desired: Json) -> Result<Json, SyncError> {
        self.resource(name)?.apply(desired).await
    }

    /// Reloads the switch snapshot from storage.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.session
            .fetch()
            .await?
            .map_err(|source| SyncError::Fetch {
                resource: resources::PROVIDER.to_string(),
                source,
            })
    }

    /// Closes the session and waits for it, handing back the switch.
    ///
    /// The session stops once every handle is gone. Handles obtained from
    /// [`Provider::resource`] must be dropped before calling this.
    pub async fn shutdown(self) -> Result<Switch<S>, ProviderError> {
        info!("Shutting down provider...");
        drop(self.registry);
        drop(self.session);

        match self.handle.await {
            Ok(switch) => {
                info!("Provider shutdown complete.");
                Ok(switch)
            }
            Err(e) => {
                error!(error = %e, "Session task failed");
                Err(e.into())
            }
        }
    }
}
