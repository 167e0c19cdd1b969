//! # Resource Registry
//!
//! Hosts address resources by name and exchange models as JSON. The
//! [`ResourceHandle`] trait erases a controller's model and backend-object
//! types; [`Registry`] keeps the handles in registration order and advertises
//! their schemas.

use crate::backend::Backend;
use crate::client::SessionClient;
use crate::controller::Controller;
use crate::error::SyncError;
use crate::schema::ResourceSchema;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::info;

/// Type-erased lifecycle surface of one resource over backend client `C`.
#[async_trait]
pub trait ResourceHandle<C>: Send + Sync {
    fn name(&self) -> &'static str;

    fn schema(&self, provider: &str) -> ResourceSchema;

    fn configure(&self, session: SessionClient<C>) -> Result<(), SyncError>;

    async fn create(&self, desired: Json) -> Result<Json, SyncError>;

    async fn read(&self, current: Json) -> Result<Json, SyncError>;

    async fn update(&self, desired: Json) -> Result<Json, SyncError>;

    /// Create-or-update as a single session job.
    async fn apply(&self, desired: Json) -> Result<Json, SyncError>;

    async fn delete(&self, current: Json) -> Result<(), SyncError>;
}

#[async_trait]
impl<M, B, C> ResourceHandle<C> for Controller<M, B, C>
where
    M: Serialize + DeserializeOwned + Send + 'static,
    B: 'static,
    C: Backend,
{
    fn name(&self) -> &'static str {
        Controller::name(self)
    }

    fn schema(&self, provider: &str) -> ResourceSchema {
        Controller::schema(self, provider)
    }

    fn configure(&self, session: SessionClient<C>) -> Result<(), SyncError> {
        Controller::configure(self, session)
    }

    async fn create(&self, desired: Json) -> Result<Json, SyncError> {
        let model = self.decode(desired)?;
        let created = Controller::create(self, model).await?;
        self.encode(&created)
    }

    async fn read(&self, current: Json) -> Result<Json, SyncError> {
        let model = self.decode(current)?;
        let current = Controller::read(self, model).await?;
        self.encode(&current)
    }

    async fn update(&self, desired: Json) -> Result<Json, SyncError> {
        let model = self.decode(desired)?;
        let updated = Controller::update(self, model).await?;
        self.encode(&updated)
    }

    async fn apply(&self, desired: Json) -> Result<Json, SyncError> {
        let model = self.decode(desired)?;
        let applied = Controller::apply(self, model).await?;
        self.encode(&applied)
    }

    async fn delete(&self, current: Json) -> Result<(), SyncError> {
        let model = self.decode(current)?;
        Controller::delete(self, model).await
    }
}

impl<M, B, C> Controller<M, B, C>
where
    M: Serialize + DeserializeOwned + Send + 'static,
    B: 'static,
    C: Backend,
{
    fn decode(&self, json: Json) -> Result<M, SyncError> {
        serde_json::from_value(json).map_err(|source| SyncError::Model {
            resource: Controller::name(self).to_string(),
            source,
        })
    }

    fn encode(&self, model: &M) -> Result<Json, SyncError> {
        serde_json::to_value(model).map_err(|source| SyncError::Model {
            resource: Controller::name(self).to_string(),
            source,
        })
    }
}

/// Named resources sharing one backend client type.
pub struct Registry<C> {
    provider: String,
    handles: Vec<Arc<dyn ResourceHandle<C>>>,
}

impl<C: Backend> Registry<C> {
    /// Creates an empty registry. `provider` prefixes every schema type name.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            handles: Vec::new(),
        }
    }

    /// Adds a resource; names must be unique.
    pub fn register(&mut self, handle: Arc<dyn ResourceHandle<C>>) -> Result<(), SyncError> {
        if self.handles.iter().any(|h| h.name() == handle.name()) {
            return Err(SyncError::DuplicateResource(handle.name().to_string()));
        }
        self.handles.push(handle);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ResourceHandle<C>>, SyncError> {
        self.handles
            .iter()
            .find(|h| h.name() == name)
            .cloned()
            .ok_or_else(|| SyncError::UnknownResource(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handles.iter().map(|h| h.name())
    }

    pub fn schemas(&self) -> Vec<ResourceSchema> {
        self.handles
            .iter()
            .map(|h| h.schema(&self.provider))
            .collect()
    }

    /// Binds every registered resource to `session`.
    pub fn configure(&self, session: &SessionClient<C>) -> Result<(), SyncError> {
        for handle in &self.handles {
            handle.configure(session.clone())?;
        }
        info!(provider = %self.provider, resources = self.handles.len(), "Registry configured");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
