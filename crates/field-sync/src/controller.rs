//! # Resource Lifecycle Controller
//!
//! A `Controller` pairs an immutable [`Resource`] descriptor with the
//! [`SessionClient`] of the backend it reconciles against. It starts
//! unconfigured; the host hands it a session exactly once via
//! [`Controller::configure`], after which the four lifecycle operations are
//! available.
//!
//! Each operation is shipped to the session as a single job, so the whole
//! `locate → mutate → persist` sequence runs with exclusive access to the
//! client.

use crate::backend::Backend;
use crate::client::SessionClient;
use crate::error::SyncError;
use crate::resource::Resource;
use crate::schema::ResourceSchema;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

pub struct Controller<M, B, C> {
    resource: Arc<Resource<M, B, C>>,
    session: OnceLock<SessionClient<C>>,
}

impl<M, B, C> Controller<M, B, C>
where
    M: Send + 'static,
    B: 'static,
    C: Backend,
{
    pub fn new(resource: Resource<M, B, C>) -> Self {
        Self {
            resource: Arc::new(resource),
            session: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.resource.name()
    }

    pub fn schema(&self, provider: &str) -> ResourceSchema {
        self.resource.schema(provider)
    }

    pub fn is_configured(&self) -> bool {
        self.session.get().is_some()
    }

    /// Binds the controller to a session. Accepted exactly once.
    pub fn configure(&self, session: SessionClient<C>) -> Result<(), SyncError> {
        self.session
            .set(session)
            .map_err(|_| SyncError::AlreadyConfigured {
                resource: self.name().to_string(),
            })?;
        info!(resource = self.name(), "Configured");
        Ok(())
    }

    pub async fn create(&self, desired: M) -> Result<M, SyncError> {
        let resource = self.resource.clone();
        self.session()?
            .execute("create", move |client| resource.create(client, desired))
            .await?
    }

    pub async fn read(&self, current: M) -> Result<M, SyncError> {
        let resource = self.resource.clone();
        self.session()?
            .execute("read", move |client| resource.read(client, current))
            .await?
    }

    pub async fn update(&self, desired: M) -> Result<M, SyncError> {
        let resource = self.resource.clone();
        self.session()?
            .execute("update", move |client| resource.update(client, desired))
            .await?
    }

    /// Creates or updates in one job, so concurrent applies of a new object
    /// never race on its creation.
    pub async fn apply(&self, desired: M) -> Result<M, SyncError> {
        let resource = self.resource.clone();
        self.session()?
            .execute("apply", move |client| resource.apply(client, desired))
            .await?
    }

    pub async fn delete(&self, current: M) -> Result<(), SyncError> {
        let resource = self.resource.clone();
        self.session()?
            .execute("delete", move |client| resource.delete(client, current))
            .await?
    }

    /// Reloads the backend snapshot before reconciling against it.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.session()?
            .fetch()
            .await?
            .map_err(|source| SyncError::Fetch {
                resource: self.name().to_string(),
                source,
            })?;
        debug!(resource = self.name(), "Refreshed");
        Ok(())
    }

    fn session(&self) -> Result<&SessionClient<C>, SyncError> {
        self.session.get().ok_or_else(|| SyncError::Unconfigured {
            resource: self.name().to_string(),
        })
    }
}
