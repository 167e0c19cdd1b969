//! # Session Client
//!
//! Cloneable handle for shipping work to a [`Session`](crate::Session).

use crate::error::{BackendError, SessionError};
use crate::message::SessionRequest;
use tokio::sync::{mpsc, oneshot};

/// A type-safe handle to the session owning a backend client of type `C`.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across
/// tasks. The session shuts down once the last handle is dropped.
pub struct SessionClient<C> {
    sender: mpsc::Sender<SessionRequest<C>>,
}

impl<C> Clone for SessionClient<C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<C: Send + 'static> SessionClient<C> {
    pub fn new(sender: mpsc::Sender<SessionRequest<C>>) -> Self {
        Self { sender }
    }

    /// Runs `f` with exclusive access to the client and returns its result.
    pub async fn execute<R, F>(&self, operation: &'static str, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut C) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (respond_to, response) = oneshot::channel();
        let job = Box::new(move |client: &mut C| {
            let _ = respond_to.send(f(client));
        });
        self.sender
            .send(SessionRequest::Execute { operation, job })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Dropped)
    }

    /// Refreshes the client's snapshot from the device.
    pub async fn fetch(&self) -> Result<Result<(), BackendError>, SessionError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionRequest::Fetch { respond_to })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Dropped)
    }
}
