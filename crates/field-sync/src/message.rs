//! # Session Messages
//!
//! Requests sent from a [`SessionClient`](crate::SessionClient) to the
//! [`Session`](crate::Session) that owns the backend client.

use crate::error::BackendError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the session.
pub type Response<T> = oneshot::Sender<T>;

/// A unit of work run against the backend client with exclusive access.
///
/// The job carries its own response channel; the session only runs it.
pub type Job<C> = Box<dyn FnOnce(&mut C) + Send>;

/// Internal message type sent to the session.
///
/// - **Execute**: runs one lifecycle operation (`locate → mutate → persist`)
///   to completion before the next request is looked at.
/// - **Fetch**: replaces the client's snapshot with the device state.
pub enum SessionRequest<C> {
    Execute {
        operation: &'static str,
        job: Job<C>,
    },
    Fetch {
        respond_to: Response<Result<(), BackendError>>,
    },
}

impl<C> std::fmt::Debug for SessionRequest<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Execute { operation, .. } => f
                .debug_struct("Execute")
                .field("operation", operation)
                .finish_non_exhaustive(),
            Self::Fetch { .. } => f.debug_struct("Fetch").finish_non_exhaustive(),
        }
    }
}
