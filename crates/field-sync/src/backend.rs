//! The contract the engine needs from a device client.

use crate::error::BackendError;

/// A device client holding an in-memory snapshot of the device configuration.
///
/// Resources reach into the snapshot through their `locate`/`create`
/// callbacks, which are written against the concrete client type. The engine
/// itself only needs to refresh and persist the whole snapshot.
pub trait Backend: Send + 'static {
    /// Replaces the in-memory snapshot with the device's current state.
    fn fetch(&mut self) -> Result<(), BackendError>;

    /// Persists the entire in-memory snapshot in one shot.
    fn save(&mut self) -> Result<(), BackendError>;
}
