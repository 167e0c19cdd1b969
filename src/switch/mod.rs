//! # Switch Client
//!
//! [`Switch`] holds the in-memory [`Snapshot`] of one SwOS switch and the
//! [`Storage`] it is loaded from and saved to. Resources reach into the
//! snapshot through the lookup helpers below; the engine only ever asks the
//! client to `fetch` or `save` the whole thing.

pub mod snapshot;
pub mod storage;

pub use snapshot::*;
pub use storage::{JsonFile, Storage, StorageError};

use field_sync::{Backend, BackendError, LocateError};
use tracing::info;

/// Lowest and highest VLAN ids the switch accepts.
pub const VLAN_IDS: std::ops::RangeInclusive<u16> = 1..=4094;

pub struct Switch<S> {
    snapshot: Snapshot,
    storage: S,
}

impl<S: Storage> Switch<S> {
    /// Loads the current snapshot from `storage`.
    pub fn connect(mut storage: S) -> Result<Self, StorageError> {
        let snapshot = storage.load()?;
        info!(ports = snapshot.links.len(), vlans = snapshot.vlans.len(), "Switch connected");
        Ok(Self { snapshot, storage })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_parts(self) -> (Snapshot, S) {
        (self.snapshot, self.storage)
    }

    pub fn system_mut(&mut self) -> &mut System {
        &mut self.snapshot.system
    }

    /// Port `id` is 1-based.
    pub fn link_mut(&mut self, id: i64) -> Result<&mut Link, LocateError> {
        let index = self.port_index(id)?;
        Ok(&mut self.snapshot.links[index])
    }

    pub fn forward_mut(&mut self, id: i64) -> Result<&mut PortForward, LocateError> {
        let index = self.port_index(id)?;
        self.snapshot
            .forwarding
            .get_mut(index)
            .ok_or_else(|| LocateError::new(format!("port {id} has no forwarding entry")))
    }

    pub fn vlan_mut(&mut self, id: i64) -> Result<&mut Vlan, LocateError> {
        self.snapshot
            .vlans
            .iter_mut()
            .find(|v| i64::from(v.id) == id)
            .ok_or_else(|| LocateError::new(format!("vlan {id} not found")))
    }

    /// Adds an empty VLAN table entry.
    pub fn add_vlan(&mut self, id: i64) -> Result<&mut Vlan, LocateError> {
        let vid = u16::try_from(id)
            .ok()
            .filter(|vid| VLAN_IDS.contains(vid))
            .ok_or_else(|| {
                LocateError::new(format!(
                    "invalid vlan id {id}, valid ids are [{},{}]",
                    VLAN_IDS.start(),
                    VLAN_IDS.end()
                ))
            })?;
        if self.snapshot.vlans.iter().any(|v| v.id == vid) {
            return Err(LocateError::new(format!("vlan {id} already exists")));
        }
        self.snapshot.vlans.push(Vlan {
            id: vid,
            independent_vlan_lookup: false,
            igmp_snooping: false,
        });
        let last = self.snapshot.vlans.len() - 1;
        Ok(&mut self.snapshot.vlans[last])
    }

    pub fn remove_vlan(&mut self, id: i64) -> Result<(), LocateError> {
        let before = self.snapshot.vlans.len();
        self.snapshot.vlans.retain(|v| i64::from(v.id) != id);
        if self.snapshot.vlans.len() == before {
            return Err(LocateError::new(format!("vlan {id} not found")));
        }
        Ok(())
    }

    fn port_index(&self, id: i64) -> Result<usize, LocateError> {
        let count = self.snapshot.links.len();
        usize::try_from(id)
            .ok()
            .filter(|id| (1..=count).contains(id))
            .map(|id| id - 1)
            .ok_or_else(|| {
                LocateError::new(format!("invalid port id {id}, valid ids are [1,{count}]"))
            })
    }
}

impl<S: Storage> Backend for Switch<S> {
    fn fetch(&mut self) -> Result<(), BackendError> {
        self.snapshot = self
            .storage
            .load()
            .map_err(|e| BackendError::with_source(e.to_string(), e))?;
        Ok(())
    }

    fn save(&mut self) -> Result<(), BackendError> {
        self.storage
            .store(&self.snapshot)
            .map_err(|e| BackendError::with_source(e.to_string(), e))
    }
}
