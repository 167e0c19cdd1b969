//! VLAN table entries. Unlike ports these are created and removed.

use crate::switch::{Storage, Switch, Vlan, VLAN_IDS};
use field_sync::{Flag, Integer, LocateError, Resource, SyncedField, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VlanConfig {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<i64>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub independent_vlan_lookup: Value<bool>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub igmp_snooping: Value<bool>,
}

impl VlanConfig {
    pub fn new(id: i64) -> Self {
        Self {
            id: Value::Known(id),
            ..Default::default()
        }
    }

    fn vid(&self) -> i64 {
        self.id.as_known().copied().unwrap_or_default()
    }
}

fn entry<'c, S: Storage>(
    client: &'c mut Switch<S>,
    model: &VlanConfig,
) -> Result<&'c mut Vlan, LocateError> {
    client.vlan_mut(model.vid())
}

fn insert<'c, S: Storage>(
    client: &'c mut Switch<S>,
    model: &VlanConfig,
) -> Result<&'c mut Vlan, LocateError> {
    client.add_vlan(model.vid())
}

fn remove<S: Storage>(client: &mut Switch<S>, model: &VlanConfig) -> Result<(), LocateError> {
    client.remove_vlan(model.vid())
}

pub fn resource<S: Storage>() -> Resource<VlanConfig, Vlan, Switch<S>> {
    Resource::new("vlan", entry::<S>)
        .describe("VLAN configuration")
        .create_with(insert::<S>)
        .delete_with(remove::<S>)
        .field(
            SyncedField::key(
                "id",
                |m: &mut VlanConfig| &mut m.id,
                Integer::bounded(*VLAN_IDS.start(), *VLAN_IDS.end()),
            )
            .describe("Vlan Id"),
        )
        .field(
            SyncedField::attribute(
                "independent_vlan_lookup",
                |v: &mut Vlan| &mut v.independent_vlan_lookup,
                |m: &mut VlanConfig| &mut m.independent_vlan_lookup,
                Flag,
            )
            .describe("Independent Vlan Lookup"),
        )
        .field(
            SyncedField::attribute(
                "igmp_snooping",
                |v: &mut Vlan| &mut v.igmp_snooping,
                |m: &mut VlanConfig| &mut m.igmp_snooping,
                Flag,
            )
            .describe("IGMP Snooping"),
        )
}
