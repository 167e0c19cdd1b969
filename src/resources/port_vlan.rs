//! Per-port VLAN handling, backed by the port's forwarding entry.

use crate::switch::{PortForward, Storage, Switch, VlanHeader, VlanMode, VlanReceive, VLAN_IDS};
use field_sync::{EnumMap, Flag, Integer, LocateError, Resource, SyncedField, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortVlanConfig {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub port: Value<i64>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub mode: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub receive: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub default_vlan_id: Value<i64>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub force_vlan_id: Value<bool>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub header: Value<String>,
}

impl PortVlanConfig {
    pub fn new(port: i64) -> Self {
        Self {
            port: Value::Known(port),
            ..Default::default()
        }
    }
}

pub fn vlan_modes() -> EnumMap<VlanMode> {
    EnumMap::new([
        ("disabled", VlanMode::DISABLED),
        ("optional", VlanMode::OPTIONAL),
        ("enabled", VlanMode::ENABLED),
        ("strict", VlanMode::STRICT),
    ])
}

pub fn vlan_receive() -> EnumMap<VlanReceive> {
    EnumMap::new([
        ("any", VlanReceive::ANY),
        ("tagged", VlanReceive::TAGGED),
        ("untagged", VlanReceive::UNTAGGED),
    ])
}

pub fn vlan_headers() -> EnumMap<VlanHeader> {
    EnumMap::new([
        ("leave_as_is", VlanHeader::LEAVE_AS_IS),
        ("strip", VlanHeader::STRIP),
        ("add_if_missing", VlanHeader::ADD_IF_MISSING),
    ])
}

fn forward<'c, S: Storage>(
    client: &'c mut Switch<S>,
    model: &PortVlanConfig,
) -> Result<&'c mut PortForward, LocateError> {
    client.forward_mut(model.port.as_known().copied().unwrap_or_default())
}

pub fn resource<S: Storage>() -> Resource<PortVlanConfig, PortForward, Switch<S>> {
    Resource::new("port_vlan", forward::<S>)
        .describe("Port VLAN configuration")
        .field(
            SyncedField::key("port", |m: &mut PortVlanConfig| &mut m.port, Integer::<u8>::bounded(1, u8::MAX))
                .describe("Port Id"),
        )
        .field(
            SyncedField::attribute(
                "mode",
                |f: &mut PortForward| &mut f.vlan_mode,
                |m: &mut PortVlanConfig| &mut m.mode,
                vlan_modes(),
            )
            .describe("VLAN Mode"),
        )
        .field(
            SyncedField::attribute(
                "receive",
                |f: &mut PortForward| &mut f.vlan_receive,
                |m: &mut PortVlanConfig| &mut m.receive,
                vlan_receive(),
            )
            .describe("VLAN Receive"),
        )
        .field(
            SyncedField::attribute(
                "default_vlan_id",
                |f: &mut PortForward| &mut f.default_vlan_id,
                |m: &mut PortVlanConfig| &mut m.default_vlan_id,
                Integer::bounded(*VLAN_IDS.start(), *VLAN_IDS.end()),
            )
            .describe("Default VLAN Id"),
        )
        .field(
            SyncedField::attribute(
                "force_vlan_id",
                |f: &mut PortForward| &mut f.force_vlan_id,
                |m: &mut PortVlanConfig| &mut m.force_vlan_id,
                Flag,
            )
            .describe("Force VLAN Id"),
        )
        .field(
            SyncedField::attribute(
                "header",
                |f: &mut PortForward| &mut f.vlan_header,
                |m: &mut PortVlanConfig| &mut m.header,
                vlan_headers(),
            )
            .describe("VLAN Header"),
        )
}
