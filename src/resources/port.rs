//! Physical port settings. Ports always exist; deleting one only persists.

use crate::switch::{Link, PoeMode, Storage, Switch};
use field_sync::{EnumMap, Flag, Integer, LocateError, Resource, SyncedField, Text, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortConfig {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub id: Value<i64>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub name: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub enabled: Value<bool>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub flow_control: Value<bool>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub poe_out: Value<String>,
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub poe_priority: Value<i64>,
}

impl PortConfig {
    pub fn new(id: i64) -> Self {
        Self {
            id: Value::Known(id),
            ..Default::default()
        }
    }
}

pub fn poe_modes() -> EnumMap<PoeMode> {
    EnumMap::new([
        ("off", PoeMode::OFF),
        ("auto", PoeMode::AUTO),
        ("on", PoeMode::ON),
        ("calib", PoeMode::CALIB),
    ])
}

fn link<'c, S: Storage>(
    client: &'c mut Switch<S>,
    model: &PortConfig,
) -> Result<&'c mut Link, LocateError> {
    client.link_mut(model.id.as_known().copied().unwrap_or_default())
}

pub fn resource<S: Storage>() -> Resource<PortConfig, Link, Switch<S>> {
    Resource::new("port", link::<S>)
        .describe("Port configuration")
        .field(
            SyncedField::key("id", |m: &mut PortConfig| &mut m.id, Integer::<u8>::bounded(1, u8::MAX))
                .describe("Port Id"),
        )
        .field(
            SyncedField::attribute(
                "name",
                |l: &mut Link| &mut l.name,
                |m: &mut PortConfig| &mut m.name,
                Text,
            )
            .describe("Port Name"),
        )
        .field(
            SyncedField::attribute(
                "enabled",
                |l: &mut Link| &mut l.enabled,
                |m: &mut PortConfig| &mut m.enabled,
                Flag,
            )
            .describe("Port enabled"),
        )
        .field(
            SyncedField::attribute(
                "flow_control",
                |l: &mut Link| &mut l.flow_control,
                |m: &mut PortConfig| &mut m.flow_control,
                Flag,
            )
            .describe("Flow control"),
        )
        .field(
            SyncedField::attribute(
                "poe_out",
                |l: &mut Link| &mut l.poe_mode,
                |m: &mut PortConfig| &mut m.poe_out,
                poe_modes(),
            )
            .describe("PoE Out"),
        )
        .field(
            SyncedField::attribute(
                "poe_priority",
                |l: &mut Link| &mut l.poe_priority,
                |m: &mut PortConfig| &mut m.poe_priority,
                Integer::<u8>::new(),
            )
            .describe("PoE priority"),
        )
}
