//! Switch-wide settings.

use crate::switch::{Storage, Switch, System};
use field_sync::{LocateError, Resource, SyncedField, Text, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default, skip_serializing_if = "Value::is_unknown")]
    pub identity: Value<String>,
}

fn system<'c, S: Storage>(
    client: &'c mut Switch<S>,
    _: &SystemConfig,
) -> Result<&'c mut System, LocateError> {
    Ok(client.system_mut())
}

pub fn resource<S: Storage>() -> Resource<SystemConfig, System, Switch<S>> {
    Resource::new("system", system::<S>)
        .describe("SwOS general configuration")
        .field(
            SyncedField::attribute(
                "identity",
                |s: &mut System| &mut s.identity,
                |m: &mut SystemConfig| &mut m.identity,
                Text,
            )
            .describe("Switch identity"),
        )
}
