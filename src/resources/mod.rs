//! The SwOS resource catalog.
//!
//! Each submodule declares one resource: its model type and a `resource()`
//! constructor describing how the model maps onto the switch snapshot.
//! [`catalog`] wraps all of them in controllers and registers them.

pub mod port;
pub mod port_vlan;
pub mod system;
pub mod vlan;

pub use port::PortConfig;
pub use port_vlan::PortVlanConfig;
pub use system::SystemConfig;
pub use vlan::VlanConfig;

use crate::switch::{Storage, Switch};
use field_sync::{Controller, Registry, SyncError};
use std::sync::Arc;

/// Prefix of every advertised resource type name.
pub const PROVIDER: &str = "swos";

/// Registry holding every catalog resource, not yet bound to a session.
pub fn catalog<S: Storage>() -> Result<Registry<Switch<S>>, SyncError> {
    let mut registry = Registry::new(PROVIDER);
    registry.register(Arc::new(Controller::new(port::resource::<S>())))?;
    registry.register(Arc::new(Controller::new(port_vlan::resource::<S>())))?;
    registry.register(Arc::new(Controller::new(vlan::resource::<S>())))?;
    registry.register(Arc::new(Controller::new(system::resource::<S>())))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switch::JsonFile;
    use field_sync::{AttributeKind, Shape};

    #[test]
    fn test_catalog_schemas() {
        let registry = catalog::<JsonFile>().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["port", "port_vlan", "vlan", "system"]);

        let schemas = registry.schemas();
        let types: Vec<_> = schemas.iter().map(|s| s.type_name.as_str()).collect();
        assert_eq!(types, ["swos_port", "swos_port_vlan", "swos_vlan", "swos_system"]);

        let port_vlan = &schemas[1];
        assert_eq!(port_vlan.attribute("port").unwrap().shape, Shape::Required);
        assert_eq!(
            port_vlan.attribute("header").unwrap().kind,
            AttributeKind::Enum {
                values: vec!["leave_as_is".into(), "strip".into(), "add_if_missing".into()]
            }
        );
        assert_eq!(
            port_vlan.attribute("default_vlan_id").unwrap().kind,
            AttributeKind::Int { min: 1, max: 4094 }
        );
        assert_eq!(
            schemas[0].attribute("poe_out").unwrap().shape,
            Shape::OptionalComputed
        );
    }

    #[test]
    fn test_enum_maps_cover_their_domains() {
        use field_sync::Converter;

        fn round_trips<T: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static>(
            map: field_sync::EnumMap<T>,
        ) {
            for code in map.codes().cloned().collect::<Vec<_>>() {
                let label = map.to_model(&code).unwrap();
                assert_eq!(map.from_model(&label).unwrap(), code);
            }
        }

        round_trips(port::poe_modes());
        round_trips(port_vlan::vlan_modes());
        round_trips(port_vlan::vlan_receive());
        round_trips(port_vlan::vlan_headers());
    }
}
