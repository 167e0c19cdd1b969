//! # Resource Descriptors
//!
//! A [`Resource`] is the declarative description of one synchronizable
//! configuration entity: a name, an ordered list of [`Field`] descriptors,
//! the callbacks that find the backend object for a model, and whether the
//! entity can be deleted on the device at all.
//!
//! The lifecycle methods on `Resource` are the synchronous reconciliation
//! protocol. They borrow the backend client for the duration of one call and
//! never keep references into it.
//!
//! | Operation | Lookup   | Fields | Persist |
//! |-----------|----------|--------|---------|
//! | create    | `create` | sync   | yes     |
//! | read      | `locate` | read   | no      |
//! | update    | `locate` | sync   | yes     |
//! | apply     | `locate`, else `create` | sync | yes |
//! | delete    | delete policy | - | yes     |
//!
//! A failed save does not roll back fields already applied to the snapshot.
//! The snapshot keeps the new values until the next successful save or fetch.

use crate::backend::Backend;
use crate::error::{LocateError, SyncError};
use crate::field::Field;
use crate::schema::{ResourceSchema, Shape};
use tracing::{debug, error, info, warn};

/// Resolves the backend object identified by a model's key fields.
pub type Locate<C, M, B> = for<'c, 'm> fn(&'c mut C, &'m M) -> Result<&'c mut B, LocateError>;

/// Removes the backend object identified by a model's key fields.
pub type Remove<C, M> = fn(&mut C, &M) -> Result<(), LocateError>;

/// What deleting a resource means on the device.
pub enum DeletePolicy<C, M> {
    /// The entity always exists on the device (e.g. a physical port); deleting
    /// only persists the snapshot.
    Noop,
    /// The entity is removed from the snapshot before persisting.
    Remove(Remove<C, M>),
}

pub struct Resource<M, B, C> {
    name: &'static str,
    description: &'static str,
    fields: Vec<Box<dyn Field<M, B>>>,
    locate: Locate<C, M, B>,
    create: Locate<C, M, B>,
    delete: DeletePolicy<C, M>,
}

impl<M: 'static, B: 'static, C: Backend> Resource<M, B, C> {
    /// Starts a resource whose backend objects always exist.
    ///
    /// `create` defaults to `locate` and deleting is a no-op until overridden.
    pub fn new(name: &'static str, locate: Locate<C, M, B>) -> Self {
        Self {
            name,
            description: "",
            fields: Vec::new(),
            locate,
            create: locate,
            delete: DeletePolicy::Noop,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Appends a field. Fields are synchronized in the order they are added.
    pub fn field(mut self, field: impl Field<M, B> + 'static) -> Self {
        debug_assert!(
            self.fields.iter().all(|f| f.name() != field.name()),
            "duplicate field name"
        );
        self.fields.push(Box::new(field));
        self
    }

    pub fn create_with(mut self, create: Locate<C, M, B>) -> Self {
        self.create = create;
        self
    }

    pub fn delete_with(mut self, remove: Remove<C, M>) -> Self {
        self.delete = DeletePolicy::Remove(remove);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn deletes(&self) -> bool {
        matches!(self.delete, DeletePolicy::Remove(_))
    }

    pub fn schema(&self, provider: &str) -> ResourceSchema {
        ResourceSchema {
            type_name: format!("{provider}_{}", self.name),
            description: self.description.to_string(),
            attributes: self.fields.iter().map(|f| f.schema()).collect(),
        }
    }

    /// Finds the new backend object, applies the desired model and persists.
    pub fn create(&self, client: &mut C, mut desired: M) -> Result<M, SyncError> {
        self.validate(&mut desired)?;
        let backend = (self.create)(client, &desired).map_err(|source| {
            warn!(resource = self.name, error = %source, "create failed");
            SyncError::Create {
                resource: self.name.to_string(),
                source,
            }
        })?;
        self.sync_fields(backend, &mut desired)?;
        self.save(client)?;
        info!(resource = self.name, "Created");
        Ok(desired)
    }

    /// Refreshes every field of `current` from the backend object.
    pub fn read(&self, client: &mut C, mut current: M) -> Result<M, SyncError> {
        self.validate_keys(&mut current)?;
        let backend = self.locate(client, &current)?;
        for field in &self.fields {
            field
                .read(backend, &mut current)
                .map_err(|e| self.field_error(field.as_ref(), e))?;
        }
        debug!(resource = self.name, "Read");
        Ok(current)
    }

    /// Applies the desired model to the existing backend object and persists.
    pub fn update(&self, client: &mut C, mut desired: M) -> Result<M, SyncError> {
        self.validate(&mut desired)?;
        let backend = self.locate(client, &desired)?;
        self.sync_fields(backend, &mut desired)?;
        self.save(client)?;
        info!(resource = self.name, "Updated");
        Ok(desired)
    }

    /// Updates the backend object when `locate` finds it, creates it otherwise.
    ///
    /// Existence is decided by `locate` alone; no field is read first.
    pub fn apply(&self, client: &mut C, mut desired: M) -> Result<M, SyncError> {
        self.validate(&mut desired)?;
        let created = match (self.locate)(client, &desired) {
            Ok(backend) => {
                self.sync_fields(backend, &mut desired)?;
                false
            }
            Err(missing) => {
                debug!(resource = self.name, reason = %missing, "not found, creating");
                let backend = (self.create)(client, &desired).map_err(|source| {
                    warn!(resource = self.name, error = %source, "create failed");
                    SyncError::Create {
                        resource: self.name.to_string(),
                        source,
                    }
                })?;
                self.sync_fields(backend, &mut desired)?;
                true
            }
        };
        self.save(client)?;
        info!(resource = self.name, created, "Applied");
        Ok(desired)
    }

    /// Runs the delete policy and persists, even when deleting is a no-op.
    pub fn delete(&self, client: &mut C, mut current: M) -> Result<(), SyncError> {
        self.validate_keys(&mut current)?;
        match &self.delete {
            DeletePolicy::Noop => debug!(resource = self.name, "nothing to delete on device"),
            DeletePolicy::Remove(remove) => remove(client, &current).map_err(|source| {
                warn!(resource = self.name, error = %source, "delete failed");
                SyncError::Delete {
                    resource: self.name.to_string(),
                    source,
                }
            })?,
        }
        self.save(client)?;
        info!(resource = self.name, "Deleted");
        Ok(())
    }

    fn locate<'c>(&self, client: &'c mut C, model: &M) -> Result<&'c mut B, SyncError> {
        (self.locate)(client, model).map_err(|source| {
            warn!(resource = self.name, error = %source, "locate failed");
            SyncError::Get {
                resource: self.name.to_string(),
                source,
            }
        })
    }

    fn validate(&self, model: &mut M) -> Result<(), SyncError> {
        for field in &self.fields {
            field
                .validate(model)
                .map_err(|e| self.field_error(field.as_ref(), e))?;
        }
        Ok(())
    }

    fn validate_keys(&self, model: &mut M) -> Result<(), SyncError> {
        for field in self.fields.iter().filter(|f| f.shape() == Shape::Required) {
            field
                .validate(model)
                .map_err(|e| self.field_error(field.as_ref(), e))?;
        }
        Ok(())
    }

    fn sync_fields(&self, backend: &mut B, model: &mut M) -> Result<(), SyncError> {
        for field in &self.fields {
            field
                .sync(backend, model)
                .map_err(|e| self.field_error(field.as_ref(), e))?;
        }
        Ok(())
    }

    fn save(&self, client: &mut C) -> Result<(), SyncError> {
        client.save().map_err(|source| {
            warn!(resource = self.name, error = %source, "save failed, snapshot keeps applied values");
            SyncError::Save {
                resource: self.name.to_string(),
                source,
            }
        })
    }

    fn field_error(&self, field: &dyn Field<M, B>, err: crate::error::ConvertError) -> SyncError {
        let err = SyncError::convert(self.name, field.name(), err);
        if err.is_fatal() {
            error!(resource = self.name, field = field.name(), error = %err, "unrepresentable backend value");
        } else {
            warn!(resource = self.name, field = field.name(), error = %err, "validation failed");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{EnumMap, Flag, Integer, Text};
    use crate::field::SyncedField;
    use crate::mock::MockBackend;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Link {
        name: String,
        enabled: bool,
        poe: u8,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct PortModel {
        id: Value<i64>,
        name: Value<String>,
        enabled: Value<bool>,
        poe_out: Value<String>,
    }

    type Links = MockBackend<Vec<Link>>;

    fn port<'c>(client: &'c mut Links, model: &PortModel) -> Result<&'c mut Link, LocateError> {
        let id = model.id.as_known().copied().unwrap_or_default();
        let count = client.state.len();
        usize::try_from(id - 1)
            .ok()
            .and_then(|index| client.state.get_mut(index))
            .ok_or_else(|| LocateError::new(format!("invalid port id {id}, valid ids are [1,{count}]")))
    }

    fn resource() -> Resource<PortModel, Link, Links> {
        Resource::new("port", port)
            .describe("Port configuration")
            .field(SyncedField::key("id", |m: &mut PortModel| &mut m.id, Integer::<u8>::new()))
            .field(SyncedField::attribute(
                "name",
                |l: &mut Link| &mut l.name,
                |m: &mut PortModel| &mut m.name,
                Text,
            ))
            .field(SyncedField::attribute(
                "enabled",
                |l: &mut Link| &mut l.enabled,
                |m: &mut PortModel| &mut m.enabled,
                Flag,
            ))
            .field(SyncedField::attribute(
                "poe_out",
                |l: &mut Link| &mut l.poe,
                |m: &mut PortModel| &mut m.poe_out,
                EnumMap::new([("off", 0u8), ("auto", 1u8), ("on", 2u8)]),
            ))
    }

    fn links() -> Links {
        MockBackend::new(
            (1..=4)
                .map(|i| Link {
                    name: format!("ether{i}"),
                    enabled: true,
                    poe: 1,
                })
                .collect(),
        )
    }

    #[test]
    fn test_create_with_defaults() {
        let mut client = links();
        client.expect_save().return_ok();

        let desired = PortModel {
            id: Value::Known(3),
            ..Default::default()
        };
        let created = resource().create(&mut client, desired).unwrap();

        assert_eq!(
            created,
            PortModel {
                id: Value::Known(3),
                name: "ether3".into(),
                enabled: Value::Known(true),
                poe_out: "auto".into(),
            }
        );
        assert_eq!(client.state, links().state);
        client.verify();
    }

    #[test]
    fn test_update_override() {
        let mut client = links();
        client.expect_save().return_ok();

        let desired = PortModel {
            id: Value::Known(3),
            name: "uplink".into(),
            ..Default::default()
        };
        let updated = resource().update(&mut client, desired).unwrap();

        assert_eq!(client.state[2].name, "uplink");
        assert!(client.state[2].enabled);
        assert_eq!(updated.name, Value::from("uplink"));
        assert_eq!(updated.enabled, Value::Known(true));
        client.verify();
    }

    #[test]
    fn test_read_is_idempotent_and_side_effect_free() {
        let mut client = links();
        let current = PortModel {
            id: Value::Known(2),
            name: "stale".into(),
            ..Default::default()
        };

        let first = resource().read(&mut client, current).unwrap();
        let second = resource().read(&mut client, first.clone()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name, Value::from("ether2"));
        assert_eq!(client.saves(), 0);
    }

    #[test]
    fn test_locate_failure_aborts_before_mutation() {
        let mut client = links();
        let desired = PortModel {
            id: Value::Known(9),
            name: "nope".into(),
            ..Default::default()
        };

        let err = resource().update(&mut client, desired).unwrap_err();

        assert_eq!(
            err.to_string(),
            "unable to get port: invalid port id 9, valid ids are [1,4]"
        );
        assert_eq!(client.state, links().state);
        assert_eq!(client.saves(), 0);
    }

    #[test]
    fn test_validation_runs_before_backend() {
        let mut client = links();
        let desired = PortModel {
            id: Value::Known(1),
            name: "renamed".into(),
            poe_out: "sometimes".into(),
            ..Default::default()
        };

        let err = resource().update(&mut client, desired).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(client.state[0].name, "ether1");

        let err = resource()
            .read(&mut client, PortModel::default())
            .unwrap_err();
        assert!(matches!(err, SyncError::Validation { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_unmapped_code_is_fatal_on_read() {
        let mut client = links();
        client.state[0].poe = 7;

        let err = resource()
            .read(
                &mut client,
                PortModel {
                    id: Value::Known(1),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(err, SyncError::Unrepresentable { ref field, .. } if field == "poe_out"));
    }

    #[test]
    fn test_save_failure_keeps_snapshot_mutated() {
        let mut client = links();
        client.expect_save().return_err("device unreachable");

        let desired = PortModel {
            id: Value::Known(3),
            name: "uplink".into(),
            ..Default::default()
        };
        let err = resource().update(&mut client, desired).unwrap_err();

        assert_eq!(
            err.to_string(),
            "unable to save config for port: device unreachable"
        );
        assert_eq!(client.state[2].name, "uplink");

        let reread = resource()
            .read(
                &mut client,
                PortModel {
                    id: Value::Known(3),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(reread.name, Value::from("uplink"));
        client.verify();
    }

    #[test]
    fn test_apply_overwrites_unmapped_code() {
        let mut client = links();
        client.state[0].poe = 7;
        client.expect_save().return_ok();

        let desired = PortModel {
            id: Value::Known(1),
            poe_out: "off".into(),
            ..Default::default()
        };
        let applied = resource().apply(&mut client, desired).unwrap();

        assert_eq!(applied.poe_out, Value::from("off"));
        assert_eq!(applied.name, Value::from("ether1"));
        assert_eq!(client.state[0].poe, 0);
        client.verify();
    }

    #[test]
    fn test_apply_creates_when_locate_misses() {
        fn grow<'c>(client: &'c mut Links, model: &PortModel) -> Result<&'c mut Link, LocateError> {
            client.state.push(Link {
                name: format!("ether{}", model.id.as_known().copied().unwrap_or_default()),
                enabled: false,
                poe: 0,
            });
            client
                .state
                .last_mut()
                .ok_or_else(|| LocateError::new("no link"))
        }

        let mut client = links();
        client.expect_save().return_ok();
        let desired = PortModel {
            id: Value::Known(5),
            enabled: Value::Known(true),
            ..Default::default()
        };

        let applied = resource().create_with(grow).apply(&mut client, desired).unwrap();

        assert_eq!(client.state.len(), 5);
        assert_eq!(applied.name, Value::from("ether5"));
        assert_eq!(applied.poe_out, Value::from("off"));
        assert!(client.state[4].enabled);
        client.verify();
    }

    #[test]
    fn test_noop_delete_still_saves() {
        let mut client = links();
        client.expect_save().return_err("read-only");

        let err = resource()
            .delete(
                &mut client,
                PortModel {
                    id: Value::Known(1),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, SyncError::Save { .. }));
        assert!(!resource().deletes());
        client.verify();
    }

    #[test]
    fn test_schema_in_declaration_order() {
        let schema = resource().schema("swos");
        assert_eq!(schema.type_name, "swos_port");
        assert_eq!(schema.description, "Port configuration");
        let names: Vec<_> = schema.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "enabled", "poe_out"]);
        assert_eq!(schema.attribute("id").unwrap().shape, Shape::Required);
    }
}
