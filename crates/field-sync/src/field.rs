//! # Field Descriptors
//!
//! A field descriptor binds one backend attribute to one model attribute
//! through a pair of accessor functions and a [`Converter`]. Resources hold
//! their fields as `Box<dyn Field<M, B>>`, so fields of different value types
//! live in one ordered list.
//!
//! ## Sync vs Read
//!
//! - [`Field::sync`] is the tie-breaking direction used by create and update:
//!   an unknown model value is filled from the backend, a known model value is
//!   written to the backend.
//! - [`Field::read`] always copies the backend into the model.
//!
//! Fields declared with [`SyncedField::key`] have no backend accessor. They
//! identify the backend object and are never written back, so both
//! operations leave them alone.

use crate::convert::Converter;
use crate::error::ConvertError;
use crate::schema::{AttributeSchema, Shape};
use crate::value::Value;
use tracing::trace;

/// Object-safe view of a field descriptor over model `M` and backend object `B`.
pub trait Field<M, B>: Send + Sync {
    fn name(&self) -> &str;

    fn shape(&self) -> Shape;

    fn schema(&self) -> AttributeSchema;

    /// Checks the model value without touching any backend object.
    fn validate(&self, model: &mut M) -> Result<(), ConvertError>;

    /// Unknown model state pulls from the backend; known model state overwrites it.
    /// `Null` pulls as well: it never writes a zero value to the backend.
    fn sync(&self, backend: &mut B, model: &mut M) -> Result<(), ConvertError>;

    /// Unconditionally pulls the backend value into the model.
    fn read(&self, backend: &mut B, model: &mut M) -> Result<(), ConvertError>;
}

/// Function yielding a mutable reference into a backend object.
pub type BackendAccessor<B, T> = fn(&mut B) -> &mut T;

/// Function yielding a mutable reference into a model.
pub type ModelAccessor<M, V> = fn(&mut M) -> &mut Value<V>;

pub struct SyncedField<M, B, C: Converter> {
    name: &'static str,
    description: &'static str,
    shape: Shape,
    backend: Option<BackendAccessor<B, C::Backend>>,
    model: ModelAccessor<M, C::Model>,
    converter: C,
}

impl<M, B, C: Converter> SyncedField<M, B, C> {
    /// Identity field: required, never synchronized with the backend.
    pub fn key<V>(name: &'static str, model: ModelAccessor<M, V>, converter: C) -> Self
    where
        C: Converter<Model = V>,
    {
        Self {
            name,
            description: "",
            shape: Shape::Required,
            backend: None,
            model,
            converter,
        }
    }

    /// Optional, computed attribute backed by a backend field.
    pub fn attribute<T, V>(
        name: &'static str,
        backend: BackendAccessor<B, T>,
        model: ModelAccessor<M, V>,
        converter: C,
    ) -> Self
    where
        C: Converter<Backend = T, Model = V>,
    {
        Self {
            name,
            description: "",
            shape: Shape::OptionalComputed,
            backend: Some(backend),
            model,
            converter,
        }
    }

    /// Marks the attribute read-only: its value always comes from the backend.
    pub fn computed(mut self) -> Self {
        if self.backend.is_some() {
            self.shape = Shape::Computed;
        }
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn pull(&self, backend: &mut B, model: &mut M) -> Result<(), ConvertError> {
        let Some(get) = self.backend else {
            return Ok(());
        };
        let value = self.converter.to_model(get(backend))?;
        *(self.model)(model) = Value::Known(value);
        trace!(field = self.name, "pulled from backend");
        Ok(())
    }
}

impl<M, B, C> Field<M, B> for SyncedField<M, B, C>
where
    C: Converter,
{
    fn name(&self) -> &str {
        self.name
    }

    fn shape(&self) -> Shape {
        self.shape
    }

    fn schema(&self) -> AttributeSchema {
        AttributeSchema {
            name: self.name.to_string(),
            description: self.description.to_string(),
            shape: self.shape,
            kind: self.converter.kind(),
        }
    }

    fn validate(&self, model: &mut M) -> Result<(), ConvertError> {
        let value = (self.model)(model);
        match (self.shape, &*value) {
            (Shape::Computed, _) => Ok(()),
            (_, Value::Known(v)) => self.converter.from_model(v).map(|_| ()),
            (Shape::Required, other) => Err(ConvertError::invalid(format!(
                "a value is required, got {}",
                other.state()
            ))),
            (Shape::OptionalComputed, _) => Ok(()),
        }
    }

    fn sync(&self, backend: &mut B, model: &mut M) -> Result<(), ConvertError> {
        let Some(get) = self.backend else {
            return Ok(());
        };
        if self.shape == Shape::Computed {
            return self.pull(backend, model);
        }
        let pushed = match (self.model)(model) {
            Value::Known(v) => Some(self.converter.from_model(v)?),
            Value::Null | Value::Unknown => None,
        };
        match pushed {
            Some(value) => {
                *get(backend) = value;
                trace!(field = self.name, "pushed to backend");
                Ok(())
            }
            None => self.pull(backend, model),
        }
    }

    fn read(&self, backend: &mut B, model: &mut M) -> Result<(), ConvertError> {
        self.pull(backend, model)
    }
}
