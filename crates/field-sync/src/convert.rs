//! # Scalar and Enum Converters
//!
//! A [`Converter`] translates between one backend value type and one
//! presentation type. `to_model` and `from_model` must be inverses over the
//! backend type's legal domain; reconciliation is only stable if reading a
//! value back and writing it again is a no-op.
//!
//! - [`Text`] and [`Flag`] are identities for strings and booleans.
//! - [`Integer`] widens a backend integer to `i64` and narrows it back with a
//!   range check.
//! - [`EnumMap`] maps labels to backend codes. A backend code without a label
//!   is a fatal [`ConvertError::Unmapped`].

use crate::error::ConvertError;
use crate::schema::AttributeKind;
use std::fmt::Debug;
use std::marker::PhantomData;

pub trait Converter: Send + Sync + 'static {
    /// Concrete type stored in the backend object.
    type Backend;
    /// Type carried inside the model's [`Value`](crate::Value).
    type Model;

    fn to_model(&self, backend: &Self::Backend) -> Result<Self::Model, ConvertError>;

    fn from_model(&self, model: &Self::Model) -> Result<Self::Backend, ConvertError>;

    fn kind(&self) -> AttributeKind;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Converter for Text {
    type Backend = String;
    type Model = String;

    fn to_model(&self, backend: &String) -> Result<String, ConvertError> {
        Ok(backend.clone())
    }

    fn from_model(&self, model: &String) -> Result<String, ConvertError> {
        Ok(model.clone())
    }

    fn kind(&self) -> AttributeKind {
        AttributeKind::String
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Flag;

impl Converter for Flag {
    type Backend = bool;
    type Model = bool;

    fn to_model(&self, backend: &bool) -> Result<bool, ConvertError> {
        Ok(*backend)
    }

    fn from_model(&self, model: &bool) -> Result<bool, ConvertError> {
        Ok(*model)
    }

    fn kind(&self) -> AttributeKind {
        AttributeKind::Bool
    }
}

/// Backend integer types that fit losslessly into `i64`.
pub trait BackendInt: Copy + Debug + Into<i64> + TryFrom<i64> + Send + Sync + 'static {
    const MIN: i64;
    const MAX: i64;
}

macro_rules! backend_int {
    ($($t:ty),*) => {
        $(impl BackendInt for $t {
            const MIN: i64 = <$t>::MIN as i64;
            const MAX: i64 = <$t>::MAX as i64;
        })*
    };
}

backend_int!(u8, u16, u32, i8, i16, i32);

/// Integer converter with an optional narrower legal range.
#[derive(Debug, Clone, Copy)]
pub struct Integer<T> {
    min: i64,
    max: i64,
    _backend: PhantomData<fn() -> T>,
}

impl<T: BackendInt> Integer<T> {
    pub fn new() -> Self {
        Self {
            min: T::MIN,
            max: T::MAX,
            _backend: PhantomData,
        }
    }

    /// Restricts accepted model values to `min..=max`.
    pub fn bounded(min: T, max: T) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
            _backend: PhantomData,
        }
    }
}

impl<T: BackendInt> Default for Integer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BackendInt> Converter for Integer<T> {
    type Backend = T;
    type Model = i64;

    fn to_model(&self, backend: &T) -> Result<i64, ConvertError> {
        Ok((*backend).into())
    }

    fn from_model(&self, model: &i64) -> Result<T, ConvertError> {
        let out_of_range = || {
            ConvertError::invalid(format!(
                "{model} is out of range [{}, {}]",
                self.min, self.max
            ))
        };
        if !(self.min..=self.max).contains(model) {
            return Err(out_of_range());
        }
        T::try_from(*model).map_err(|_| out_of_range())
    }

    fn kind(&self) -> AttributeKind {
        AttributeKind::Int {
            min: self.min,
            max: self.max,
        }
    }
}

/// Label to backend-code mapping for enumerated fields.
///
/// Entries keep their declaration order; the reverse lookup returns the first
/// label whose code matches.
#[derive(Debug, Clone)]
pub struct EnumMap<T> {
    entries: Vec<(&'static str, T)>,
}

impl<T> EnumMap<T>
where
    T: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    pub fn new(entries: impl IntoIterator<Item = (&'static str, T)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }

    pub fn codes(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|(_, code)| code)
    }
}

impl<T> Converter for EnumMap<T>
where
    T: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    type Backend = T;
    type Model = String;

    fn to_model(&self, backend: &T) -> Result<String, ConvertError> {
        self.entries
            .iter()
            .find(|(_, code)| code == backend)
            .map(|(label, _)| label.to_string())
            .ok_or_else(|| ConvertError::unmapped(backend))
    }

    fn from_model(&self, model: &String) -> Result<T, ConvertError> {
        self.entries
            .iter()
            .find(|(label, _)| label == model)
            .map(|(_, code)| code.clone())
            .ok_or_else(|| {
                ConvertError::invalid(format!(
                    "unknown value {model:?}, expected one of: {}",
                    self.labels().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    fn kind(&self) -> AttributeKind {
        AttributeKind::Enum {
            values: self.labels().map(str::to_string).collect(),
        }
    }
}
