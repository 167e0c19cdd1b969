//! # Presentation Values
//!
//! [`Value`] is the tri-state scalar the orchestration side works with: a
//! concrete value, an explicit absence, or a value that is still pending
//! computation. The backend side never sees it; converters translate to and
//! from plain backend values.
//!
//! ## Serialization
//!
//! `Known(v)` serializes as `v`, both `Null` and `Unknown` serialize as `null`.
//! Deserializing `null` yields `Null`; combine with `#[serde(default)]` on the
//! model field so that a missing attribute yields `Unknown`:
//!
//! ```rust
//! use field_sync::Value;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Model {
//!     #[serde(default)]
//!     name: Value<String>,
//!     #[serde(default)]
//!     enabled: Value<bool>,
//! }
//!
//! let model: Model = serde_json::from_str(r#"{"name": null}"#).unwrap();
//! assert!(model.name.is_null());
//! assert!(model.enabled.is_unknown());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value<T> {
    /// Known, concrete value supplied by the caller or read from the backend.
    Known(T),
    /// Known to be absent.
    Null,
    /// Not known yet; the engine may compute it from the backend.
    #[default]
    Unknown,
}

impl<T> Value<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Value<U> {
        match self {
            Self::Known(value) => Value::Known(f(value)),
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
        }
    }

    /// Short label of the state, used in logs.
    pub fn state(&self) -> &'static str {
        match self {
            Self::Known(_) => "known",
            Self::Null => "null",
            Self::Unknown => "unknown",
        }
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Self::Known(value.to_string())
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Known(value) => serializer.serialize_some(value),
            Self::Null | Self::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Value<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Known(value),
            None => Self::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Model {
        #[serde(default)]
        id: Value<i64>,
        #[serde(default, skip_serializing_if = "Value::is_unknown")]
        name: Value<String>,
    }

    #[test]
    fn test_missing_is_unknown_and_null_is_null() {
        let model: Model = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert_eq!(model.id, Value::Null);
        assert_eq!(model.name, Value::Unknown);

        let model: Model = serde_json::from_str(r#"{"id": 3, "name": "ether3"}"#).unwrap();
        assert_eq!(model.id, Value::Known(3));
        assert_eq!(model.name, Value::from("ether3"));
    }

    #[test]
    fn test_serialize_skips_unknown() {
        let model = Model {
            id: Value::Known(3),
            name: Value::Unknown,
        };
        assert_eq!(serde_json::to_string(&model).unwrap(), r#"{"id":3}"#);

        let model = Model {
            id: Value::Null,
            name: "uplink".into(),
        };
        assert_eq!(
            serde_json::to_string(&model).unwrap(),
            r#"{"id":null,"name":"uplink"}"#
        );
    }

    #[test]
    fn test_accessors() {
        let value = Value::Known(5u16);
        assert_eq!(value.as_known(), Some(&5));
        assert_eq!(value.clone().map(i64::from), Value::Known(5i64));
        assert_eq!(value.state(), "known");
        assert_eq!(Value::<u16>::Unknown.into_known(), None);
        assert_eq!(Value::<u16>::Null.state(), "null");
    }
}
