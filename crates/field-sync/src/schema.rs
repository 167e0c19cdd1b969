//! Schema types advertised to hosts for every registered resource.

use serde::Serialize;

/// Declared shape of a field: who may supply its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Must be supplied by the caller. Used for identity/key fields.
    Required,
    /// May be supplied; when left unknown the backend value is adopted.
    OptionalComputed,
    /// Read-only; always taken from the backend.
    Computed,
}

/// Presentation type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Bool,
    Int { min: i64, max: i64 },
    Enum { values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
    pub name: String,
    pub description: String,
    pub shape: Shape,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    /// Provider-qualified type name, e.g. `swos_port`.
    pub type_name: String,
    pub description: String,
    /// Attributes in declaration order.
    pub attributes: Vec<AttributeSchema>,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
