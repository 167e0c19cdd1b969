//! # Engine Errors
//!
//! Error types shared by converters, field descriptors, resources and the
//! session. Every operation-level failure ends up as a [`SyncError`] tagged
//! with the resource name and the step that failed.

/// Boxed error used to carry an underlying cause across layers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single conversion between a backend value and a presentation value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The backend holds a value the converter cannot represent.
    ///
    /// This is a representational-completeness defect (a mapping is missing a
    /// backend code), never a user input problem.
    #[error("backend value {value} has no presentation")]
    Unmapped { value: String },
    /// The presentation value cannot be written to the backend.
    #[error("{0}")]
    Invalid(String),
}

impl ConvertError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn unmapped(value: impl std::fmt::Debug) -> Self {
        Self::Unmapped {
            value: format!("{value:?}"),
        }
    }

    /// Returns true for errors that indicate a defect rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unmapped { .. })
    }
}

/// A `locate`, `create` or `delete` callback could not resolve the backend object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct LocateError(pub String);

impl LocateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The backend client failed to fetch or persist its snapshot.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors talking to the session task that owns the backend client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session closed")]
    Closed,
    #[error("session dropped response channel")]
    Dropped,
}

/// Operation-level error returned by resources, controllers and the registry.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("unable to create {resource}: {source}")]
    Create {
        resource: String,
        #[source]
        source: LocateError,
    },
    #[error("unable to get {resource}: {source}")]
    Get {
        resource: String,
        #[source]
        source: LocateError,
    },
    #[error("unable to delete {resource}: {source}")]
    Delete {
        resource: String,
        #[source]
        source: LocateError,
    },
    #[error("unable to save config for {resource}: {source}")]
    Save {
        resource: String,
        #[source]
        source: BackendError,
    },
    #[error("invalid value for {resource}.{field}: {message}")]
    Validation {
        resource: String,
        field: String,
        message: String,
    },
    #[error("internal error: {resource}.{field} holds backend value {value} with no presentation")]
    Unrepresentable {
        resource: String,
        field: String,
        value: String,
    },
    #[error("unable to refresh {resource}: {source}")]
    Fetch {
        resource: String,
        #[source]
        source: BackendError,
    },
    #[error("{resource} is not configured")]
    Unconfigured { resource: String },
    #[error("{resource} is already configured")]
    AlreadyConfigured { resource: String },
    #[error("malformed {resource} model: {source}")]
    Model {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown resource {0}")]
    UnknownResource(String),
    #[error("duplicate resource {0}")]
    DuplicateResource(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl SyncError {
    /// Tags a field conversion failure with the resource and field it came from.
    pub fn convert(resource: &str, field: &str, err: ConvertError) -> Self {
        match err {
            ConvertError::Unmapped { value } => Self::Unrepresentable {
                resource: resource.to_string(),
                field: field.to_string(),
                value,
            },
            ConvertError::Invalid(message) => Self::Validation {
                resource: resource.to_string(),
                field: field.to_string(),
                message,
            },
        }
    }

    /// Returns true for internal defects that must not be treated as bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unrepresentable { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
